// src/table/mod.rs

pub mod kind;
pub mod value;

pub use kind::ColumnKind;
pub use value::Value;

use crate::error::{MarshalError, Result};

/// Name and inferred kind of one column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

/// The normalized form every supported input is reduced to.
///
/// All columns have the same length; the constructor refuses anything
/// else, so holders of a `CanonicalTable` never re-check it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalTable {
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
    num_rows: usize,
}

impl CanonicalTable {
    pub fn new(names: Vec<String>, columns: Vec<Vec<Value>>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(MarshalError::shape(format!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let num_rows = columns.first().map_or(0, Vec::len);
        if let Some((i, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != num_rows) {
            return Err(MarshalError::shape(format!(
                "column `{}` has {} values, expected {}",
                names[i],
                col.len(),
                num_rows
            )));
        }
        Ok(Self {
            names,
            columns,
            num_rows,
        })
    }

    /// 0 rows, 0 columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Columns with the given names and no rows.
    pub fn with_names(names: Vec<String>) -> Self {
        let columns = vec![Vec::new(); names.len()];
        Self {
            names,
            columns,
            num_rows: 0,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> &[Vec<Value>] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> Option<&[Value]> {
        self.columns.get(idx).map(Vec::as_slice)
    }

    pub fn value(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col).and_then(|c| c.get(row))
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn kinds(&self) -> Vec<ColumnKind> {
        self.columns.iter().map(ColumnKind::infer).collect()
    }

    pub fn schema(&self) -> Vec<ColumnSchema> {
        self.names
            .iter()
            .zip(self.kinds())
            .map(|(name, kind)| ColumnSchema {
                name: name.clone(),
                kind,
            })
            .collect()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.names, self.columns)
    }

    /// Rows of `self` followed by rows of `other`; names must agree.
    pub fn concat(&self, other: &CanonicalTable) -> Result<Self> {
        if self.names != other.names {
            return Err(MarshalError::mismatch(format!(
                "cannot concatenate {:?} with {:?}",
                self.names, other.names
            )));
        }
        let columns = self
            .columns
            .iter()
            .zip(&other.columns)
            .map(|(a, b)| a.iter().chain(b).cloned().collect())
            .collect();
        Self::new(self.names.clone(), columns)
    }
}
