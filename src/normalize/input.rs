// src/normalize/input.rs

use arrow::record_batch::RecordBatch;

use crate::style::Styler;
use crate::table::Value;

/// A labelled 2-D table, column-major.
///
/// Labels are values rather than strings: integer or boolean labels are
/// legal and only become strings during normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub labels: Vec<Value>,
    pub columns: Vec<Vec<Value>>,
}

impl Frame {
    pub fn new(labels: Vec<Value>, columns: Vec<Vec<Value>>) -> Self {
        Self { labels, columns }
    }

    /// Build from string labels and row-major data.
    ///
    /// Rows shorter or longer than the label list are kept as-is in the
    /// transposed columns, so normalization reports the bad shape.
    pub fn from_rows<L, V>(labels: Vec<L>, rows: Vec<Vec<V>>) -> Self
    where
        L: Into<Value>,
        V: Into<Value>,
    {
        let labels: Vec<Value> = labels.into_iter().map(Into::into).collect();
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); labels.len()];
        for row in rows {
            for (j, cell) in row.into_iter().enumerate() {
                if j >= columns.len() {
                    columns.push(Vec::new());
                }
                columns[j].push(cell.into());
            }
        }
        Self { labels, columns }
    }
}

/// An n-dimensional array stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    pub shape: Vec<usize>,
    pub data: Vec<Value>,
}

impl NdArray {
    pub fn new(shape: Vec<usize>, data: Vec<Value>) -> Self {
        Self { shape, data }
    }

    /// A 1-D array.
    pub fn from_vec<V: Into<Value>>(data: Vec<V>) -> Self {
        let data: Vec<Value> = data.into_iter().map(Into::into).collect();
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// A 2-D array; the column count is taken from the first row.
    pub fn from_rows<V: Into<Value>>(rows: Vec<Vec<V>>) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let data = rows.into_iter().flatten().map(Into::into).collect();
        Self {
            shape: vec![n_rows, n_cols],
            data,
        }
    }
}

/// Every input shape the marshaller accepts.
#[derive(Debug, Clone)]
pub enum TableInput {
    Frame(Frame),
    Styled(Styler),
    Columnar(RecordBatch),
    Array(NdArray),
    Iterable(Vec<Value>),
    /// Column name → values, in insertion order.
    Mapping(Vec<(String, Vec<Value>)>),
    None,
}

impl TableInput {
    pub fn mapping<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, Vec<V>)>,
    {
        TableInput::Mapping(
            pairs
                .into_iter()
                .map(|(k, vs)| (k.into(), vs.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    /// Materialize a bounded iterator into a single column.
    pub fn iterable<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        TableInput::Iterable(items.into_iter().map(Into::into).collect())
    }

    pub fn is_styled(&self) -> bool {
        matches!(self, TableInput::Styled(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            TableInput::Frame(_) => "frame",
            TableInput::Styled(_) => "styled",
            TableInput::Columnar(_) => "columnar",
            TableInput::Array(_) => "array",
            TableInput::Iterable(_) => "iterable",
            TableInput::Mapping(_) => "mapping",
            TableInput::None => "none",
        }
    }
}

impl From<Frame> for TableInput {
    fn from(f: Frame) -> Self {
        TableInput::Frame(f)
    }
}

impl From<Styler> for TableInput {
    fn from(s: Styler) -> Self {
        TableInput::Styled(s)
    }
}

impl From<RecordBatch> for TableInput {
    fn from(b: RecordBatch) -> Self {
        TableInput::Columnar(b)
    }
}

impl From<NdArray> for TableInput {
    fn from(a: NdArray) -> Self {
        TableInput::Array(a)
    }
}

impl<T: Into<TableInput>> From<Option<T>> for TableInput {
    fn from(v: Option<T>) -> Self {
        v.map_or(TableInput::None, Into::into)
    }
}
