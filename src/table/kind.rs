// src/table/kind.rs

use arrow::datatypes::{DataType, TimeUnit};
use std::{fmt, sync::Arc};

use super::value::Value;

/// Inferred scalar kind of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// No evidence yet: the column is empty or all null.
    Null,
    Int,
    Float,
    Bool,
    Str,
    Timestamp,
}

impl ColumnKind {
    /// Decision table for combining two observed kinds:
    ///
    /// | a \ b     | Null | same kind | any other kind |
    /// |-----------|------|-----------|----------------|
    /// | Null      | Null | b         | b              |
    /// | k         | k    | k         | Str            |
    ///
    /// Integers and floats are *not* widened; a mix of them is a string
    /// column like any other mix.
    pub fn unify(self, other: ColumnKind) -> ColumnKind {
        use ColumnKind::*;
        match (self, other) {
            (Null, k) | (k, Null) => k,
            (a, b) if a == b => a,
            _ => Str,
        }
    }

    /// Fold the decision table over every value of a column.
    pub fn infer<'a, I>(values: I) -> ColumnKind
    where
        I: IntoIterator<Item = &'a Value>,
    {
        values
            .into_iter()
            .fold(ColumnKind::Null, |acc, v| acc.unify(v.kind()))
    }

    /// Whether a batch column of kind `batch` may extend a column of kind
    /// `self` without changing the emitted schema.
    pub fn accepts(self, batch: ColumnKind) -> bool {
        self == ColumnKind::Null || batch == ColumnKind::Null || self == batch
    }

    /// Arrow type written to the wire for this kind.
    pub fn data_type(self) -> DataType {
        match self {
            ColumnKind::Null => DataType::Null,
            ColumnKind::Int => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::Bool => DataType::Boolean,
            ColumnKind::Str => DataType::Utf8,
            ColumnKind::Timestamp => {
                DataType::Timestamp(TimeUnit::Microsecond, Some(Arc::from("UTC")))
            }
        }
    }

    /// Kind that values of an Arrow column read back as.
    pub fn from_data_type(dt: &DataType) -> ColumnKind {
        match dt {
            DataType::Null => ColumnKind::Null,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32 => ColumnKind::Int,
            DataType::Float16 | DataType::Float32 | DataType::Float64 => ColumnKind::Float,
            DataType::Boolean => ColumnKind::Bool,
            DataType::Timestamp(_, _) | DataType::Date32 | DataType::Date64 => {
                ColumnKind::Timestamp
            }
            // UInt64 may not fit an i64; everything else is shown as text
            _ => ColumnKind::Str,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Null => "null",
            ColumnKind::Int => "int",
            ColumnKind::Float => "float",
            ColumnKind::Bool => "bool",
            ColumnKind::Str => "string",
            ColumnKind::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::ColumnKind::*;
    use super::*;

    #[test]
    fn decision_table() {
        let all = [Null, Int, Float, Bool, Str, Timestamp];
        for &a in &all {
            assert_eq!(Null.unify(a), a);
            assert_eq!(a.unify(Null), a);
            assert_eq!(a.unify(a), a);
            for &b in &all {
                assert_eq!(a.unify(b), b.unify(a), "unify must be symmetric");
                if a != b && a != Null && b != Null {
                    assert_eq!(a.unify(b), Str, "{} x {}", a, b);
                }
            }
        }
    }

    #[test]
    fn infer_ignores_nulls() {
        let vals = vec![Value::Null, Value::Int(1), Value::Null, Value::Int(2)];
        assert_eq!(ColumnKind::infer(&vals), Int);
        assert_eq!(ColumnKind::infer(&[] as &[Value]), Null);
        assert_eq!(ColumnKind::infer(&[Value::Int(1), Value::Float(1.5)]), Str);
    }

    #[test]
    fn accepts_treats_null_as_wildcard() {
        assert!(Int.accepts(Null));
        assert!(Null.accepts(Float));
        assert!(Str.accepts(Str));
        assert!(!Int.accepts(Float));
    }

    #[test]
    fn wire_types_round_trip() {
        for k in [Null, Int, Float, Bool, Str, Timestamp] {
            assert_eq!(ColumnKind::from_data_type(&k.data_type()), k);
        }
    }
}
