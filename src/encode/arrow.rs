// src/encode/arrow.rs

use arrow::{
    array::{
        ArrayRef, BooleanArray, Float64Array, Int64Array, NullArray, StringArray,
        TimestampMicrosecondArray,
    },
    datatypes::{Field as ArrowField, Schema as ArrowSchema},
};
use std::sync::Arc;

use crate::error::{MarshalError, Result};
use crate::table::{ColumnKind, ColumnSchema, Value};

/// Build an ArrowSchema (inside an Arc) from column names + kinds.
/// Every field is nullable.
pub fn build_arrow_schema(cols: &[ColumnSchema]) -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = cols
        .iter()
        .map(|col| ArrowField::new(&col.name, col.kind.data_type(), /* nullable = */ true))
        .collect();

    Arc::new(ArrowSchema::new(fields))
}

/// Lay out one column as an Arrow array of `kind`.
///
/// `Str` accepts any value and stringifies it; every other kind accepts
/// only its own values and nulls.
pub fn column_to_array(name: &str, values: &[Value], kind: ColumnKind) -> Result<ArrayRef> {
    let wrong = |v: &Value| {
        MarshalError::mismatch(format!(
            "column `{}` is {} but holds a {} value",
            name,
            kind,
            v.kind()
        ))
    };

    let arr: ArrayRef = match kind {
        ColumnKind::Null => {
            if let Some(v) = values.iter().find(|v| !v.is_null()) {
                return Err(wrong(v));
            }
            Arc::new(NullArray::new(values.len()))
        }
        ColumnKind::Int => {
            let vals = values
                .iter()
                .map(|v| match v {
                    Value::Int(i) => Ok(Some(*i)),
                    Value::Null => Ok(None),
                    other => Err(wrong(other)),
                })
                .collect::<Result<Vec<_>>>()?;
            Arc::new(Int64Array::from(vals))
        }
        ColumnKind::Float => {
            let vals = values
                .iter()
                .map(|v| match v {
                    Value::Float(f) => Ok(Some(*f)),
                    Value::Null => Ok(None),
                    other => Err(wrong(other)),
                })
                .collect::<Result<Vec<_>>>()?;
            Arc::new(Float64Array::from(vals))
        }
        ColumnKind::Bool => {
            let vals = values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Ok(Some(*b)),
                    Value::Null => Ok(None),
                    other => Err(wrong(other)),
                })
                .collect::<Result<Vec<_>>>()?;
            Arc::new(BooleanArray::from(vals))
        }
        ColumnKind::Timestamp => {
            let vals = values
                .iter()
                .map(|v| match v {
                    Value::Timestamp(ts) => Ok(Some(ts.timestamp_micros())),
                    Value::Null => Ok(None),
                    other => Err(wrong(other)),
                })
                .collect::<Result<Vec<_>>>()?;
            Arc::new(TimestampMicrosecondArray::from(vals).with_timezone("UTC"))
        }
        ColumnKind::Str => {
            let vals: Vec<Option<String>> = values
                .iter()
                .map(|v| match v {
                    Value::Null => None,
                    Value::Str(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect();
            Arc::new(StringArray::from(vals))
        }
    };
    Ok(arr)
}
