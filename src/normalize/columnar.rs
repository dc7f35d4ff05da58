// src/normalize/columnar.rs

use arrow::{
    array::{Array, AsArray},
    compute::cast,
    datatypes::{DataType, Float64Type, Int64Type, TimeUnit, TimestampMicrosecondType},
    record_batch::RecordBatch,
    util::display::{ArrayFormatter, FormatOptions},
};
use chrono::DateTime;
use tracing::warn;

use crate::error::Result;
use crate::table::{ColumnKind, Value};

/// Read every cell of an Arrow column into typed values.
///
/// - all integer widths (except UInt64) → Int
/// - Float16/32/64                      → Float
/// - Timestamp (any unit), Date32/64    → Timestamp (UTC micros)
/// - Boolean                            → Bool
/// - Null                               → Null
/// - everything else                    → Str, via Arrow's display formatter
pub fn array_to_values(array: &dyn Array) -> Result<Vec<Value>> {
    let len = array.len();
    let values = match ColumnKind::from_data_type(array.data_type()) {
        ColumnKind::Null => vec![Value::Null; len],

        ColumnKind::Int => {
            let ints = cast(array, &DataType::Int64)?;
            ints.as_primitive::<Int64Type>()
                .iter()
                .map(|v| v.map_or(Value::Null, Value::Int))
                .collect()
        }

        ColumnKind::Float => {
            let floats = cast(array, &DataType::Float64)?;
            floats
                .as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.map_or(Value::Null, Value::Float))
                .collect()
        }

        ColumnKind::Bool => array
            .as_boolean()
            .iter()
            .map(|v| v.map_or(Value::Null, Value::Bool))
            .collect(),

        ColumnKind::Timestamp => {
            // keep the source zone so the cast only changes the unit
            let tz = match array.data_type() {
                DataType::Timestamp(_, tz) => tz.clone(),
                _ => None,
            };
            let micros = cast(array, &DataType::Timestamp(TimeUnit::Microsecond, tz))?;
            micros
                .as_primitive::<TimestampMicrosecondType>()
                .iter()
                .map(|v| match v {
                    Some(us) => match DateTime::from_timestamp_micros(us) {
                        Some(ts) => Value::Timestamp(ts),
                        None => {
                            warn!(micros = us, "timestamp out of range, reading as null");
                            Value::Null
                        }
                    },
                    None => Value::Null,
                })
                .collect()
        }

        ColumnKind::Str => {
            let fmt = ArrayFormatter::try_new(array, &FormatOptions::default())?;
            (0..len)
                .map(|i| {
                    if array.is_null(i) {
                        Value::Null
                    } else {
                        Value::Str(fmt.value(i).to_string())
                    }
                })
                .collect()
        }
    };
    Ok(values)
}

/// Split a record batch into column names and typed columns.
pub fn record_batch_to_columns(batch: &RecordBatch) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
    let schema = batch.schema();
    let names = schema.fields().iter().map(|f| f.name().clone()).collect();
    let columns = batch
        .columns()
        .iter()
        .map(|arr| array_to_values(arr.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Ok((names, columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{
        ArrayRef, BooleanArray, Date32Array, Float32Array, Int32Array, ListArray, NullArray,
        StringArray, TimestampMillisecondArray, UInt8Array,
    };
    use arrow::datatypes::{Field, Int32Type, Schema};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[test]
    fn reads_common_types() -> Result<()> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("i", DataType::Int32, true),
            Field::new("u", DataType::UInt8, true),
            Field::new("f", DataType::Float32, true),
            Field::new("b", DataType::Boolean, true),
            Field::new("s", DataType::Utf8, true),
            Field::new("n", DataType::Null, true),
        ]));
        let cols: Vec<ArrayRef> = vec![
            Arc::new(Int32Array::from(vec![Some(1), None])),
            Arc::new(UInt8Array::from(vec![7, 8])),
            Arc::new(Float32Array::from(vec![0.5, 1.5])),
            Arc::new(BooleanArray::from(vec![Some(true), None])),
            Arc::new(StringArray::from(vec![Some("x"), None])),
            Arc::new(NullArray::new(2)),
        ];
        let batch = RecordBatch::try_new(schema, cols)?;

        let (names, columns) = record_batch_to_columns(&batch)?;
        assert_eq!(names, vec!["i", "u", "f", "b", "s", "n"]);
        assert_eq!(columns[0], vec![Value::Int(1), Value::Null]);
        assert_eq!(columns[1], vec![Value::Int(7), Value::Int(8)]);
        assert_eq!(columns[2], vec![Value::Float(0.5), Value::Float(1.5)]);
        assert_eq!(columns[3], vec![Value::Bool(true), Value::Null]);
        assert_eq!(columns[4], vec![Value::from("x"), Value::Null]);
        assert_eq!(columns[5], vec![Value::Null, Value::Null]);
        Ok(())
    }

    #[test]
    fn timestamps_and_dates_become_utc() -> Result<()> {
        let ts = Utc.with_ymd_and_hms(2024, 12, 22, 0, 5, 0).unwrap();
        let millis = TimestampMillisecondArray::from(vec![ts.timestamp_millis()])
            .with_timezone("+10:00");
        assert_eq!(array_to_values(&millis)?, vec![Value::Timestamp(ts)]);

        // 1970-01-11
        let dates = Date32Array::from(vec![10]);
        let expected = Utc.with_ymd_and_hms(1970, 1, 11, 0, 0, 0).unwrap();
        assert_eq!(array_to_values(&dates)?, vec![Value::Timestamp(expected)]);
        Ok(())
    }

    #[test]
    fn nested_types_fall_back_to_text() -> Result<()> {
        let list = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
            Some(vec![Some(1), Some(2)]),
            None,
        ]);
        let vals = array_to_values(&list)?;
        assert_eq!(vals[0], Value::from("[1, 2]"));
        assert_eq!(vals[1], Value::Null);
        Ok(())
    }
}
