// src/normalize/mod.rs

pub mod columnar;
pub mod input;
pub mod names;

pub use input::{Frame, NdArray, TableInput};
pub use names::dedup_names;

use tracing::debug;

use crate::config::MarshalConfig;
use crate::error::{MarshalError, Result};
use crate::table::{CanonicalTable, Value};

/// Reduce any supported input to a `CanonicalTable`.
///
/// Works on copies: the caller's input is never modified, so the same
/// input may be normalized from several threads at once.
pub fn normalize(input: &TableInput, cfg: &MarshalConfig) -> Result<CanonicalTable> {
    let (names, columns) = match input {
        TableInput::None => return Ok(CanonicalTable::empty()),
        TableInput::Frame(frame) => frame_columns(frame, cfg)?,
        TableInput::Styled(styler) => frame_columns(styler.data(), cfg)?,
        TableInput::Columnar(batch) => columnar::record_batch_to_columns(batch)?,
        TableInput::Array(array) => array_columns(array, cfg)?,
        TableInput::Iterable(items) => (vec![synthesized(cfg, 0)], vec![items.clone()]),
        TableInput::Mapping(pairs) => pairs.iter().cloned().unzip(),
    };

    let names = dedup_names(names, &cfg.name_collision_separator);
    let table = CanonicalTable::new(names, columns)?;
    debug!(
        source = input.kind_name(),
        rows = table.num_rows(),
        cols = table.num_columns(),
        "normalized input"
    );
    Ok(table)
}

/// Normalize a bare frame, as the style extractor needs before it
/// stringifies cells.
pub fn normalize_frame(frame: &Frame, cfg: &MarshalConfig) -> Result<CanonicalTable> {
    let (names, columns) = frame_columns(frame, cfg)?;
    CanonicalTable::new(dedup_names(names, &cfg.name_collision_separator), columns)
}

fn synthesized(cfg: &MarshalConfig, idx: usize) -> String {
    format!("{}{}", cfg.synthesized_name_prefix, idx)
}

fn frame_columns(frame: &Frame, cfg: &MarshalConfig) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
    if frame.labels.len() != frame.columns.len() {
        return Err(MarshalError::shape(format!(
            "frame has {} labels for {} columns",
            frame.labels.len(),
            frame.columns.len()
        )));
    }
    let names = frame
        .labels
        .iter()
        .map(|l| l.to_display_string(&cfg.null_display))
        .collect();
    Ok((names, frame.columns.clone()))
}

fn array_columns(array: &NdArray, cfg: &MarshalConfig) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
    let expected = array
        .shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| MarshalError::shape("array shape overflows"))?;
    if array.shape.is_empty() || array.shape.len() > 2 {
        return Err(MarshalError::shape(format!(
            "arrays must have rank 1 or 2, got rank {}",
            array.shape.len()
        )));
    }
    if array.data.len() != expected {
        return Err(MarshalError::shape(format!(
            "array of shape {:?} holds {} values, expected {}",
            array.shape,
            array.data.len(),
            expected
        )));
    }

    match array.shape[..] {
        [_] => Ok((vec![synthesized(cfg, 0)], vec![array.data.clone()])),
        [n_rows, n_cols] => {
            let names = (0..n_cols).map(|j| synthesized(cfg, j)).collect();
            let columns = (0..n_cols)
                .map(|j| {
                    (0..n_rows)
                        .map(|i| array.data[i * n_cols + j].clone())
                        .collect()
                })
                .collect();
            Ok((names, columns))
        }
        _ => unreachable!("rank checked above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnKind;
    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn cfg() -> MarshalConfig {
        MarshalConfig::default()
    }

    #[test]
    fn mapping_keeps_insertion_order() -> Result<()> {
        let input = TableInput::mapping(vec![("x", vec![1, 2, 3]), ("y", vec![4, 5, 6])]);
        let t = normalize(&input, &cfg())?;

        assert_eq!(t.names(), ["x", "y"]);
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.kinds(), vec![ColumnKind::Int, ColumnKind::Int]);
        let cells: Vec<&Value> = t.columns().iter().flatten().collect();
        let expected: Vec<Value> = (1..=6).map(Value::Int).collect();
        assert_eq!(cells, expected.iter().collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn mapping_with_unequal_lengths_fails() {
        let input = TableInput::mapping(vec![("x", vec![1, 2]), ("y", vec![3])]);
        assert!(matches!(
            normalize(&input, &cfg()),
            Err(MarshalError::Shape(_))
        ));
    }

    #[test]
    fn one_dimensional_array() -> Result<()> {
        let t = normalize(&NdArray::from_vec(vec![1.5, 2.5]).into(), &cfg())?;
        assert_eq!(t.names(), ["0"]);
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.kinds(), vec![ColumnKind::Float]);
        assert_eq!(t.value(1, 0), Some(&Value::Float(2.5)));
        Ok(())
    }

    #[test]
    fn two_dimensional_array_is_rows_by_columns() -> Result<()> {
        let arr = NdArray::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let t = normalize(&arr.into(), &cfg())?;
        assert_eq!(t.names(), ["0", "1", "2"]);
        assert_eq!(t.shape(), (2, 3));
        assert_eq!(t.column(2), Some(&[Value::Int(3), Value::Int(6)][..]));
        Ok(())
    }

    #[test]
    fn bad_arrays_fail() {
        let rank3 = NdArray::new(vec![1, 1, 1], vec![Value::Int(1)]);
        assert!(matches!(
            normalize(&rank3.into(), &cfg()),
            Err(MarshalError::Shape(_))
        ));

        let scalar = NdArray::new(vec![], vec![Value::Int(1)]);
        assert!(matches!(
            normalize(&scalar.into(), &cfg()),
            Err(MarshalError::Shape(_))
        ));

        let ragged = NdArray::from_rows(vec![vec![1, 2], vec![3]]);
        assert!(matches!(
            normalize(&ragged.into(), &cfg()),
            Err(MarshalError::Shape(_))
        ));
    }

    #[test]
    fn none_is_empty() -> Result<()> {
        let t = normalize(&TableInput::None, &cfg())?;
        assert_eq!(t.shape(), (0, 0));
        Ok(())
    }

    #[test]
    fn iterable_is_one_column() -> Result<()> {
        let mut c = cfg();
        c.synthesized_name_prefix = "value".into();
        let t = normalize(&TableInput::iterable(["a", "b", "c"]), &c)?;
        assert_eq!(t.names(), ["value0"]);
        assert_eq!(t.num_rows(), 3);
        Ok(())
    }

    #[test]
    fn frame_labels_collide_after_stringification() -> Result<()> {
        let frame = Frame::new(
            vec![Value::Int(1), Value::from("1"), Value::Bool(true)],
            vec![vec![Value::Int(10)], vec![Value::Int(20)], vec![Value::Int(30)]],
        );
        let t = normalize(&frame.into(), &cfg())?;
        assert_eq!(t.names(), ["1", "1_1", "True"]);
        assert_eq!(t.num_columns(), 3);
        assert_eq!(t.value(0, 1), Some(&Value::Int(20)));
        Ok(())
    }

    #[test]
    fn frame_from_rows_transposes() -> Result<()> {
        let frame = Frame::from_rows(vec!["a", "b"], vec![vec![1, 2], vec![3, 4]]);
        let t = normalize(&frame.into(), &cfg())?;
        assert_eq!(t.column(0), Some(&[Value::Int(1), Value::Int(3)][..]));

        let ragged = Frame::from_rows(vec!["a"], vec![vec![1, 2]]);
        assert!(matches!(
            normalize(&ragged.into(), &cfg()),
            Err(MarshalError::Shape(_))
        ));
        Ok(())
    }

    #[test]
    fn columnar_batch_is_read() -> Result<()> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("id", DataType::Utf8, true),
        ]));
        let cols: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(vec![1, 2])),
            Arc::new(StringArray::from(vec![Some("a"), None])),
        ];
        let batch = RecordBatch::try_new(schema, cols)?;
        let t = normalize(&batch.into(), &cfg())?;
        assert_eq!(t.names(), ["id", "id_1"]);
        assert_eq!(t.value(1, 1), Some(&Value::Null));
        Ok(())
    }

    #[test]
    fn input_is_not_modified() -> Result<()> {
        let input = TableInput::mapping(vec![("a", vec![1]), ("a", vec![2])]);
        let before = format!("{:?}", input);
        let _ = normalize(&input, &cfg())?;
        assert_eq!(format!("{:?}", input), before);
        Ok(())
    }
}
