// src/encode/mod.rs

pub mod arrow;

pub use self::arrow::{build_arrow_schema, column_to_array};

use ::arrow::{
    array::ArrayRef,
    ipc::{reader::StreamReader, writer::StreamWriter},
    record_batch::RecordBatch,
};
use std::io::Cursor;
use tracing::trace;

use crate::error::{MarshalError, Result};
use crate::normalize::columnar::array_to_values;
use crate::table::{CanonicalTable, ColumnKind, ColumnSchema, Value};

/// Serialize a table as an Arrow IPC stream, inferring each column's kind.
///
/// The stream holds the schema message and, when the table has rows, one
/// record batch. No timestamps or hash-ordered data are written, so equal
/// tables give equal bytes.
pub fn encode(table: &CanonicalTable) -> Result<Vec<u8>> {
    encode_with_schema(table, &table.schema())
}

/// Serialize a table with an explicit schema (names + kinds).
///
/// Used by the appender, which must emit the kinds already on the wire
/// rather than whatever the new batch alone would infer.
pub fn encode_with_schema(table: &CanonicalTable, schema: &[ColumnSchema]) -> Result<Vec<u8>> {
    if schema.len() != table.num_columns() {
        return Err(MarshalError::mismatch(format!(
            "schema has {} columns, table has {}",
            schema.len(),
            table.num_columns()
        )));
    }

    let arrow_schema = build_arrow_schema(schema);
    let mut writer = StreamWriter::try_new(Vec::new(), &arrow_schema)?;

    if table.num_rows() > 0 {
        let columns = schema
            .iter()
            .zip(table.columns())
            .map(|(col, values)| column_to_array(&col.name, values, col.kind))
            .collect::<Result<Vec<ArrayRef>>>()?;
        let batch = RecordBatch::try_new(arrow_schema.clone(), columns)?;
        writer.write(&batch)?;
    }

    writer.finish()?;
    let bytes = writer.into_inner()?;
    trace!(
        rows = table.num_rows(),
        cols = table.num_columns(),
        bytes = bytes.len(),
        "encoded table"
    );
    Ok(bytes)
}

/// Read an encoded table back into canonical form.
pub fn decode(bytes: &[u8]) -> Result<CanonicalTable> {
    let reader = StreamReader::try_new(Cursor::new(bytes), None)?;
    let schema = reader.schema();
    let names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];

    for batch in reader {
        let batch = batch?;
        for (col, arr) in columns.iter_mut().zip(batch.columns()) {
            col.extend(array_to_values(arr.as_ref())?);
        }
    }

    CanonicalTable::new(names, columns)
}

/// Column names and wire kinds of an encoded table, without reading data.
pub fn read_schema(bytes: &[u8]) -> Result<Vec<ColumnSchema>> {
    let reader = StreamReader::try_new(Cursor::new(bytes), None)?;
    Ok(reader
        .schema()
        .fields()
        .iter()
        .map(|f| ColumnSchema {
            name: f.name().clone(),
            kind: ColumnKind::from_data_type(f.data_type()),
        })
        .collect())
}

/// `(rows, columns)` of an encoded table.
pub fn shape(bytes: &[u8]) -> Result<(usize, usize)> {
    let reader = StreamReader::try_new(Cursor::new(bytes), None)?;
    let n_cols = reader.schema().fields().len();
    let mut n_rows = 0;
    for batch in reader {
        n_rows += batch?.num_rows();
    }
    Ok((n_rows, n_cols))
}
