// src/append/mod.rs
//! Incremental row appends onto an already-delivered table.

use tracing::{debug, warn};

use crate::encode;
use crate::envelope::{AppendInfo, Envelope};
use crate::error::{MarshalError, Result};
use crate::table::{CanonicalTable, ColumnKind, ColumnSchema};

/// Check `batch` against the base schema and return the schema the delta
/// is encoded with.
///
/// A base without columns (an empty table) takes the batch schema as is.
/// Otherwise names must match exactly and in order, and a column whose
/// base kind is still `Null` takes the batch's kind.
pub fn merge_schema(base: &[ColumnSchema], batch: &CanonicalTable) -> Result<Vec<ColumnSchema>> {
    if base.is_empty() {
        return Ok(batch.schema());
    }
    if base.len() != batch.num_columns() {
        return Err(MarshalError::mismatch(format!(
            "base has {} columns, batch has {}",
            base.len(),
            batch.num_columns()
        )));
    }

    base.iter()
        .zip(batch.schema())
        .map(|(b, n)| {
            if b.name != n.name {
                return Err(MarshalError::mismatch(format!(
                    "column '{}' where '{}' was expected",
                    n.name, b.name
                )));
            }
            if !b.kind.accepts(n.kind) {
                return Err(MarshalError::mismatch(format!(
                    "column '{}' is {}, batch has {}",
                    b.name, b.kind, n.kind
                )));
            }
            let kind = if b.kind == ColumnKind::Null {
                n.kind
            } else {
                b.kind
            };
            Ok(ColumnSchema { name: b.name.clone(), kind })
        })
        .collect()
}

/// Encode `batch` as rows following `prior_row_count` existing rows of a
/// table with schema `base`.
pub fn append(
    prior_row_count: usize,
    base: &[ColumnSchema],
    batch: &CanonicalTable,
) -> Result<Envelope> {
    let schema = merge_schema(base, batch)?;
    let bytes = encode::encode_with_schema(batch, &schema)?;
    debug!(
        prior = prior_row_count,
        rows = batch.num_rows(),
        "encoded append delta"
    );
    Envelope::build(
        bytes,
        None,
        Some(AppendInfo {
            prior_row_count: prior_row_count as u64,
        }),
    )
}

/// Append after `prior`, which may itself be a full payload or a delta.
pub fn append_to(prior: &Envelope, batch: &CanonicalTable) -> Result<Envelope> {
    let base = encode::read_schema(prior.table())?;
    append(prior.total_rows()?, &base, batch)
}

/// Replay a sequence of envelopes the way a receiver would.
///
/// A full payload replaces everything seen so far; a delta must start
/// exactly where the accumulated table ends. A delta onto a table with no
/// columns supplies the columns.
pub fn reconstruct<'a, I>(envelopes: I) -> Result<CanonicalTable>
where
    I: IntoIterator<Item = &'a Envelope>,
{
    let mut acc: Option<CanonicalTable> = None;
    for env in envelopes {
        let table = env.decode_table()?;
        acc = match (env.append_info(), acc) {
            (None, _) => Some(table),
            (Some(info), Some(base)) => {
                let found = info.prior_rows()?;
                if found != base.num_rows() {
                    warn!(expected = base.num_rows(), found, "out-of-order append");
                    return Err(MarshalError::AppendOrder {
                        expected: base.num_rows(),
                        found,
                    });
                }
                if base.num_columns() == 0 {
                    Some(table)
                } else {
                    Some(base.concat(&table)?)
                }
            }
            (Some(_), None) => {
                return Err(MarshalError::envelope("append before any full payload"));
            }
        };
    }
    Ok(acc.unwrap_or_else(CanonicalTable::empty))
}
