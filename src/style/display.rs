// src/style/display.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::trace;

use super::adapter::DisplayCell;
use crate::error::Result;
use crate::table::{CanonicalTable, Value};

static CELL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^row(\d+)_col(\d+)").expect("cell id regex should parse"));

/// `row3_col1` → `(3, 1)`. Header ids such as `level0_row0` give `None`.
pub fn parse_cell_id(id: &str) -> Option<(usize, usize)> {
    let caps = CELL_ID.captures(id)?;
    let row = caps.get(1)?.as_str().parse().ok()?;
    let col = caps.get(2)?.as_str().parse().ok()?;
    Some((row, col))
}

/// Build the display-values table for `base`.
///
/// Every cell is first rendered as a string on a private copy (a column
/// of mixed types could not be encoded otherwise), then each engine
/// display value overwrites its coordinate. Coordinates outside the
/// table are skipped.
///
/// Returns the string table and the overrides that were applied.
pub fn display_values(
    base: &CanonicalTable,
    body: &[DisplayCell],
    null_display: &str,
) -> Result<(CanonicalTable, BTreeMap<(usize, usize), String>)> {
    let (n_rows, n_cols) = base.shape();
    let mut columns: Vec<Vec<Value>> = base
        .columns()
        .iter()
        .map(|col| {
            col.iter()
                .map(|v| Value::Str(v.to_display_string(null_display)))
                .collect()
        })
        .collect();

    let mut overrides = BTreeMap::new();
    for cell in body {
        let Some((row, col)) = parse_cell_id(&cell.id) else {
            continue;
        };
        if row >= n_rows || col >= n_cols {
            trace!(id = %cell.id, "display value outside table, skipped");
            continue;
        }
        columns[col][row] = Value::Str(cell.display_value.clone());
        overrides.insert((row, col), cell.display_value.clone());
    }

    let table = CanonicalTable::new(base.names().to_vec(), columns)?;
    Ok((table, overrides))
}
