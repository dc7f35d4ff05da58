// src/envelope/mod.rs
//! Wire container for one element's table payload.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ magic "TWEV" (4) │ version (1) │ flags (1)   │
//! ├──────────────────────────────────────────────┤
//! │ prior_row_count u64          (APPEND only)   │
//! ├──────────────────────────────────────────────┤
//! │ table: u64 len + Arrow IPC stream            │
//! ├──────────────────────────────────────────────┤
//! │ uuid, styles, display_values  (STYLED only)  │
//! │ caption                       (CAPTION only) │
//! ├──────────────────────────────────────────────┤
//! │ column config JSON            (COLUMNS only) │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! All integers little endian; every variable field is a u64 length
//! followed by its bytes.

mod wire;

use crate::encode;
use crate::error::{MarshalError, Result};
use crate::style::StyleOverlay;
use crate::table::CanonicalTable;

use wire::{Reader, Writer};

/// Magic bytes: "TWEV"
pub const MAGIC: [u8; 4] = *b"TWEV";

pub const FORMAT_VERSION: u8 = 1;

/// Header flags (bit positions)
pub mod flags {
    pub const STYLED: u8 = 0b0000_0001;
    pub const APPEND: u8 = 0b0000_0010;
    pub const CAPTION: u8 = 0b0000_0100;
    pub const COLUMNS: u8 = 0b0000_1000;

    pub const ALL: u8 = STYLED | APPEND | CAPTION | COLUMNS;
}

/// Style sub-record: overlay metadata plus the encoded display values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRecord {
    pub uuid: String,
    pub caption: Option<String>,
    /// Newline-joined CSS rules; empty when no rule survived.
    pub styles: String,
    /// Arrow IPC bytes of the display-values table.
    pub display_values: Vec<u8>,
}

impl StyleRecord {
    pub fn from_overlay(overlay: &StyleOverlay, display_values: Vec<u8>) -> Self {
        Self {
            uuid: overlay.uuid.clone(),
            caption: overlay.caption.clone(),
            styles: overlay.styles(),
            display_values,
        }
    }
}

/// Marks a payload as rows to append to an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendInfo {
    pub prior_row_count: u64,
}

impl AppendInfo {
    /// `prior_row_count` as an in-memory row index.
    pub fn prior_rows(&self) -> Result<usize> {
        usize::try_from(self.prior_row_count).map_err(|_| {
            MarshalError::envelope(format!(
                "prior row count {} does not fit in memory",
                self.prior_row_count
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    table: Vec<u8>,
    style: Option<StyleRecord>,
    append: Option<AppendInfo>,
    columns: Option<String>,
}

impl Envelope {
    /// Assemble an envelope. When a style record is given its display
    /// values must describe a table of the primary table's shape.
    pub fn build(
        table: Vec<u8>,
        style: Option<StyleRecord>,
        append: Option<AppendInfo>,
    ) -> Result<Self> {
        if let Some(style) = &style {
            let primary = encode::shape(&table)?;
            let display = encode::shape(&style.display_values)?;
            if primary != display {
                return Err(MarshalError::shape(format!(
                    "display values are {:?}, table is {:?}",
                    display, primary
                )));
            }
        }
        Ok(Self {
            table,
            style,
            append,
            columns: None,
        })
    }

    /// Attach a column configuration (JSON object).
    pub fn with_column_config(mut self, json: String) -> Self {
        self.columns = Some(json);
        self
    }

    pub fn table(&self) -> &[u8] {
        &self.table
    }

    pub fn style(&self) -> Option<&StyleRecord> {
        self.style.as_ref()
    }

    pub fn append_info(&self) -> Option<AppendInfo> {
        self.append
    }

    pub fn column_config(&self) -> Option<&str> {
        self.columns.as_deref()
    }

    pub fn is_append(&self) -> bool {
        self.append.is_some()
    }

    /// Rows carried by this envelope alone.
    pub fn row_count(&self) -> Result<usize> {
        Ok(encode::shape(&self.table)?.0)
    }

    /// Rows the element holds once this envelope has been applied.
    pub fn total_rows(&self) -> Result<usize> {
        let prior = match self.append {
            Some(info) => info.prior_rows()?,
            None => 0,
        };
        let rows = self.row_count()?;
        prior.checked_add(rows).ok_or_else(|| {
            MarshalError::envelope(format!("{} prior rows plus {} overflows", prior, rows))
        })
    }

    pub fn decode_table(&self) -> Result<CanonicalTable> {
        encode::decode(&self.table)
    }

    pub fn decode_display_values(&self) -> Result<Option<CanonicalTable>> {
        self.style
            .as_ref()
            .map(|s| encode::decode(&s.display_values))
            .transpose()
    }

    pub fn flags(&self) -> u8 {
        let mut f = 0;
        if let Some(style) = &self.style {
            f |= flags::STYLED;
            if style.caption.is_some() {
                f |= flags::CAPTION;
            }
        }
        if self.append.is_some() {
            f |= flags::APPEND;
        }
        if self.columns.is_some() {
            f |= flags::COLUMNS;
        }
        f
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::with_capacity(
            self.table.len()
                + self.style.as_ref().map_or(0, |s| s.display_values.len())
                + 64,
        );
        w.put_raw(&MAGIC);
        w.put_u8(FORMAT_VERSION);
        w.put_u8(self.flags());

        if let Some(a) = self.append {
            w.put_u64(a.prior_row_count);
        }
        w.put_bytes(&self.table);
        if let Some(style) = &self.style {
            w.put_str(&style.uuid);
            w.put_str(&style.styles);
            w.put_bytes(&style.display_values);
            if let Some(caption) = &style.caption {
                w.put_str(caption);
            }
        }
        if let Some(columns) = &self.columns {
            w.put_str(columns);
        }
        w.finish()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);

        // 1) header
        if r.take(4)? != MAGIC {
            return Err(MarshalError::envelope("bad magic"));
        }
        let version = r.u8()?;
        if version != FORMAT_VERSION {
            return Err(MarshalError::envelope(format!(
                "unsupported version {}",
                version
            )));
        }
        let f = r.u8()?;
        if f & !flags::ALL != 0 {
            return Err(MarshalError::envelope(format!("unknown flags {:#010b}", f)));
        }
        if f & flags::CAPTION != 0 && f & flags::STYLED == 0 {
            return Err(MarshalError::envelope("caption flag without style record"));
        }

        // 2) sections, in write order
        let append = if f & flags::APPEND != 0 {
            Some(AppendInfo {
                prior_row_count: r.u64()?,
            })
        } else {
            None
        };
        let table = r.bytes()?.to_vec();
        let style = if f & flags::STYLED != 0 {
            let uuid = r.string()?;
            let styles = r.string()?;
            let display_values = r.bytes()?.to_vec();
            let caption = if f & flags::CAPTION != 0 {
                Some(r.string()?)
            } else {
                None
            };
            Some(StyleRecord {
                uuid,
                caption,
                styles,
                display_values,
            })
        } else {
            None
        };
        let columns = if f & flags::COLUMNS != 0 {
            Some(r.string()?)
        } else {
            None
        };
        r.expect_end()?;

        let mut env = Self::build(table, style, append)?;
        env.columns = columns;
        Ok(env)
    }
}
