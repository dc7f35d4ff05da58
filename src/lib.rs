// src/lib.rs
//! Tabular data marshalling: turn dataframe-like inputs into compact
//! Arrow-backed envelopes, with optional style overlays and row appends.

pub mod append;
pub mod column_config;
pub mod config;
pub mod encode;
pub mod envelope;
pub mod error;
pub mod marshal;
pub mod normalize;
pub mod style;
pub mod table;

pub use column_config::{ColumnConfig, ColumnConfigs, ColumnType};
pub use config::MarshalConfig;
pub use envelope::{AppendInfo, Envelope, StyleRecord};
pub use error::{MarshalError, Result};
pub use marshal::{default_uuid, Marshaller};
pub use normalize::{Frame, NdArray, TableInput};
pub use style::{StyleOverlay, Styler};
pub use table::{CanonicalTable, ColumnKind, ColumnSchema, Value};
