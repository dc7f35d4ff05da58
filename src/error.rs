// src/error.rs

/// Result alias used across the marshalling core.
pub type Result<T> = std::result::Result<T, MarshalError>;

/// Everything a single marshalling call can fail with.
///
/// Errors are returned to the caller of that call only; nothing here is
/// retried or cached.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MarshalError {
    /// Unsupported or inconsistent input shape.
    #[error("shape error: {0}")]
    Shape(String),

    /// The translated style structure could not be understood.
    #[error("style introspection failed: {0}")]
    StyleIntrospection(String),

    /// An append batch does not line up with the table it extends.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// An append envelope was applied against the wrong row count.
    #[error("append out of order: expected prior row count {expected}, got {found}")]
    AppendOrder { expected: usize, found: usize },

    /// Envelope bytes are malformed.
    #[error("envelope error: {0}")]
    Envelope(String),

    /// A column configuration failed validation.
    #[error("invalid column config for `{column}`: {message}")]
    InvalidColumnConfig { column: String, message: String },

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MarshalError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    pub(crate) fn style(msg: impl Into<String>) -> Self {
        Self::StyleIntrospection(msg.into())
    }

    pub(crate) fn mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    pub(crate) fn envelope(msg: impl Into<String>) -> Self {
        Self::Envelope(msg.into())
    }
}
