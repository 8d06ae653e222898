//! Error types for the data-cleaning transforms.
//!
//! Every transform validates its inputs before touching any data, so an error
//! always means "nothing was computed". The taxonomy mirrors the three ways a
//! caller can get an input wrong:
//!
//! - [`FixrError::Type`]: the table has the wrong shape (no columns, no
//!   numeric columns).
//! - [`FixrError::Value`]: a parameter is outside its allowed set, or a
//!   numeric precondition does not hold.
//! - [`FixrError::Key`]: a requested column does not exist.
//!
//! Errors are serializable as `{code, message}` so they can be handed to a
//! reporting layer unchanged.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// Coarse classification of a [`FixrError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structural problem with the input table.
    Type,
    /// Unsupported parameter or failed numeric precondition.
    Value,
    /// Lookup of a column name failed.
    Key,
    /// Failure inside the table library or serialization layer.
    Internal,
}

/// The main error type for the cleaning transforms.
#[derive(Error, Debug)]
pub enum FixrError {
    /// The table is structurally unsuitable for the requested transform.
    #[error("{0}")]
    Type(String),

    /// A parameter or data precondition was violated.
    #[error("{0}")]
    Value(String),

    /// One or more requested columns are absent from the table.
    #[error("Columns not found in DataFrame: {missing:?}")]
    Key { missing: Vec<String> },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigValidationError),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FixrError>,
    },
}

impl FixrError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FixrError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for downstream handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Type(_) => "TYPE_ERROR",
            Self::Value(_) => "VALUE_ERROR",
            Self::Key { .. } => "KEY_ERROR",
            Self::Config(_) => "INVALID_CONFIG",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Classify the error. Context wrappers report the kind of their source.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Type(_) => ErrorKind::Type,
            Self::Value(_) | Self::Config(_) => ErrorKind::Value,
            Self::Key { .. } => ErrorKind::Key,
            Self::Polars(_) | Self::Json(_) => ErrorKind::Internal,
            Self::WithContext { source, .. } => source.kind(),
        }
    }

    pub fn is_type_error(&self) -> bool {
        self.kind() == ErrorKind::Type
    }

    pub fn is_value_error(&self) -> bool {
        self.kind() == ErrorKind::Value
    }

    pub fn is_key_error(&self) -> bool {
        self.kind() == ErrorKind::Key
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for FixrError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("FixrError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, FixrError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| FixrError::Polars(e).with_context(context))
    }
}
