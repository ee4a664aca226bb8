//! Error types for rebridge
//!
//! This module defines all error types surfaced by the document layer.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Store- and data-shape errors come back as rejected operations; usage
//! errors (`UnsupportedOperation`, `InvalidUsage`) are raised at the call
//! site before any store access.

use crate::limits::LimitError;
use thiserror::Error;

/// Result type alias for rebridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the document layer
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Underlying store get/set failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Stored bytes are not valid serialized JSON
    #[error("Corrupt document '{root}': {reason}")]
    Corrupt {
        /// Root document name
        root: String,
        /// Deserializer message
        reason: String,
    },

    /// Sequence-index style access, root-level `set`, or a store capability
    /// that is not implemented
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Target of a mutation has the wrong shape
    #[error("Type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected shape
        expected: &'static str,
        /// Shape actually found
        found: &'static str,
        /// Dotted path of the offending node
        path: String,
    },

    /// Reserved operation name used where a field name was expected
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),

    /// Path or document exceeds a configured limit
    #[error("Limit exceeded: {0}")]
    LimitExceeded(#[from] LimitError),

    /// Optimistic write-back lost every race
    #[error("Version conflict on '{root}' after {attempts} attempts")]
    VersionConflict {
        /// Root document name
        root: String,
        /// Number of read-modify-write attempts made
        attempts: u32,
    },

    /// Configuration could not be parsed or holds an invalid value
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Build a `TypeMismatch` for the node `value` found at `path`
    pub fn type_mismatch(
        expected: &'static str,
        value: &serde_json::Value,
        path: impl Into<String>,
    ) -> Self {
        Error::TypeMismatch {
            expected,
            found: value_type_name(value),
            path: path.into(),
        }
    }

    /// Whether the caller may reasonably retry the whole operation
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::StoreUnavailable(_) | Error::VersionConflict { .. }
        )
    }
}

/// Type name of a JSON node, for error messages
pub fn value_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
