//! Document size limits
//!
//! Enforced on the write-back path so an oversized or pathologically
//! nested document never reaches the store.
//!
//! | Limit | Value | Constant |
//! |-------|-------|----------|
//! | Max document size | 16 MB | [`MAX_DOCUMENT_SIZE`] |
//! | Max nesting depth | 100 levels | [`MAX_NESTING_DEPTH`] |
//! | Max path length | 256 steps | [`MAX_PATH_LENGTH`] |

use serde_json::Value;
use thiserror::Error;

/// Maximum serialized document size in bytes (16 MB)
pub const MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Maximum nesting depth in a document (100 levels)
///
/// Keeps recursive serialization and traversal off the end of the stack.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Maximum path length in steps (256 steps)
pub const MAX_PATH_LENGTH: usize = 256;

/// Error type for limit violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Document exceeds maximum size
    #[error("document size {size} exceeds maximum of {max} bytes")]
    DocumentTooLarge {
        /// Actual document size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// Document nesting exceeds maximum depth
    #[error("document nesting depth {depth} exceeds maximum of {max} levels")]
    NestingTooDeep {
        /// Actual nesting depth
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// Path exceeds maximum length
    #[error("path length {length} exceeds maximum of {max} steps")]
    PathTooLong {
        /// Actual path length
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
}

/// Nesting depth of a value; scalars are depth 0
pub fn nesting_depth(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(nesting_depth).max().unwrap_or(0),
        Value::Array(items) => 1 + items.iter().map(nesting_depth).max().unwrap_or(0),
        _ => 0,
    }
}

/// Check a document's nesting depth
pub fn validate_depth(value: &Value) -> Result<(), LimitError> {
    let depth = nesting_depth(value);
    if depth > MAX_NESTING_DEPTH {
        return Err(LimitError::NestingTooDeep {
            depth,
            max: MAX_NESTING_DEPTH,
        });
    }
    Ok(())
}

/// Check a serialized document's size
pub fn validate_size(bytes: &[u8]) -> Result<(), LimitError> {
    if bytes.len() > MAX_DOCUMENT_SIZE {
        return Err(LimitError::DocumentTooLarge {
            size: bytes.len(),
            max: MAX_DOCUMENT_SIZE,
        });
    }
    Ok(())
}
