//! Core types for rebridge
//!
//! This crate defines the pieces every other layer builds on:
//! - DocPath: ordered field names from a root document to a target
//! - mutate: set / delete / push / pop against a deserialized tree
//! - Error: the error taxonomy surfaced to callers
//! - limits: path length, document size and nesting depth limits

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod mutate;
pub mod path;

pub use error::{value_type_name, Error, Result};
pub use limits::{LimitError, MAX_DOCUMENT_SIZE, MAX_NESTING_DEPTH, MAX_PATH_LENGTH};
pub use path::{DocPath, PathParseError};
