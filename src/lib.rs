//! Rebridge - path-based access to JSON documents in a hash key-value store
//!
//! Each root document is stored as JSON text under its own key in one hash
//! namespace (default `"rebridge"`). Callers navigate with a cursor and
//! nothing touches the store until a terminal operation runs.
//!
//! # Quick Start
//!
//! ```ignore
//! use rebridge::{json, MemoryStore, Rebridge};
//! use std::sync::Arc;
//!
//! let db = Rebridge::new(Arc::new(MemoryStore::new()));
//!
//! // Writes {"bar": 1} under "foo"
//! db.get("foo")?.get("bar")?.set(json!(1)).await?;
//!
//! // Awaiting a cursor reads the value at its path
//! let bar = db.get("foo")?.get("bar")?.await?;
//!
//! // Arrays
//! db.get("list")?.push(json!(1)).await?;
//! let last = db.get("list")?.pop().await?;
//! ```
//!
//! # Architecture
//!
//! [`Rebridge`] hands out [`PathCursor`]s. Terminal operations on a cursor
//! go through the [`DocumentGateway`], which fetches the root document,
//! applies one of the [`mutate`] functions and writes the result back to
//! the [`DocumentStore`].

pub use rebridge_core::{
    limits, mutate, value_type_name, DocPath, Error, LimitError, PathParseError, Result,
    MAX_DOCUMENT_SIZE, MAX_NESTING_DEPTH, MAX_PATH_LENGTH,
};
pub use rebridge_engine::{
    ConcurrencyMode, DocumentGateway, PathCursor, Rebridge, RebridgeConfig, DEFAULT_NAMESPACE,
    RESERVED_OPERATIONS, SEQUENCE_METHODS,
};
pub use rebridge_storage::{
    CasOutcome, DocumentStore, MemoryStore, StoreOp, VersionedBytes, ABSENT_VERSION,
};
pub use serde_json::{json, Value};
