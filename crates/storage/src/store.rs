//! Store client trait
//!
//! The document layer talks to its backing store through [`DocumentStore`]:
//! a hash-namespaced key-value store holding one serialized root document
//! per key. The trait is runtime-agnostic and uses `async_trait` so
//! network-backed clients can implement it with whatever transport they
//! carry.
//!
//! Only `get` and `set` are required. The versioned pair is optional and
//! backs optimistic write-back; stores without version stamps keep the
//! default implementations, which report `UnsupportedOperation`.
//!
//! ## Example
//!
//! ```ignore
//! use rebridge_storage::DocumentStore;
//!
//! #[derive(Debug)]
//! struct MyStore { /* ... */ }
//!
//! #[async_trait]
//! impl DocumentStore for MyStore {
//!     async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
//!         // HGET namespace key
//!     }
//!     async fn set(&self, namespace: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
//!         // HSET namespace key bytes
//!     }
//! }
//! ```

use async_trait::async_trait;
use rebridge_core::{Error, Result};
use std::fmt::Debug;

/// Version stamp of an absent entry
pub const ABSENT_VERSION: u64 = 0;

/// Bytes read together with the version stamp they were written at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedBytes {
    /// Serialized document
    pub bytes: Vec<u8>,
    /// Version stamp; never [`ABSENT_VERSION`]
    pub version: u64,
}

/// Result of a conditional write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// Write applied; the entry now carries `version`
    Committed {
        /// New version stamp
        version: u64,
    },
    /// Entry moved on since it was read; nothing written
    Conflict {
        /// Version stamp currently stored
        actual: u64,
    },
}

/// Hash-namespaced store of serialized root documents
#[async_trait]
pub trait DocumentStore: Debug + Send + Sync {
    /// Read the bytes stored under `key` in `namespace`
    ///
    /// Returns `Ok(None)` when nothing is stored. Transport failures come
    /// back as `Error::StoreUnavailable`.
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `bytes` under `key` in `namespace`, replacing any previous value
    async fn set(&self, namespace: &str, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Read bytes with their version stamp
    async fn get_versioned(&self, namespace: &str, key: &str) -> Result<Option<VersionedBytes>> {
        let _ = (namespace, key);
        Err(Error::UnsupportedOperation(
            "store does not support versioned reads".to_string(),
        ))
    }

    /// Store `bytes` only if the entry is still at `expected_version`
    ///
    /// `expected_version == ABSENT_VERSION` means "only if absent".
    async fn set_versioned(
        &self,
        namespace: &str,
        key: &str,
        bytes: Vec<u8>,
        expected_version: u64,
    ) -> Result<CasOutcome> {
        let _ = (namespace, key, bytes, expected_version);
        Err(Error::UnsupportedOperation(
            "store does not support versioned writes".to_string(),
        ))
    }
}
