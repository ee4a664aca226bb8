//! In-process document store
//!
//! `MemoryStore` keeps every namespace in its own shard:
//!
//! - DashMap keyed by namespace, so different namespaces never contend
//! - FxHashMap inside a shard for O(1) key lookups
//! - One global `AtomicU64` handing out version stamps, so a stamp is never
//!   reused even after an entry is overwritten
//!
//! It implements the versioned pair of [`DocumentStore`], which makes it a
//! complete backend for both last-writer-wins and optimistic write-back.
//! Tests can make the next call of a given kind fail with
//! [`MemoryStore::fail_next`] to exercise store outages.

use crate::store::{CasOutcome, DocumentStore, VersionedBytes, ABSENT_VERSION};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use rebridge_core::{Error, Result};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Store call kinds that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// `get` and `get_versioned`
    Get,
    /// `set` and `set_versioned`
    Set,
}

#[derive(Debug, Clone)]
struct Entry {
    bytes: Vec<u8>,
    version: u64,
}

/// Entries of one namespace
#[derive(Debug, Default)]
struct Shard {
    data: FxHashMap<String, Entry>,
}

/// In-memory [`DocumentStore`]
///
/// # Example
///
/// ```ignore
/// use rebridge_storage::MemoryStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(MemoryStore::new());
/// store.put_raw("rebridge", "foo", br#"{"bar":1}"#.to_vec());
/// assert_eq!(store.raw("rebridge", "foo").unwrap(), br#"{"bar":1}"#);
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    shards: DashMap<String, Shard>,
    version: AtomicU64,
    failures: Mutex<Vec<StoreOp>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            shards: DashMap::new(),
            version: AtomicU64::new(ABSENT_VERSION),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Increment version and return new value
    #[inline]
    fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Make the next call of kind `op` fail with `StoreUnavailable`
    ///
    /// Calls queue up: two `fail_next(StoreOp::Get)` fail the next two reads.
    pub fn fail_next(&self, op: StoreOp) {
        self.failures.lock().push(op);
    }

    fn check_fault(&self, op: StoreOp) -> Result<()> {
        let mut failures = self.failures.lock();
        if let Some(pos) = failures.iter().position(|f| *f == op) {
            failures.remove(pos);
            debug!(?op, "injected store failure");
            return Err(Error::StoreUnavailable(format!(
                "injected {:?} failure",
                op
            )));
        }
        Ok(())
    }

    /// Read stored bytes without going through the async interface
    pub fn raw(&self, namespace: &str, key: &str) -> Option<Vec<u8>> {
        self.shards
            .get(namespace)
            .and_then(|shard| shard.data.get(key).map(|e| e.bytes.clone()))
    }

    /// Read a stored document as JSON, for assertions
    pub fn raw_json(&self, namespace: &str, key: &str) -> Option<serde_json::Value> {
        self.raw(namespace, key)
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }

    /// Store bytes without going through the async interface
    pub fn put_raw(&self, namespace: &str, key: &str, bytes: Vec<u8>) -> u64 {
        let version = self.next_version();
        self.shards
            .entry(namespace.to_string())
            .or_default()
            .data
            .insert(key.to_string(), Entry { bytes, version });
        version
    }

    /// Current version stamp of an entry ([`ABSENT_VERSION`] if absent)
    pub fn version_of(&self, namespace: &str, key: &str) -> u64 {
        self.shards
            .get(namespace)
            .and_then(|shard| shard.data.get(key).map(|e| e.version))
            .unwrap_or(ABSENT_VERSION)
    }

    /// Keys stored in a namespace, sorted
    pub fn keys(&self, namespace: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .shards
            .get(namespace)
            .map(|shard| shard.data.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Total number of entries across all namespaces
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.value().data.len()).sum()
    }

    /// Check if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_fault(StoreOp::Get)?;
        let bytes = self.raw(namespace, key);
        trace!(namespace, key, found = bytes.is_some(), "get");
        Ok(bytes)
    }

    async fn set(&self, namespace: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.check_fault(StoreOp::Set)?;
        trace!(namespace, key, len = bytes.len(), "set");
        self.put_raw(namespace, key, bytes);
        Ok(())
    }

    async fn get_versioned(&self, namespace: &str, key: &str) -> Result<Option<VersionedBytes>> {
        self.check_fault(StoreOp::Get)?;
        Ok(self.shards.get(namespace).and_then(|shard| {
            shard.data.get(key).map(|e| VersionedBytes {
                bytes: e.bytes.clone(),
                version: e.version,
            })
        }))
    }

    async fn set_versioned(
        &self,
        namespace: &str,
        key: &str,
        bytes: Vec<u8>,
        expected_version: u64,
    ) -> Result<CasOutcome> {
        self.check_fault(StoreOp::Set)?;
        // Shard guard held across compare and insert
        let mut shard = self.shards.entry(namespace.to_string()).or_default();
        let actual = shard
            .data
            .get(key)
            .map(|e| e.version)
            .unwrap_or(ABSENT_VERSION);
        if actual != expected_version {
            trace!(namespace, key, expected_version, actual, "set_versioned conflict");
            return Ok(CasOutcome::Conflict { actual });
        }
        let version = self.next_version();
        shard
            .data
            .insert(key.to_string(), Entry { bytes, version });
        Ok(CasOutcome::Committed { version })
    }
}
