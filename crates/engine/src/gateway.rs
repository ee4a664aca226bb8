//! DocumentGateway: read-modify-write against the store
//!
//! ## Design: ONE CYCLE PER CALL
//!
//! The gateway holds the store handle and the config. It keeps no copy
//! of any document: every call fetches the root document, works on a
//! private deserialized tree and (for mutations) writes it back.
//!
//! ## Cycle
//!
//! 1. Fetch the serialized root document (`get` / `get_versioned`)
//! 2. Deserialize; bad bytes are `Error::Corrupt`
//! 3. Apply the mutation in memory
//! 4. Serialize, check limits, write back (`set` / `set_versioned`)
//! 5. Return the mutation's result
//!
//! Any error before step 4 leaves the store untouched.
//!
//! ## Concurrency
//!
//! In `LastWriterWins` mode two overlapping cycles on one root both read
//! the same state and the later write-back wins. `Optimistic` mode writes
//! conditionally on the version read in step 1 and re-runs the cycle on
//! conflict, up to `max_retries` extra times.

use crate::config::{ConcurrencyMode, RebridgeConfig};
use rebridge_core::{limits, mutate, DocPath, Error, Result};
use rebridge_storage::{CasOutcome, DocumentStore, ABSENT_VERSION};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Runs read and read-modify-write cycles for root documents
#[derive(Debug)]
pub struct DocumentGateway {
    store: Arc<dyn DocumentStore>,
    config: RebridgeConfig,
}

impl DocumentGateway {
    /// Create a gateway over `store`
    pub fn new(store: Arc<dyn DocumentStore>, config: RebridgeConfig) -> Self {
        Self { store, config }
    }

    /// Active configuration
    pub fn config(&self) -> &RebridgeConfig {
        &self.config
    }

    /// Fetch and deserialize a whole root document
    ///
    /// Returns `None` when nothing is stored under `root`.
    pub async fn fetch(&self, root: &str) -> Result<Option<Value>> {
        let bytes = self.store.get(&self.config.namespace, root).await?;
        bytes.map(|b| decode(root, &b)).transpose()
    }

    /// Read the value at `path` inside root document `root`
    ///
    /// `None` if the document is absent or any step along the path is
    /// missing. Never writes.
    pub async fn read(&self, root: &str, path: &DocPath) -> Result<Option<Value>> {
        self.check_path(path)?;
        debug!(root, path = %path, "read");
        let Some(doc) = self.fetch(root).await? else {
            return Ok(None);
        };
        Ok(mutate::get(&doc, path).cloned())
    }

    /// Run one read-modify-write cycle
    ///
    /// `apply` receives the deserialized document (`Value::Null` when the
    /// root is absent). In optimistic mode it may run more than once, each
    /// time against a fresh read.
    pub async fn mutate<T, F>(&self, root: &str, path: &DocPath, op: &'static str, apply: F) -> Result<T>
    where
        F: FnMut(&mut Value) -> Result<T> + Send,
        T: Send,
    {
        self.check_path(path)?;
        debug!(root, path = %path, op, mode = ?self.config.concurrency, "mutate");
        // Assigning the root replaces it outright, null included
        let fill_absent = !(op == "set" && path.is_root());
        match self.config.concurrency {
            ConcurrencyMode::LastWriterWins => self.mutate_once(root, fill_absent, apply).await,
            ConcurrencyMode::Optimistic => {
                self.mutate_optimistic(root, fill_absent, apply).await
            }
        }
    }

    async fn mutate_once<T, F>(&self, root: &str, fill_absent: bool, mut apply: F) -> Result<T>
    where
        F: FnMut(&mut Value) -> Result<T> + Send,
        T: Send,
    {
        let ns = self.config.namespace.as_str();
        let current = self.store.get(ns, root).await?;
        let was_absent = fill_absent && current.is_none();
        let mut doc = match current {
            Some(bytes) => decode(root, &bytes)?,
            None => Value::Null,
        };

        let result = apply(&mut doc)?;

        let bytes = self.encode(root, doc, was_absent)?;
        self.store.set(ns, root, bytes).await?;
        Ok(result)
    }

    async fn mutate_optimistic<T, F>(
        &self,
        root: &str,
        fill_absent: bool,
        mut apply: F,
    ) -> Result<T>
    where
        F: FnMut(&mut Value) -> Result<T> + Send,
        T: Send,
    {
        let ns = self.config.namespace.as_str();
        let attempts = self.config.max_retries.saturating_add(1);

        for attempt in 1..=attempts {
            let (mut doc, expected, was_absent) = match self.store.get_versioned(ns, root).await? {
                Some(read) => (decode(root, &read.bytes)?, read.version, false),
                None => (Value::Null, ABSENT_VERSION, fill_absent),
            };

            let result = apply(&mut doc)?;

            let bytes = self.encode(root, doc, was_absent)?;
            match self.store.set_versioned(ns, root, bytes, expected).await? {
                CasOutcome::Committed { version } => {
                    trace!(root, attempt, version, "committed");
                    return Ok(result);
                }
                CasOutcome::Conflict { actual } => {
                    warn!(root, attempt, expected, actual, "version conflict on write-back");
                }
            }
        }

        Err(Error::VersionConflict {
            root: root.to_string(),
            attempts,
        })
    }

    fn check_path(&self, path: &DocPath) -> Result<()> {
        if self.config.validate_limits {
            path.validate()?;
        }
        Ok(())
    }

    /// Serialize for write-back. A root that was absent and is still null
    /// after the mutation is written as an empty object, unless the
    /// mutation assigned the root itself.
    fn encode(&self, root: &str, mut doc: Value, was_absent: bool) -> Result<Vec<u8>> {
        if was_absent && doc.is_null() {
            doc = Value::Object(Map::new());
        }
        if self.config.validate_limits {
            limits::validate_depth(&doc)?;
        }
        let bytes = serde_json::to_vec(&doc).map_err(|e| Error::Corrupt {
            root: root.to_string(),
            reason: e.to_string(),
        })?;
        if self.config.validate_limits {
            limits::validate_size(&bytes)?;
        }
        trace!(root, len = bytes.len(), "encoded");
        Ok(bytes)
    }
}

fn decode(root: &str, bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| Error::Corrupt {
        root: root.to_string(),
        reason: e.to_string(),
    })
}
