//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use async_trait::async_trait;
use rebridge::{
    CasOutcome, DocumentStore, MemoryStore, Rebridge, RebridgeConfig, Result, VersionedBytes,
};
use std::sync::Arc;
use std::sync::Once;

pub use rebridge::{json, Value};

/// Namespace every default handle writes to
pub const NS: &str = "rebridge";

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness, once per process
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Fresh in-memory store and a default handle over it
pub fn setup() -> (Arc<MemoryStore>, Rebridge) {
    setup_with(RebridgeConfig::default())
}

/// Fresh in-memory store and a handle with `config`
pub fn setup_with(config: RebridgeConfig) -> (Arc<MemoryStore>, Rebridge) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let db = Rebridge::with_config(store.clone(), config).unwrap();
    (store, db)
}

/// Parsed JSON stored under `root` in the default namespace
pub fn stored(store: &MemoryStore, root: &str) -> Option<Value> {
    store.raw_json(NS, root)
}

// ============================================================================
// YieldingStore - forces read/write interleaving between tasks
// ============================================================================

/// Wraps a [`MemoryStore`] and yields to the scheduler after every read, so
/// two concurrent cycles on the same root overlap their read and write.
#[derive(Debug)]
pub struct YieldingStore {
    inner: Arc<MemoryStore>,
}

impl YieldingStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DocumentStore for YieldingStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let bytes = self.inner.get(namespace, key).await?;
        tokio::task::yield_now().await;
        Ok(bytes)
    }

    async fn set(&self, namespace: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.inner.set(namespace, key, bytes).await
    }

    async fn get_versioned(&self, namespace: &str, key: &str) -> Result<Option<VersionedBytes>> {
        let read = self.inner.get_versioned(namespace, key).await?;
        tokio::task::yield_now().await;
        Ok(read)
    }

    async fn set_versioned(
        &self,
        namespace: &str,
        key: &str,
        bytes: Vec<u8>,
        expected_version: u64,
    ) -> Result<CasOutcome> {
        self.inner
            .set_versioned(namespace, key, bytes, expected_version)
            .await
    }
}

/// Handle over a [`YieldingStore`] wrapping a fresh [`MemoryStore`]
pub fn setup_yielding(config: RebridgeConfig) -> (Arc<MemoryStore>, Rebridge) {
    init_tracing();
    let inner = Arc::new(MemoryStore::new());
    let store = Arc::new(YieldingStore::new(inner.clone()));
    let db = Rebridge::with_config(store, config).unwrap();
    (inner, db)
}
