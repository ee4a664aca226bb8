//! Rebridge: entry point over a document store
//!
//! `Rebridge` turns a first-level name into a [`PathCursor`] bound to the
//! root document of that name. It holds only an `Arc<DocumentGateway>`;
//! cursors clone that `Arc`, so a cursor keeps using the store it was
//! created from even if the application builds a new `Rebridge` later.
//!
//! # Example
//!
//! ```ignore
//! use rebridge_engine::Rebridge;
//! use rebridge_storage::MemoryStore;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let db = Rebridge::new(Arc::new(MemoryStore::new()));
//!
//! db.get("foo")?.get("bar")?.set(json!(1)).await?;
//! assert_eq!(db.get("foo")?.get("bar")?.await?, Some(json!(1)));
//!
//! db.get("list")?.push(json!(1)).await?;
//! let last = db.get("list")?.pop().await?;
//! ```

use crate::config::RebridgeConfig;
use crate::cursor::PathCursor;
use crate::gateway::DocumentGateway;
use rebridge_core::{DocPath, Error, Result};
use rebridge_storage::DocumentStore;
use std::sync::Arc;

/// Root dispatcher over one store and namespace
#[derive(Debug, Clone)]
pub struct Rebridge {
    gateway: Arc<DocumentGateway>,
}

impl Rebridge {
    /// Bind to `store` with the default configuration
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            gateway: Arc::new(DocumentGateway::new(store, RebridgeConfig::default())),
        }
    }

    /// Bind to `store` with an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `config` fails validation.
    pub fn with_config(store: Arc<dyn DocumentStore>, config: RebridgeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            gateway: Arc::new(DocumentGateway::new(store, config)),
        })
    }

    /// Cursor on the root document called `name`
    ///
    /// No store access happens here.
    ///
    /// # Errors
    ///
    /// `set` has no parent container to assign into and is rejected with
    /// `UnsupportedOperation`. `delete`, `push` and `pop` are ordinary
    /// root names.
    pub fn get(&self, name: &str) -> Result<PathCursor> {
        if name == "set" {
            return Err(Error::UnsupportedOperation(
                "You can't call .set on the root object. Syntax: db.get(\"foo\")?.set(bar)"
                    .to_string(),
            ));
        }
        Ok(self.field(name))
    }

    /// Cursor on the root document called `name`, without any name check
    pub fn field(&self, name: impl Into<String>) -> PathCursor {
        let name: String = name.into();
        PathCursor::new(Arc::clone(&self.gateway), Arc::from(name), DocPath::root())
    }

    /// Active configuration
    pub fn config(&self) -> &RebridgeConfig {
        self.gateway.config()
    }

    /// Hash namespace holding the root documents
    pub fn namespace(&self) -> &str {
        &self.gateway.config().namespace
    }
}
