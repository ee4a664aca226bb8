//! PathCursor: lazy navigation into one root document
//!
//! A cursor is a root name plus a [`DocPath`]. Navigating never touches the
//! store; it returns a new cursor with one more step. Only the terminal
//! operations (`read`, `set`, `delete`, `push`, `pop`) run a cycle through
//! the [`DocumentGateway`].
//!
//! ## Navigation
//!
//! - [`PathCursor::get`] is the checked step. Operation names (`set`,
//!   `delete`, `push`, `pop`) are rejected with `InvalidUsage` and
//!   array-method names with `UnsupportedOperation`.
//! - [`PathCursor::field`] appends any name verbatim. It is the only way
//!   to reach a data field literally called `set` or `length`.
//!
//! A cursor can also be awaited directly, which is the same as `read()`:
//!
//! ```ignore
//! let name = db.get("user")?.get("name")?.await?;
//! ```

use crate::gateway::DocumentGateway;
use rebridge_core::{mutate, DocPath, Error, Result};
use serde_json::Value;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

/// Names that are terminal operations on a cursor
pub const RESERVED_OPERATIONS: [&str; 4] = ["set", "delete", "push", "pop"];

/// Array-method vocabulary that is not supported as navigation
pub const SEQUENCE_METHODS: &[&str] = &[
    "at",
    "concat",
    "copyWithin",
    "entries",
    "every",
    "fill",
    "filter",
    "find",
    "findIndex",
    "findLast",
    "findLastIndex",
    "flat",
    "flatMap",
    "forEach",
    "includes",
    "indexOf",
    "join",
    "keys",
    "lastIndexOf",
    "length",
    "map",
    "reduce",
    "reduceRight",
    "reverse",
    "shift",
    "slice",
    "some",
    "sort",
    "splice",
    "toLocaleString",
    "toReversed",
    "toSorted",
    "toSpliced",
    "toString",
    "unshift",
    "values",
    "with",
    "constructor",
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
    "valueOf",
    "__proto__",
];

/// Fail fast on names `get` must not record as a path step
pub(crate) fn check_navigable(name: &str) -> Result<()> {
    if RESERVED_OPERATIONS.contains(&name) {
        return Err(Error::InvalidUsage(format!(
            "'{name}' is an operation, not a field: call .{name}(..) on the cursor, \
             or use .field(\"{name}\") to reach a field named '{name}'"
        )));
    }
    if SEQUENCE_METHODS.contains(&name) {
        return Err(Error::UnsupportedOperation(format!(
            "Calling {name} on Rebridge objects is not yet supported."
        )));
    }
    Ok(())
}

/// Handle on a location inside one root document
#[derive(Debug, Clone)]
pub struct PathCursor {
    gateway: Arc<DocumentGateway>,
    root: Arc<str>,
    path: DocPath,
}

impl PathCursor {
    pub(crate) fn new(gateway: Arc<DocumentGateway>, root: Arc<str>, path: DocPath) -> Self {
        Self {
            gateway,
            root,
            path,
        }
    }

    /// Name of the root document this cursor is bound to
    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// Steps walked from the root document
    pub fn path(&self) -> &DocPath {
        &self.path
    }

    /// Navigate one field further
    ///
    /// # Errors
    ///
    /// - `InvalidUsage` for `set`, `delete`, `push`, `pop`
    /// - `UnsupportedOperation` for array-method names such as `length`
    pub fn get(&self, name: &str) -> Result<PathCursor> {
        check_navigable(name)?;
        Ok(self.field(name))
    }

    /// Navigate one field further without any name check
    pub fn field(&self, name: impl Into<String>) -> PathCursor {
        PathCursor {
            gateway: Arc::clone(&self.gateway),
            root: Arc::clone(&self.root),
            path: self.path.clone().key(name),
        }
    }

    /// Value at this location, `None` if absent
    pub async fn read(&self) -> Result<Option<Value>> {
        self.gateway.read(&self.root, &self.path).await
    }

    /// Assign `value` here, creating missing parents as objects
    ///
    /// On the bare root cursor this replaces the whole root document.
    /// Returns the assigned value.
    pub async fn set(&self, value: Value) -> Result<Value> {
        let path = &self.path;
        self.gateway
            .mutate(&self.root, path, "set", |doc| {
                mutate::set(doc, path, value.clone())
            })
            .await
    }

    /// Remove field `key` from the object here
    ///
    /// Returns `true` if a field was removed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let path = &self.path;
        self.gateway
            .mutate(&self.root, path, "delete", |doc| mutate::delete(doc, path, key))
            .await
    }

    /// Append `value` to the array here, returning its new length
    pub async fn push(&self, value: Value) -> Result<usize> {
        let path = &self.path;
        self.gateway
            .mutate(&self.root, path, "push", |doc| {
                mutate::push(doc, path, value.clone())
            })
            .await
    }

    /// Remove and return the last element of the array here
    pub async fn pop(&self) -> Result<Option<Value>> {
        let path = &self.path;
        self.gateway
            .mutate(&self.root, path, "pop", |doc| mutate::pop(doc, path))
            .await
    }
}

impl IntoFuture for PathCursor {
    type Output = Result<Option<Value>>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.read().await })
    }
}
