//! Storage layer for rebridge
//!
//! This crate defines how root documents reach a backing store:
//! - DocumentStore: async hash-namespaced get/set, with optional
//!   version-stamped reads and conditional writes
//! - MemoryStore: DashMap-sharded in-process implementation with
//!   version stamps and fault injection
//!
//! Network-backed clients (Redis `HGET`/`HSET` and the like) implement
//! `DocumentStore` outside this crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;
pub mod store;

pub use memory::{MemoryStore, StoreOp};
pub use store::{CasOutcome, DocumentStore, VersionedBytes, ABSENT_VERSION};
