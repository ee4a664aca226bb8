//! Document engine for rebridge
//!
//! This crate wires paths, the nested mutator and a store together:
//! - Rebridge: root dispatcher, first-level name to cursor
//! - PathCursor: lazy navigation plus the terminal operations
//! - DocumentGateway: the read-modify-write cycle
//! - RebridgeConfig: namespace, write-back mode and limits

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod cursor;
pub mod db;
pub mod gateway;

pub use config::{ConcurrencyMode, RebridgeConfig, DEFAULT_NAMESPACE};
pub use cursor::{PathCursor, RESERVED_OPERATIONS, SEQUENCE_METHODS};
pub use db::Rebridge;
pub use gateway::DocumentGateway;
