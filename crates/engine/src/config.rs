//! Gateway configuration via TOML
//!
//! Everything has a default, so an empty document is a valid config.
//! Applications usually embed a `[rebridge]` table in their own config
//! file and hand its text to [`RebridgeConfig::from_toml_str`].

use rebridge_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Hash namespace every root document lives in unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "rebridge";

/// How write-back copes with concurrent writers on the same root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Plain read then write. Two overlapping cycles on one root race and
    /// the later write-back silently discards the earlier update.
    #[default]
    LastWriterWins,
    /// Version-stamped read and conditional write, re-running the whole
    /// cycle on conflict. Requires a store with versioned operations.
    Optimistic,
}

/// Configuration for a [`crate::Rebridge`] handle.
///
/// # Example
///
/// ```toml
/// namespace = "rebridge"
/// concurrency = "optimistic"
/// max_retries = 8
/// validate_limits = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebridgeConfig {
    /// Hash namespace holding the root documents
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Write-back strategy
    #[serde(default)]
    pub concurrency: ConcurrencyMode,
    /// Extra attempts after a version conflict (optimistic mode only)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Check path length, document size and nesting depth before writing
    ///
    /// Size and depth apply to the document as it stands after the
    /// mutation, so an over-deep stored root can still be read and can be
    /// made shallower with `delete`, but any write that leaves it over the
    /// limit fails with `LimitExceeded`.
    #[serde(default = "default_validate_limits")]
    pub validate_limits: bool,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_max_retries() -> u32 {
    8
}

fn default_validate_limits() -> bool {
    true
}

impl Default for RebridgeConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            concurrency: ConcurrencyMode::default(),
            max_retries: default_max_retries(),
            validate_limits: default_validate_limits(),
        }
    }
}

impl RebridgeConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` on malformed TOML, unknown enum
    /// values, or values rejected by [`RebridgeConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RebridgeConfig =
            toml::from_str(text).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            return Err(Error::InvalidConfig(
                "namespace must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Use a different hash namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Switch to optimistic write-back with the given retry budget
    pub fn optimistic(mut self, max_retries: u32) -> Self {
        self.concurrency = ConcurrencyMode::Optimistic;
        self.max_retries = max_retries;
        self
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Rebridge configuration
#
# Hash namespace holding every root document
namespace = "rebridge"

# Write-back strategy: "last_writer_wins" (default) or "optimistic"
#   "last_writer_wins" = read then write; concurrent updates to one root may be lost
#   "optimistic"       = version-checked write, whole cycle retried on conflict
concurrency = "last_writer_wins"

# Extra attempts after a version conflict (optimistic mode only)
max_retries = 8

# Check path length, document size and nesting depth before writing
validate_limits = true
"#
    }
}
