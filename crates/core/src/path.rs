//! Document paths
//!
//! A [`DocPath`] is the ordered list of field names a cursor has walked
//! from its root document. Paths only grow: cursors extend them with
//! [`DocPath::key`] and never pop or reorder steps.
//!
//! # Path Syntax
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | (empty) | Root document |
//! | `user` | Field `user` |
//! | `user.name` | Field `name` inside `user` |
//!
//! The dotted text form is for display, logging and tests. Steps are
//! always field names; a decimal step descends into a sequence only when
//! reading or walking an existing sequence.

use crate::limits::{LimitError, MAX_PATH_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Empty step in path (`a..b`, leading or trailing dot)
    #[error("empty step in path at position {0}")]
    EmptyStep(usize),
}

/// A path into a root document
///
/// # Examples
///
/// ```
/// use rebridge_core::DocPath;
///
/// let root = DocPath::root();
/// let name = DocPath::root().key("user").key("name");
///
/// let parsed: DocPath = "user.name".parse().unwrap();
/// assert_eq!(parsed, name);
/// assert!(root.is_root());
/// assert_eq!(name.to_string(), "user.name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct DocPath {
    steps: Vec<String>,
}

impl DocPath {
    /// Create the root path (empty path)
    pub fn root() -> Self {
        DocPath { steps: Vec::new() }
    }

    /// Create a path from a list of steps
    pub fn from_steps<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DocPath {
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the path steps
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Get the number of steps in the path
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the path has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append a step (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.steps.push(key.into());
        self
    }

    /// Split into the parent steps and the last step (None if root)
    pub fn split_last(&self) -> Option<(&str, &[String])> {
        self.steps
            .split_last()
            .map(|(last, parent)| (last.as_str(), parent))
    }

    /// Validate path length against [`MAX_PATH_LENGTH`]
    pub fn validate(&self) -> Result<(), LimitError> {
        if self.steps.len() > MAX_PATH_LENGTH {
            return Err(LimitError::PathTooLong {
                length: self.steps.len(),
                max: MAX_PATH_LENGTH,
            });
        }
        Ok(())
    }
}

/// Dotted text of the first `len` steps, for error messages
pub(crate) fn prefix_string(steps: &[String], len: usize) -> String {
    if len == 0 || steps.is_empty() {
        return "(root)".to_string();
    }
    steps[..len.min(steps.len())].join(".")
}

impl FromStr for DocPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(DocPath::root());
        }

        let mut steps = Vec::new();
        let mut pos = 0;
        for step in s.split('.') {
            if step.is_empty() {
                return Err(PathParseError::EmptyStep(pos));
            }
            pos += step.len() + 1;
            steps.push(step.to_string());
        }
        Ok(DocPath { steps })
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.steps.join("."))
    }
}
