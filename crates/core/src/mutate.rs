//! Nested mutation of a deserialized document
//!
//! Pure functions over an in-memory tree and a [`DocPath`]. The gateway
//! fetches a root document, runs exactly one of these against it and
//! writes the result back.
//!
//! ## Absent nodes
//!
//! A root document that was never written arrives here as `Value::Null`.
//! Missing fields and `null` fields are both treated as absent:
//!
//! - `set` and `push` materialise absent intermediates as empty objects,
//!   never as arrays.
//! - `push` turns an absent target into a new array.
//! - `delete` and `pop` on an absent target are no-ops and do not
//!   materialise anything.
//!
//! ## Sequences
//!
//! Walking through an existing array is allowed when the step is a decimal
//! index in bounds; any other step into an array is a type mismatch.
//! Arrays are never created implicitly.

use crate::error::{Error, Result};
use crate::path::{prefix_string, DocPath};
use serde_json::{Map, Value};

/// Get the value at `path`, or `None` if any step is missing
///
/// Objects are descended by key, arrays by decimal index.
///
/// # Examples
///
/// ```
/// use rebridge_core::{mutate, DocPath};
/// use serde_json::json;
///
/// let doc = json!({"user": {"tags": ["a", "b"]}});
/// let path: DocPath = "user.tags.1".parse().unwrap();
/// assert_eq!(mutate::get(&doc, &path), Some(&json!("b")));
/// assert_eq!(mutate::get(&doc, &"user.missing".parse().unwrap()), None);
/// ```
pub fn get<'a>(root: &'a Value, path: &DocPath) -> Option<&'a Value> {
    path.steps()
        .iter()
        .try_fold(root, |current, step| child(current, step))
}

/// Assign `value` at `path`, creating absent intermediates as objects
///
/// An empty path replaces the whole document. Returns the assigned value.
///
/// # Examples
///
/// ```
/// use rebridge_core::{mutate, DocPath};
/// use serde_json::{json, Value};
///
/// let mut doc = Value::Null;
/// mutate::set(&mut doc, &"a.b.c".parse().unwrap(), json!(5)).unwrap();
/// assert_eq!(doc, json!({"a": {"b": {"c": 5}}}));
/// ```
pub fn set(root: &mut Value, path: &DocPath, value: Value) -> Result<Value> {
    let Some((last, parent)) = path.split_last() else {
        *root = value.clone();
        return Ok(value);
    };

    let container = descend_or_create(root, parent)?;
    if container.is_null() {
        *container = Value::Object(Map::new());
    }

    match container {
        Value::Object(map) => {
            map.insert(last.to_string(), value.clone());
        }
        Value::Array(items) => match parse_index(last, items.len()) {
            Some(idx) => items[idx] = value.clone(),
            None => {
                return Err(Error::TypeMismatch {
                    expected: "object",
                    found: "array",
                    path: prefix_string(parent, parent.len()),
                })
            }
        },
        other => {
            return Err(Error::type_mismatch(
                "object",
                other,
                prefix_string(parent, parent.len()),
            ))
        }
    }

    Ok(value)
}

/// Remove field `key` from the object at `path`
///
/// Returns whether a field was actually removed. An absent container is a
/// no-op and leaves the document untouched.
pub fn delete(root: &mut Value, path: &DocPath, key: &str) -> Result<bool> {
    match walk_mut(root, path.steps())? {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Object(map)) => Ok(map.remove(key).is_some()),
        Some(other) => Err(Error::type_mismatch(
            "object",
            other,
            prefix_string(path.steps(), path.len()),
        )),
    }
}

/// Append `value` to the array at `path`, returning the new length
///
/// Absent intermediates become objects and an absent target becomes a new
/// array. A present target that is not an array is a type mismatch.
pub fn push(root: &mut Value, path: &DocPath, value: Value) -> Result<usize> {
    let target = descend_or_create(root, path.steps())?;
    if target.is_null() {
        *target = Value::Array(Vec::new());
    }

    match target {
        Value::Array(items) => {
            items.push(value);
            Ok(items.len())
        }
        other => Err(Error::type_mismatch(
            "array",
            other,
            prefix_string(path.steps(), path.len()),
        )),
    }
}

/// Remove and return the last element of the array at `path`
///
/// An absent target or an empty array yields `None`.
pub fn pop(root: &mut Value, path: &DocPath) -> Result<Option<Value>> {
    match walk_mut(root, path.steps())? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(items.pop()),
        Some(other) => Err(Error::type_mismatch(
            "array",
            other,
            prefix_string(path.steps(), path.len()),
        )),
    }
}

fn child<'a>(current: &'a Value, step: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(step),
        Value::Array(items) => parse_index(step, items.len()).map(|idx| &items[idx]),
        _ => None,
    }
}

fn parse_index(step: &str, len: usize) -> Option<usize> {
    // "01" and "+1" are field names, not indices
    if step.len() > 1 && step.starts_with('0') {
        return None;
    }
    if !step.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    step.parse::<usize>().ok().filter(|idx| *idx < len)
}

/// Walk existing nodes only. `Ok(None)` when a step is missing or null;
/// an array step that is not an in-bounds index is a type mismatch.
fn walk_mut<'a>(root: &'a mut Value, steps: &[String]) -> Result<Option<&'a mut Value>> {
    let mut current = root;
    for (depth, step) in steps.iter().enumerate() {
        current = match current {
            Value::Null => return Ok(None),
            Value::Object(map) => match map.get_mut(step) {
                Some(next) => next,
                None => return Ok(None),
            },
            Value::Array(items) => match parse_index(step, items.len()) {
                Some(idx) => &mut items[idx],
                None => {
                    return Err(Error::TypeMismatch {
                        expected: "object",
                        found: "array",
                        path: prefix_string(steps, depth),
                    })
                }
            },
            other => {
                return Err(Error::type_mismatch(
                    "object",
                    other,
                    prefix_string(steps, depth),
                ))
            }
        };
    }
    Ok(Some(current))
}

/// Walk `steps`, turning absent nodes into empty objects on the way.
/// The node at the end of the walk is returned as-is, possibly null.
fn descend_or_create<'a>(root: &'a mut Value, steps: &[String]) -> Result<&'a mut Value> {
    let mut current = root;
    for (depth, step) in steps.iter().enumerate() {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map.entry(step.clone()).or_insert(Value::Null),
            Value::Array(items) => match parse_index(step, items.len()) {
                Some(idx) => &mut items[idx],
                None => {
                    return Err(Error::TypeMismatch {
                        expected: "object",
                        found: "array",
                        path: prefix_string(steps, depth),
                    })
                }
            },
            other => {
                return Err(Error::type_mismatch(
                    "object",
                    other,
                    prefix_string(steps, depth),
                ))
            }
        };
    }
    Ok(current)
}
