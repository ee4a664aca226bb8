//! Error Surfacing Tests
//!
//! Tests that failures come back as rejected operations and leave the
//! store untouched:
//! - corrupt stored bytes
//! - store outages on read and on write-back
//! - shape mismatches
//! - usage errors raised before any store access

use crate::common::*;
use rebridge::{Error, LimitError, RebridgeConfig, StoreOp, MAX_PATH_LENGTH};

#[tokio::test]
async fn corrupt_document_rejects_read_and_mutation() {
    let (store, db) = setup();
    store.put_raw(NS, "foo", b"{not json".to_vec());

    let err = db.get("foo").unwrap().get("bar").unwrap().await.unwrap_err();
    assert!(matches!(err, Error::Corrupt { ref root, .. } if root == "foo"));

    let err = db.get("foo").unwrap().get("bar").unwrap().set(json!(1)).await.unwrap_err();
    assert!(matches!(err, Error::Corrupt { .. }));
    assert_eq!(store.raw(NS, "foo"), Some(b"{not json".to_vec()));
}

#[tokio::test]
async fn read_failure_surfaces_store_unavailable() {
    let (store, db) = setup();
    store.fail_next(StoreOp::Get);

    let err = db.get("foo").unwrap().await.unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable(_)));
    assert!(err.is_retryable());

    assert_eq!(db.get("foo").unwrap().await.unwrap(), None);
}

#[tokio::test]
async fn write_failure_leaves_previous_document() {
    let (store, db) = setup();
    db.get("foo").unwrap().get("bar").unwrap().set(json!(1)).await.unwrap();

    store.fail_next(StoreOp::Set);
    let err = db.get("foo").unwrap().get("bar").unwrap().set(json!(2)).await.unwrap_err();

    assert!(matches!(err, Error::StoreUnavailable(_)));
    assert_eq!(stored(&store, "foo"), Some(json!({"bar": 1})));
}

#[tokio::test]
async fn write_failure_in_optimistic_mode() {
    let (store, db) = setup_with(RebridgeConfig::default().optimistic(3));
    store.fail_next(StoreOp::Set);

    let err = db.get("list").unwrap().push(json!(1)).await.unwrap_err();

    assert!(matches!(err, Error::StoreUnavailable(_)));
    assert!(store.is_empty());
}

#[tokio::test]
async fn push_onto_object_is_type_mismatch() {
    let (store, db) = setup();
    db.get("doc").unwrap().get("tags").unwrap().set(json!({"a": 1})).await.unwrap();
    let version = store.version_of(NS, "doc");

    let err = db.get("doc").unwrap().get("tags").unwrap().push(json!(2)).await.unwrap_err();

    assert_eq!(
        err,
        Error::TypeMismatch {
            expected: "array",
            found: "object",
            path: "tags".to_string(),
        }
    );
    assert_eq!(store.version_of(NS, "doc"), version);
}

#[tokio::test]
async fn set_through_scalar_is_type_mismatch() {
    let (store, db) = setup();
    db.get("doc").unwrap().get("n").unwrap().set(json!(7)).await.unwrap();
    let version = store.version_of(NS, "doc");

    let err = db
        .get("doc")
        .unwrap()
        .get("n")
        .unwrap()
        .get("inner")
        .unwrap()
        .set(json!(1))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::TypeMismatch { expected: "object", found: "number", .. }));
    assert_eq!(store.version_of(NS, "doc"), version);
    assert_eq!(stored(&store, "doc"), Some(json!({"n": 7})));
}

#[tokio::test]
async fn delete_on_array_and_pop_on_string_are_type_mismatches() {
    let (_store, db) = setup();
    let doc = db.get("doc").unwrap();
    doc.get("list").unwrap().set(json!([1])).await.unwrap();
    doc.get("name").unwrap().set(json!("x")).await.unwrap();

    let err = doc.get("list").unwrap().delete("0").await.unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { expected: "object", found: "array", .. }));

    let err = doc.get("name").unwrap().pop().await.unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { expected: "array", found: "string", .. }));
}

#[tokio::test]
async fn delete_through_array_without_index_is_type_mismatch() {
    let (store, db) = setup();
    let list = db.get("doc").unwrap().get("list").unwrap();
    list.set(json!([1, 2])).await.unwrap();
    let version = store.version_of(NS, "doc");

    let err = list.get("name").unwrap().delete("k").await.unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { expected: "object", found: "array", .. }));
    let err = list.get("9").unwrap().pop().await.unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { found: "array", .. }));

    assert_eq!(store.version_of(NS, "doc"), version);
}

#[test]
fn usage_errors_raised_before_store_access() {
    let (store, db) = setup();
    store.fail_next(StoreOp::Get);
    store.fail_next(StoreOp::Set);

    assert!(matches!(db.get("set"), Err(Error::UnsupportedOperation(_))));
    let foo = db.get("foo").unwrap();
    assert!(matches!(foo.get("push"), Err(Error::InvalidUsage(_))));
    assert!(matches!(foo.get("delete"), Err(Error::InvalidUsage(_))));
    assert!(matches!(foo.get("splice"), Err(Error::UnsupportedOperation(_))));
    assert!(matches!(
        foo.get("bar").unwrap().get("length"),
        Err(Error::UnsupportedOperation(_))
    ));

    assert!(store.is_empty());
}

#[tokio::test]
async fn overlong_path_rejected_before_store_access() {
    let (store, db) = setup();
    store.fail_next(StoreOp::Get);

    let mut cursor = db.get("deep").unwrap();
    for i in 0..=MAX_PATH_LENGTH {
        cursor = cursor.field(format!("k{i}"));
    }
    let err = cursor.set(json!(1)).await.unwrap_err();

    assert!(matches!(err, Error::LimitExceeded(LimitError::PathTooLong { .. })));
    // The injected read failure is still queued
    assert!(matches!(db.get("deep").unwrap().await, Err(Error::StoreUnavailable(_))));
}
