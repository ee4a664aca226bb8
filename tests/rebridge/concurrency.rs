//! Concurrency Tests
//!
//! Two cycles on the same root whose read and write overlap:
//! - last-writer-wins keeps at least one of the updates
//! - optimistic write-back keeps both
//! - cycles on different roots never interfere

use crate::common::*;
use rebridge::{Error, RebridgeConfig};

#[tokio::test]
async fn last_writer_wins_keeps_at_least_one_push() {
    let (store, db) = setup_yielding(RebridgeConfig::default());

    let a = db.get("list").unwrap();
    let b = db.get("list").unwrap();
    let (ra, rb) = tokio::join!(a.push(json!("a")), b.push(json!("b")));
    ra.unwrap();
    rb.unwrap();

    let items = match stored(&store, "list") {
        Some(Value::Array(items)) => items,
        other => panic!("expected array, got {other:?}"),
    };
    assert!(!items.is_empty() && items.len() <= 2);
    assert!(items.iter().all(|v| *v == json!("a") || *v == json!("b")));
}

#[tokio::test]
async fn optimistic_keeps_both_pushes() {
    let (store, db) = setup_yielding(RebridgeConfig::default().optimistic(4));

    let a = db.get("list").unwrap();
    let b = db.get("list").unwrap();
    let (ra, rb) = tokio::join!(a.push(json!("a")), b.push(json!("b")));
    ra.unwrap();
    rb.unwrap();

    let mut items = match stored(&store, "list") {
        Some(Value::Array(items)) => items,
        other => panic!("expected array, got {other:?}"),
    };
    items.sort_by_key(|v| v.to_string());
    assert_eq!(items, vec![json!("a"), json!("b")]);
}

#[tokio::test]
async fn optimistic_keeps_sibling_sets() {
    let (store, db) = setup_yielding(RebridgeConfig::default().optimistic(4));

    let x = db.get("doc").unwrap().get("x").unwrap();
    let y = db.get("doc").unwrap().get("y").unwrap();
    let (rx, ry) = tokio::join!(x.set(json!(1)), y.set(json!(2)));
    rx.unwrap();
    ry.unwrap();

    assert_eq!(stored(&store, "doc"), Some(json!({"x": 1, "y": 2})));
}

#[tokio::test]
async fn optimistic_without_retries_reports_conflict() {
    let (store, db) = setup_yielding(RebridgeConfig::default().optimistic(0));

    let a = db.get("list").unwrap();
    let b = db.get("list").unwrap();
    let (ra, rb) = tokio::join!(a.push(json!("a")), b.push(json!("b")));

    let results = [ra, rb];
    let committed = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(committed, 1);
    let err = results.into_iter().find_map(|r| r.err()).unwrap();
    assert_eq!(
        err,
        Error::VersionConflict {
            root: "list".to_string(),
            attempts: 1
        }
    );
    assert!(err.is_retryable());
    assert_eq!(
        stored(&store, "list").map(|v| v.as_array().map(Vec::len)),
        Some(Some(1))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn optimistic_many_tasks_lose_nothing() {
    let (store, db) = setup_yielding(RebridgeConfig::default().optimistic(64));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cursor = db.get("counter").unwrap().get("seen").unwrap();
            tokio::spawn(async move { cursor.push(json!(i)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let seen = stored(&store, "counter").unwrap()["seen"].clone();
    let mut values: Vec<i64> = seen
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    values.sort_unstable();
    assert_eq!(values, (0..8).collect::<Vec<_>>());
}

#[tokio::test]
async fn different_roots_do_not_interfere() {
    let (store, db) = setup_yielding(RebridgeConfig::default());

    let a = db.get("a").unwrap();
    let b = db.get("b").unwrap();
    let (ra, rb) = tokio::join!(a.push(json!(1)), b.push(json!(2)));
    ra.unwrap();
    rb.unwrap();

    assert_eq!(stored(&store, "a"), Some(json!([1])));
    assert_eq!(stored(&store, "b"), Some(json!([2])));
}
