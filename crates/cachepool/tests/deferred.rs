// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for deferred writes and commit.

use std::time::Duration;

use cachepool::{AdapterBuilder, AdapterConfig, BackendAddress, CacheAdapter, CacheItem, Error};
use cachepool_backend::testing::{BackendOp, MockBackend};
use tick::Clock;

type TestResult = Result<(), Error>;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

fn adapter(backend: &MockBackend<String>) -> CacheAdapter<String, MockBackend<String>> {
    let config = AdapterConfig::builder()
        .host("localhost")
        .port(3000)
        .namespace("ns")
        .collection("set")
        .default_ttl(Duration::from_secs(600))
        .build()
        .expect("config should build");
    AdapterBuilder::new(config, Clock::new_frozen())
        .build(backend.clone())
        .expect("backend should be connected")
}

fn address(key: &str) -> BackendAddress {
    BackendAddress::new("ns", "set", key)
}

fn value(key: &str, value: &str) -> CacheItem<String> {
    CacheItem::with_value(key, value.to_string())
}

fn written_keys(backend: &MockBackend<String>) -> Vec<String> {
    backend
        .operations()
        .into_iter()
        .filter_map(|op| match op {
            BackendOp::Put { address, .. } => Some(address.key().to_string()),
            _ => None,
        })
        .collect()
}

#[test]
fn last_deferred_write_wins() -> TestResult {
    let backend = MockBackend::new();
    let cache = adapter(&backend);

    cache.save_deferred(value("b", "v2"), None)?;
    cache.save_deferred(value("b", "v3"), None)?;
    assert_eq!(cache.pending_len(), 1);

    block_on(async {
        assert!(cache.commit().await);
        let item = cache.get_item("b").await?;
        assert_eq!(item.value().map(String::as_str), Some("v3"));
        Ok::<(), Error>(())
    })?;

    assert_eq!(written_keys(&backend), ["b"]);
    Ok(())
}

#[test]
fn commit_writes_in_first_deferred_order() -> TestResult {
    let backend = MockBackend::new();
    let cache = adapter(&backend);

    cache.save_deferred(value("c", "1"), None)?;
    cache.save_deferred(value("a", "2"), None)?;
    cache.save_deferred(value("b", "3"), None)?;
    cache.save_deferred(value("c", "4"), None)?;

    assert!(block_on(cache.commit()));
    assert_eq!(written_keys(&backend), ["c", "a", "b"]);
    assert_eq!(backend.payload(&address("c")).as_deref(), Some("4"));
    Ok(())
}

#[test]
fn commit_attempts_every_write_and_empties_buffer() -> TestResult {
    let backend = MockBackend::new();
    let cache = adapter(&backend);
    backend.fail_when(|op| matches!(op, BackendOp::Put { address, .. } if address.key() == "b"));

    for key in ["a", "b", "c"] {
        cache.save_deferred(value(key, "v"), None)?;
    }

    assert!(!block_on(cache.commit()));
    assert_eq!(written_keys(&backend), ["a", "b", "c"]);
    assert_eq!(cache.pending_len(), 0);
    assert!(backend.contains(&address("a")));
    assert!(!backend.contains(&address("b")));
    assert!(backend.contains(&address("c")));

    // Failed writes are dropped, not retried.
    backend.clear_failures();
    backend.clear_operations();
    assert!(block_on(cache.commit()));
    assert!(backend.operations().is_empty());
    Ok(())
}

#[test]
fn empty_commit_succeeds_without_backend_call() {
    let backend = MockBackend::new();
    let cache = adapter(&backend);

    assert!(block_on(cache.commit()));
    assert!(backend.operations().is_empty());
}

#[test]
fn deferred_ttl_is_resolved_when_deferred() -> TestResult {
    let backend = MockBackend::new();
    let cache = adapter(&backend);

    let mut item = value("item", "v");
    item.expires_after(Duration::from_secs(30));
    cache.save_deferred(item, None)?;
    cache.save_deferred(value("explicit", "v"), Some(Duration::from_secs(5)))?;
    cache.save_deferred(value("default", "v"), None)?;

    assert!(block_on(cache.commit()));
    assert_eq!(backend.ttl(&address("item")), Some(Some(Duration::from_secs(30))));
    assert_eq!(backend.ttl(&address("explicit")), Some(Some(Duration::from_secs(5))));
    assert_eq!(backend.ttl(&address("default")), Some(Some(Duration::from_secs(600))));
    Ok(())
}

#[test]
fn immediate_save_leaves_buffer_alone() -> TestResult {
    let backend = MockBackend::new();
    let cache = adapter(&backend);

    cache.save_deferred(value("a", "deferred"), None)?;
    assert!(block_on(cache.save(value("a", "immediate"), None))?);
    assert_eq!(cache.pending_len(), 1);
    assert_eq!(backend.payload(&address("a")).as_deref(), Some("immediate"));

    assert!(block_on(cache.commit()));
    assert_eq!(backend.payload(&address("a")).as_deref(), Some("deferred"));
    Ok(())
}

#[test]
fn delete_drops_pending_write() -> TestResult {
    let backend = MockBackend::new();
    let cache = adapter(&backend);

    cache.save_deferred(value("a", "v"), None)?;
    cache.save_deferred(value("b", "v"), None)?;
    assert!(block_on(cache.delete_item("a"))?);
    assert_eq!(cache.pending_len(), 1);

    assert!(block_on(cache.commit()));
    assert_eq!(written_keys(&backend), ["b"]);
    assert!(!backend.contains(&address("a")));
    Ok(())
}

#[test]
fn batch_delete_drops_pending_writes() -> TestResult {
    let backend = MockBackend::new();
    let cache = adapter(&backend);

    cache.save_deferred(value("a", "v"), None)?;
    cache.save_deferred(value("b", "v"), None)?;
    assert!(block_on(cache.delete_items(["a"]))?);
    assert_eq!(cache.pending_len(), 1);

    assert!(block_on(cache.commit()));
    assert_eq!(written_keys(&backend), ["b"]);
    assert!(!backend.contains(&address("a")));
    Ok(())
}

#[test]
fn deferred_writes_from_many_threads_are_all_committed() -> TestResult {
    let backend = MockBackend::new();
    let cache = adapter(&backend);

    std::thread::scope(|scope| {
        for thread in 0..4 {
            let cache = &cache;
            scope.spawn(move || {
                for i in 0..25 {
                    cache
                        .save_deferred(value(&format!("{thread}:{i}"), "v"), None)
                        .expect("item is valid");
                }
            });
        }
    });

    assert_eq!(cache.pending_len(), 100);
    assert!(block_on(cache.commit()));
    assert_eq!(backend.record_count(), 100);
    Ok(())
}
