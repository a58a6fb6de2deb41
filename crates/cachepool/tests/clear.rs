// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `CacheAdapter::clear`.

use cachepool::{AdapterBuilder, AdapterConfig, BackendAddress, CacheAdapter, CacheItem};
use cachepool_backend::testing::{BackendOp, MockBackend};
use tick::Clock;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

fn adapter(backend: &MockBackend<String>) -> CacheAdapter<String, MockBackend<String>> {
    let config = AdapterConfig::builder()
        .host("localhost")
        .port(3000)
        .namespace("ns")
        .collection("set")
        .build()
        .expect("config should build");
    AdapterBuilder::new(config, Clock::new_frozen())
        .build(backend.clone())
        .expect("backend should be connected")
}

fn address(key: &str) -> BackendAddress {
    BackendAddress::new("ns", "set", key)
}

fn seeded() -> MockBackend<String> {
    let backend = MockBackend::new();
    backend.seed(address("a"), Some("1".to_string()), Some("a"));
    backend.seed(address("b"), Some("2".to_string()), Some("b"));
    backend.seed(address("digest-only"), Some("3".to_string()), None);
    backend.seed(BackendAddress::new("ns", "other", "a"), Some("4".to_string()), Some("a"));
    backend.seed(BackendAddress::new("elsewhere", "set", "a"), Some("5".to_string()), Some("a"));
    backend
}

#[test]
fn scan_clear_deletes_records_stored_with_their_key() {
    let backend = seeded();
    let cache = adapter(&backend);

    assert!(block_on(cache.clear()));

    assert!(!backend.contains(&address("a")));
    assert!(!backend.contains(&address("b")));
    // Records stored without their key cannot be recovered by a scan.
    assert!(backend.contains(&address("digest-only")));
    assert!(backend.contains(&BackendAddress::new("ns", "other", "a")));
    assert!(backend.contains(&BackendAddress::new("elsewhere", "set", "a")));

    let operations = backend.operations();
    assert_eq!(
        operations[0],
        BackendOp::Scan {
            namespace: "ns".to_string(),
            collection: "set".to_string(),
        }
    );
    assert_eq!(operations.len(), 3);
}

#[test]
fn native_truncate_replaces_the_scan() {
    let backend = seeded();
    backend.set_native_truncate(true);
    let cache = adapter(&backend);

    assert!(block_on(cache.clear()));

    assert_eq!(
        backend.operations(),
        vec![BackendOp::Truncate {
            namespace: "ns".to_string(),
            collection: "set".to_string(),
        }]
    );
    assert!(!backend.contains(&address("digest-only")));
    assert!(backend.contains(&BackendAddress::new("ns", "other", "a")));
}

#[test]
fn failed_truncate_returns_false() {
    let backend = seeded();
    backend.set_native_truncate(true);
    backend.fail_when(|op| matches!(op, BackendOp::Truncate { .. }));
    let cache = adapter(&backend);

    assert!(!block_on(cache.clear()));
    assert!(backend.contains(&address("a")));
}

#[test]
fn failed_scan_returns_false() {
    let backend = seeded();
    backend.fail_when(|op| matches!(op, BackendOp::Scan { .. }));
    let cache = adapter(&backend);

    assert!(!block_on(cache.clear()));
    assert!(backend.contains(&address("a")));
}

#[test]
fn failed_delete_during_clear_returns_false_but_continues() {
    let backend = seeded();
    backend.fail_when(|op| matches!(op, BackendOp::Remove(address) if address.key() == "a"));
    let cache = adapter(&backend);

    assert!(!block_on(cache.clear()));
    assert!(backend.contains(&address("a")));
    assert!(!backend.contains(&address("b")));
}

#[test]
fn clear_drops_pending_writes() {
    let backend = MockBackend::new();
    let cache = adapter(&backend);

    cache
        .save_deferred(CacheItem::with_value("a", "v".to_string()), None)
        .expect("item is valid");
    assert!(block_on(cache.clear()));
    assert_eq!(cache.pending_len(), 0);

    assert!(block_on(cache.commit()));
    assert_eq!(backend.record_count(), 0);
}

#[test]
fn cleared_items_read_as_misses() {
    let backend = MockBackend::new();
    let cache = adapter(&backend);

    block_on(async {
        for key in ["a", "b"] {
            assert!(
                cache
                    .save(CacheItem::with_value(key, "v".to_string()), None)
                    .await
                    .expect("item is valid")
            );
        }
        assert!(cache.clear().await);

        let items = cache.get_items(["a", "b"]).await.expect("keys are valid");
        assert_eq!(items.hits(), 0);
    });
}

#[test]
fn scan_clear_deletes_records_under_a_prefixing_transformer() {
    let backend = MockBackend::<String>::new();
    let config = AdapterConfig::builder()
        .host("localhost")
        .port(3000)
        .namespace("ns")
        .collection("set")
        .build()
        .expect("config should build");
    let cache = AdapterBuilder::new(config, Clock::new_frozen())
        .key_transformer(|key: &str| BackendAddress::new("ns", "set", format!("v1:{key}")))
        .build(backend.clone())
        .expect("backend should be connected");

    block_on(async {
        assert!(
            cache
                .save(CacheItem::with_value("a", "v".to_string()), None)
                .await
                .expect("item is valid")
        );
        assert!(cache.clear().await);
        assert!(!cache.get_item("a").await.expect("key is valid").is_hit());
    });

    assert_eq!(backend.record_count(), 0);
    assert!(backend.operations().contains(&BackendOp::Remove(address("v1:a"))));
}
