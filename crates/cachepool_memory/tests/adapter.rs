// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! End-to-end tests of a `cachepool` adapter over `InMemoryBackend`.

use std::time::Duration;

use cachepool::{AdapterBuilder, AdapterConfig, CacheAdapter, CacheItem, ConnectionSettings, Error};
use cachepool_memory::InMemoryBackend;
use tick::Clock;

type TestResult = Result<(), Error>;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

fn adapter() -> CacheAdapter<String, InMemoryBackend<String>> {
    let config = AdapterConfig::builder()
        .host("localhost")
        .port(3000)
        .namespace("app")
        .collection("sessions")
        .build()
        .expect("config should build");

    let connector = |_: &ConnectionSettings| -> cachepool_backend::Result<InMemoryBackend<String>> {
        Ok(InMemoryBackend::builder().max_capacity(1_000).name("sessions").build())
    };

    AdapterBuilder::new(config, Clock::new_frozen())
        .connect(&connector)
        .expect("in-memory backend is always connected")
}

#[test]
fn save_then_read_back() -> TestResult {
    let cache = adapter();

    block_on(async {
        assert!(cache.save(CacheItem::with_value("a", "v1".to_string()), Some(Duration::from_secs(60))).await?);

        let item = cache.get_item("a").await?;
        assert!(item.is_hit());
        assert_eq!(item.into_value().as_deref(), Some("v1"));
        Ok(())
    })
}

#[test]
fn deferred_writes_and_batch_read() -> TestResult {
    let cache = adapter();

    block_on(async {
        cache.save_deferred(CacheItem::with_value("b", "v2".to_string()), None)?;
        cache.save_deferred(CacheItem::with_value("b", "v3".to_string()), None)?;
        cache.save_deferred(CacheItem::with_value("c", "v4".to_string()), None)?;
        assert!(cache.commit().await);

        let items = cache.get_items(["x", "b", "c"]).await?;
        assert_eq!(items.keys().collect::<Vec<_>>(), ["x", "b", "c"]);
        assert!(!items.get("x").expect("x was requested").is_hit());
        assert_eq!(items.get("b").and_then(CacheItem::value).map(String::as_str), Some("v3"));
        assert_eq!(items.get("c").and_then(CacheItem::value).map(String::as_str), Some("v4"));
        Ok(())
    })
}

#[test]
fn clear_uses_native_truncate() -> TestResult {
    let cache = adapter();

    block_on(async {
        for key in ["a", "b", "c"] {
            assert!(cache.save(CacheItem::with_value(key, "v".to_string()), None).await?);
        }
        cache.save_deferred(CacheItem::with_value("d", "v".to_string()), None)?;

        assert!(cache.clear().await);
        assert_eq!(cache.pending_len(), 0);
        assert_eq!(cache.get_items(["a", "b", "c", "d"]).await?.hits(), 0);
        Ok(())
    })
}

#[test]
fn delete_items_removes_every_key() -> TestResult {
    let cache = adapter();

    block_on(async {
        for key in ["a", "b"] {
            assert!(cache.save(CacheItem::with_value(key, "v".to_string()), None).await?);
        }

        assert!(cache.delete_items(["a", "b", "never-written"]).await?);
        assert!(!cache.has_item("a").await?);
        assert!(!cache.has_item("b").await?);
        Ok(())
    })
}
