// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A storage-agnostic cache item pool.
//!
//! [`CacheAdapter`] gives callers one contract for reading, writing, batch-fetching and
//! invalidating cached values, whatever engine stores them:
//! - Single and batch reads that return [`CacheItem`]s, hits or misses
//! - Immediate writes and deferred writes flushed by [`CacheAdapter::commit`]
//! - TTL defaults applied consistently across engines
//! - Key namespacing through a pluggable [`KeyTransformer`]
//! - Structured `tracing` events for every operation
//!
//! Storage engines implement [`StorageBackend`] from `cachepool_backend`.
//!
//! # Examples
//!
//! ```
//! use cachepool::{AdapterBuilder, AdapterConfig, CacheAdapter, CacheItem};
//! use cachepool_backend::testing::MockBackend;
//! use std::time::Duration;
//! use tick::Clock;
//! # futures::executor::block_on(async {
//!
//! let config = AdapterConfig::builder()
//!     .host("127.0.0.1")
//!     .port(3000)
//!     .namespace("cache")
//!     .collection("sessions")
//!     .default_ttl(Duration::from_secs(600))
//!     .build()?;
//!
//! let cache: CacheAdapter<String, _> = AdapterBuilder::new(config, Clock::new_frozen()).build(MockBackend::new())?;
//!
//! let mut item = cache.get_item("session:1").await?;
//! if !item.is_hit() {
//!     item.set("fresh".to_string());
//!     cache.save(item, Some(Duration::from_secs(60))).await?;
//! }
//!
//! let item = cache.get_item("session:1").await?;
//! assert_eq!(item.value().map(String::as_str), Some("fresh"));
//!
//! assert!(cache.delete_item("session:1").await?);
//! assert!(!cache.has_item("session:1").await?);
//! # Ok::<(), cachepool::Error>(())
//! # }).unwrap();
//! ```
//!
//! # Backend Failures
//!
//! Reads that fail in the backend come back as misses and failed writes return `false`;
//! both are logged at `WARN`. The `try_*` reads report the failure instead.

mod adapter;
mod builder;
pub mod config;
mod deferred;
mod error;
mod item;
mod items;
mod key;
mod telemetry;

#[doc(inline)]
pub use adapter::CacheAdapter;
#[doc(inline)]
pub use builder::AdapterBuilder;
#[doc(inline)]
pub use cachepool_backend::{BackendAddress, BackendStatus, ConnectionSettings, Connector, KeyPolicy, Record, StorageBackend};
#[doc(inline)]
pub use config::{AdapterConfig, AdapterConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use item::CacheItem;
pub use items::Items;
pub use key::{KeyTransformer, NamespacedKeys};
