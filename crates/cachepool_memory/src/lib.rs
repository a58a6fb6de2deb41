// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-memory storage backend backed by moka.
//!
//! [`InMemoryBackend`] implements [`StorageBackend`](cachepool_backend::StorageBackend)
//! over a concurrent moka cache. It is always connected, honors per-record TTLs, and
//! offers a native truncate, so `clear` never needs a scan. Use
//! [`InMemoryBackendBuilder`] to configure capacity and a default TTL without exposing
//! moka types.
//!
//! # Quick Start
//!
//! ```
//! use cachepool_backend::{BackendAddress, KeyPolicy, StorageBackend};
//! use cachepool_memory::InMemoryBackend;
//! use std::time::Duration;
//!
//! # futures::executor::block_on(async {
//! let backend = InMemoryBackend::<String>::builder()
//!     .max_capacity(1000)
//!     .default_ttl(Duration::from_secs(300))
//!     .build();
//!
//! let address = BackendAddress::new("app", "users", "42");
//! backend.put(&address, "Ada".to_string(), None, KeyPolicy::Send).await;
//!
//! let record = backend.get(&address).await.success().unwrap();
//! assert_eq!(record.payload().map(String::as_str), Some("Ada"));
//! assert_eq!(record.stored_key(), Some("42"));
//! # });
//! ```

pub mod backend;
pub mod builder;

#[doc(inline)]
pub use backend::InMemoryBackend;
#[doc(inline)]
pub use builder::InMemoryBackendBuilder;
