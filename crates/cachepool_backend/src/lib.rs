// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! The storage backend contract behind `cachepool` adapters.
//!
//! This crate defines the [`StorageBackend`] trait that every storage engine must satisfy,
//! along with the types that cross that boundary: [`BackendAddress`] for addressing records,
//! [`Record`] for what comes back, [`BackendStatus`] for the outcome of every call, and
//! [`Error`] for backend failures.
//!
//! # Overview
//!
//! Engines differ in how they report success ("OK" codes, sentinel values, exceptions).
//! A backend translates those into [`BackendStatus`] so the adapter layer can reconcile
//! results without knowing which engine produced them.
//!
//! # Implementing a Backend
//!
//! ```
//! use cachepool_backend::{BackendAddress, BackendStatus, KeyPolicy, Record, StorageBackend};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//! use std::time::Duration;
//!
//! struct SimpleBackend<V>(RwLock<HashMap<BackendAddress, V>>);
//!
//! impl<V> StorageBackend<V> for SimpleBackend<V>
//! where
//!     V: Clone + Send + Sync,
//! {
//!     fn is_connected(&self) -> bool {
//!         true
//!     }
//!
//!     async fn get(&self, address: &BackendAddress) -> BackendStatus<Record<V>> {
//!         match self.0.read().unwrap().get(address) {
//!             Some(value) => BackendStatus::Success(Record::new(address.clone(), Some(value.clone()))),
//!             None => BackendStatus::NotFound,
//!         }
//!     }
//!
//!     async fn get_many(&self, addresses: &[BackendAddress]) -> BackendStatus<Vec<Record<V>>> {
//!         let data = self.0.read().unwrap();
//!         let records = addresses
//!             .iter()
//!             .filter_map(|a| data.get(a).map(|v| Record::new(a.clone(), Some(v.clone()))))
//!             .collect();
//!         BackendStatus::Success(records)
//!     }
//!
//!     async fn put(&self, address: &BackendAddress, payload: V, _ttl: Option<Duration>, _policy: KeyPolicy) -> BackendStatus {
//!         self.0.write().unwrap().insert(address.clone(), payload);
//!         BackendStatus::Success(())
//!     }
//!
//!     async fn remove(&self, address: &BackendAddress) -> BackendStatus {
//!         match self.0.write().unwrap().remove(address) {
//!             Some(_) => BackendStatus::Success(()),
//!             None => BackendStatus::NotFound,
//!         }
//!     }
//!
//!     async fn scan(&self, namespace: &str, collection: &str, visit: &mut (dyn FnMut(Record<V>) + Send)) -> BackendStatus {
//!         let data = self.0.read().unwrap();
//!         for (address, value) in data.iter() {
//!             if address.namespace() == namespace && address.collection() == collection {
//!                 visit(Record::new(address.clone(), Some(value.clone())).with_stored_key(address.key()));
//!             }
//!         }
//!         BackendStatus::Success(())
//!     }
//! }
//! ```
//!
//! # Testing
//!
//! Enable the `test-util` feature for [`testing::MockBackend`], an in-memory backend that
//! records every call and supports failure injection.

mod address;
mod backend;
mod connect;
pub mod error;
mod record;
mod status;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use address::BackendAddress;
#[doc(inline)]
pub use backend::StorageBackend;
#[doc(inline)]
pub use connect::{ConnectionSettings, Connector};
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use record::{KeyPolicy, Record};
#[doc(inline)]
pub use status::BackendStatus;
