// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for storage engines.
//!
//! [`StorageBackend`] is the only place where I/O happens. Adapters built on top of it
//! handle key namespacing, TTL defaults, batching, and deferred writes.

use std::time::Duration;

use crate::{BackendAddress, BackendStatus, KeyPolicy, Record};

/// Trait for storage engine implementations.
///
/// Every operation reports its outcome as a [`BackendStatus`]; none of them panic or
/// return engine-specific codes. Connection management, retries, and authentication
/// belong to the implementation.
///
/// Only [`truncate`](StorageBackend::truncate) has a default implementation, which reports
/// that the engine has no native way to drop a whole collection.
pub trait StorageBackend<V>: Send + Sync {
    /// Returns `true` if the engine is reachable and ready for operations.
    fn is_connected(&self) -> bool;

    /// Reads one record.
    ///
    /// Returns [`BackendStatus::NotFound`] when the record does not exist.
    fn get(&self, address: &BackendAddress) -> impl Future<Output = BackendStatus<Record<V>>> + Send;

    /// Reads several records in one call.
    ///
    /// The returned records may come in any order and may omit addresses that have no
    /// record. Each record carries the address it was read from.
    fn get_many(&self, addresses: &[BackendAddress]) -> impl Future<Output = BackendStatus<Vec<Record<V>>>> + Send;

    /// Writes one record, replacing any existing one.
    ///
    /// `ttl` of `None` leaves the expiration to the engine's own default.
    fn put(
        &self,
        address: &BackendAddress,
        payload: V,
        ttl: Option<Duration>,
        policy: KeyPolicy,
    ) -> impl Future<Output = BackendStatus> + Send;

    /// Removes one record.
    ///
    /// Returns [`BackendStatus::NotFound`] when there was nothing to remove.
    fn remove(&self, address: &BackendAddress) -> impl Future<Output = BackendStatus> + Send;

    /// Calls `visit` once for every record in the given namespace and collection.
    fn scan(
        &self,
        namespace: &str,
        collection: &str,
        visit: &mut (dyn FnMut(Record<V>) + Send),
    ) -> impl Future<Output = BackendStatus> + Send;

    /// Removes every record in the given namespace and collection in one call.
    ///
    /// Returns `None` when the engine has no such primitive, in which case callers fall
    /// back to [`scan`](StorageBackend::scan) followed by one
    /// [`remove`](StorageBackend::remove) per record.
    fn truncate(&self, namespace: &str, collection: &str) -> impl Future<Output = Option<BackendStatus>> + Send {
        let _ = (namespace, collection);
        async { None }
    }
}
