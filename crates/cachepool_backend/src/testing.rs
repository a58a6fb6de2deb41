// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock storage backend for testing.
//!
//! This module provides `MockBackend`, a configurable in-memory backend that
//! records all operations and supports failure injection for testing error paths.

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;

use crate::{BackendAddress, BackendStatus, Error, KeyPolicy, Record, StorageBackend};

/// Recorded backend operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOp<V> {
    /// A single-record read.
    Get(BackendAddress),
    /// A batch read of the given addresses, in request order.
    GetMany(Vec<BackendAddress>),
    /// A write.
    Put {
        /// The address that was written.
        address: BackendAddress,
        /// The value that was written.
        payload: V,
        /// The TTL passed by the caller.
        ttl: Option<Duration>,
        /// The key policy passed by the caller.
        policy: KeyPolicy,
    },
    /// A single-record removal.
    Remove(BackendAddress),
    /// A scan of one namespace and collection.
    Scan {
        /// The scanned namespace.
        namespace: String,
        /// The scanned collection.
        collection: String,
    },
    /// A truncate request for one namespace and collection.
    Truncate {
        /// The truncated namespace.
        namespace: String,
        /// The truncated collection.
        collection: String,
    },
}

#[derive(Debug, Clone)]
struct StoredRecord<V> {
    payload: Option<V>,
    stored_key: Option<String>,
    ttl: Option<Duration>,
}

type FailPredicate<V> = Box<dyn Fn(&BackendOp<V>) -> bool + Send + Sync>;

/// A configurable mock backend for testing.
///
/// This backend stores records in memory and can be configured to fail operations on
/// demand, to report itself disconnected, or to offer a native truncate. All operations
/// are recorded for later verification. Clones share state.
///
/// Batch reads omit addresses that have no record, like most real engines.
///
/// # Examples
///
/// ```
/// use cachepool_backend::testing::{BackendOp, MockBackend};
/// use cachepool_backend::{BackendAddress, KeyPolicy, StorageBackend};
///
/// # block_on(async {
/// let backend = MockBackend::<i32>::new();
/// let address = BackendAddress::new("ns", "set", "key");
///
/// assert!(backend.put(&address, 42, None, KeyPolicy::Send).await.is_success());
/// assert_eq!(backend.get(&address).await.success().unwrap().payload(), Some(&42));
///
/// // Fail every removal
/// backend.fail_when(|op| matches!(op, BackendOp::Remove(_)));
/// assert!(backend.remove(&address).await.is_failure());
/// # });
/// # fn block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct MockBackend<V> {
    data: Arc<Mutex<BTreeMap<BackendAddress, StoredRecord<V>>>>,
    operations: Arc<Mutex<Vec<BackendOp<V>>>>,
    fail_when: Arc<Mutex<Option<FailPredicate<V>>>>,
    connected: Arc<AtomicBool>,
    native_truncate: Arc<AtomicBool>,
}

impl<V> std::fmt::Debug for MockBackend<V>
where
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .field("connected", &self.is_connected_flag())
            .finish_non_exhaustive()
    }
}

impl<V> Clone for MockBackend<V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
            connected: Arc::clone(&self.connected),
            native_truncate: Arc::clone(&self.native_truncate),
        }
    }
}

impl<V> Default for MockBackend<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MockBackend<V> {
    /// Creates a new empty, connected mock backend without native truncate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(BTreeMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
            connected: Arc::new(AtomicBool::new(true)),
            native_truncate: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sets whether the backend reports itself as connected.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Sets whether [`StorageBackend::truncate`] is supported.
    pub fn set_native_truncate(&self, supported: bool) {
        self.native_truncate.store(supported, Ordering::SeqCst);
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if a record exists at the given address.
    #[must_use]
    pub fn contains(&self, address: &BackendAddress) -> bool {
        self.data.lock().contains_key(address)
    }

    fn is_connected_flag(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl<V> MockBackend<V>
where
    V: Clone,
{
    /// Stores a record directly, bypassing the operation log and failure injection.
    ///
    /// Use this to set up records that the adapter would never write itself, such as
    /// null payloads or records without a stored key.
    pub fn seed(&self, address: BackendAddress, payload: Option<V>, stored_key: Option<&str>) {
        self.data.lock().insert(
            address,
            StoredRecord {
                payload,
                stored_key: stored_key.map(ToString::to_string),
                ttl: None,
            },
        );
    }

    /// Returns the stored value at the given address, if any.
    #[must_use]
    pub fn payload(&self, address: &BackendAddress) -> Option<V> {
        self.data.lock().get(address).and_then(|record| record.payload.clone())
    }

    /// Returns the TTL the record at the given address was last written with.
    ///
    /// The outer `Option` is `None` when there is no record.
    #[must_use]
    pub fn ttl(&self, address: &BackendAddress) -> Option<Option<Duration>> {
        self.data.lock().get(address).map(|record| record.ttl)
    }

    /// Sets a predicate that determines when operations should fail.
    ///
    /// The predicate receives the operation and returns `true` if it should fail.
    /// Failed operations are still recorded but leave the stored data untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachepool_backend::testing::{BackendOp, MockBackend};
    ///
    /// let backend: MockBackend<String> = MockBackend::new();
    ///
    /// // Fail all operations
    /// backend.fail_when(|_| true);
    ///
    /// // Fail writes of one key only
    /// backend.fail_when(|op| matches!(op, BackendOp::Put { address, .. } if address.key() == "bad"));
    /// ```
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&BackendOp<V>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<BackendOp<V>> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    /// Records the operation and reports whether it should fail.
    fn record(&self, op: BackendOp<V>) -> bool {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        self.operations.lock().push(op);
        fail
    }

    fn to_record(address: &BackendAddress, stored: &StoredRecord<V>) -> Record<V> {
        let record = Record::new(address.clone(), stored.payload.clone());
        match &stored.stored_key {
            Some(key) => record.with_stored_key(key.clone()),
            None => record,
        }
    }
}

impl<V> StorageBackend<V> for MockBackend<V>
where
    V: Clone + Send + Sync,
{
    fn is_connected(&self) -> bool {
        self.is_connected_flag()
    }

    async fn get(&self, address: &BackendAddress) -> BackendStatus<Record<V>> {
        if self.record(BackendOp::Get(address.clone())) {
            return BackendStatus::Failure(Error::from_message("mock: get failed"));
        }
        match self.data.lock().get(address) {
            Some(stored) => BackendStatus::Success(Self::to_record(address, stored)),
            None => BackendStatus::NotFound,
        }
    }

    async fn get_many(&self, addresses: &[BackendAddress]) -> BackendStatus<Vec<Record<V>>> {
        if self.record(BackendOp::GetMany(addresses.to_vec())) {
            return BackendStatus::Failure(Error::from_message("mock: get_many failed"));
        }
        let data = self.data.lock();
        let records = addresses
            .iter()
            .filter_map(|address| data.get(address).map(|stored| Self::to_record(address, stored)))
            .collect();
        BackendStatus::Success(records)
    }

    async fn put(&self, address: &BackendAddress, payload: V, ttl: Option<Duration>, policy: KeyPolicy) -> BackendStatus {
        let op = BackendOp::Put {
            address: address.clone(),
            payload: payload.clone(),
            ttl,
            policy,
        };
        if self.record(op) {
            return BackendStatus::Failure(Error::from_message("mock: put failed"));
        }
        let stored_key = match policy {
            KeyPolicy::Send => Some(address.key().to_string()),
            KeyPolicy::Digest => None,
        };
        self.data.lock().insert(
            address.clone(),
            StoredRecord {
                payload: Some(payload),
                stored_key,
                ttl,
            },
        );
        BackendStatus::Success(())
    }

    async fn remove(&self, address: &BackendAddress) -> BackendStatus {
        if self.record(BackendOp::Remove(address.clone())) {
            return BackendStatus::Failure(Error::from_message("mock: remove failed"));
        }
        match self.data.lock().remove(address) {
            Some(_) => BackendStatus::Success(()),
            None => BackendStatus::NotFound,
        }
    }

    async fn scan(&self, namespace: &str, collection: &str, visit: &mut (dyn FnMut(Record<V>) + Send)) -> BackendStatus {
        let op = BackendOp::Scan {
            namespace: namespace.to_string(),
            collection: collection.to_string(),
        };
        if self.record(op) {
            return BackendStatus::Failure(Error::from_message("mock: scan failed"));
        }
        // Snapshot first so `visit` may call back into the backend.
        let records: Vec<_> = self
            .data
            .lock()
            .iter()
            .filter(|(address, _)| address.is_in(namespace, collection))
            .map(|(address, stored)| Self::to_record(address, stored))
            .collect();
        for record in records {
            visit(record);
        }
        BackendStatus::Success(())
    }

    async fn truncate(&self, namespace: &str, collection: &str) -> Option<BackendStatus> {
        if !self.native_truncate.load(Ordering::SeqCst) {
            return None;
        }
        let op = BackendOp::Truncate {
            namespace: namespace.to_string(),
            collection: collection.to_string(),
        };
        if self.record(op) {
            return Some(BackendStatus::Failure(Error::from_message("mock: truncate failed")));
        }
        self.data.lock().retain(|address, _| !address.is_in(namespace, collection));
        Some(BackendStatus::Success(()))
    }
}
