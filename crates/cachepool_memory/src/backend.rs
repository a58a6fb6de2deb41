// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory backend implementation using moka.

use std::time::{Duration, Instant};

use cachepool_backend::{BackendAddress, BackendStatus, KeyPolicy, Record, StorageBackend};
use moka::Expiry;
use moka::future::Cache;

use crate::builder::InMemoryBackendBuilder;

#[derive(Debug, Clone)]
struct StoredEntry<V> {
    payload: V,
    stored_key: Option<String>,
    ttl: Option<Duration>,
}

impl<V: Clone> StoredEntry<V> {
    fn to_record(&self, address: &BackendAddress) -> Record<V> {
        let record = Record::new(address.clone(), Some(self.payload.clone()));
        match &self.stored_key {
            Some(key) => record.with_stored_key(key.as_str()),
            None => record,
        }
    }
}

/// Expires each entry after its own TTL, or the backend default when it has none.
#[derive(Debug)]
struct EntryExpiry {
    default_ttl: Option<Duration>,
}

impl<V> Expiry<BackendAddress, StoredEntry<V>> for EntryExpiry {
    fn expire_after_create(&self, _address: &BackendAddress, entry: &StoredEntry<V>, _created_at: Instant) -> Option<Duration> {
        entry.ttl.or(self.default_ttl)
    }

    fn expire_after_update(
        &self,
        _address: &BackendAddress,
        entry: &StoredEntry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl.or(self.default_ttl)
    }
}

/// A storage backend that keeps records in process memory.
///
/// Clones share the same storage. Every operation succeeds; the backend never reports
/// [`BackendStatus::Failure`].
///
/// # Examples
///
/// ```
/// use cachepool_backend::{BackendAddress, KeyPolicy, StorageBackend};
/// use cachepool_memory::InMemoryBackend;
/// # futures::executor::block_on(async {
///
/// let backend = InMemoryBackend::<i32>::new();
/// let address = BackendAddress::new("ns", "set", "k");
///
/// assert!(backend.get(&address).await.is_not_found());
/// backend.put(&address, 42, None, KeyPolicy::Digest).await;
/// assert!(backend.get(&address).await.is_success());
///
/// // Native truncate of the whole collection
/// assert!(backend.truncate("ns", "set").await.unwrap().is_success());
/// assert!(backend.get(&address).await.is_not_found());
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryBackend<V>
where
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<BackendAddress, StoredEntry<V>>,
}

impl<V> Default for InMemoryBackend<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> InMemoryBackend<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates an unbounded backend without a default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder for configuring an in-memory backend.
    #[must_use]
    pub fn builder() -> InMemoryBackendBuilder<V> {
        InMemoryBackendBuilder::new()
    }

    pub(crate) fn from_builder(builder: &InMemoryBackendBuilder<V>) -> Self {
        let mut moka_builder = Cache::builder().expire_after(EntryExpiry {
            default_ttl: builder.default_ttl,
        });

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: moka_builder.build(),
        }
    }

    /// Approximate number of stored records.
    ///
    /// Moka updates the count lazily, so recent writes and removals may not be reflected
    /// yet.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    fn matching(&self, namespace: &str, collection: &str) -> Vec<(BackendAddress, StoredEntry<V>)> {
        self.inner
            .iter()
            .filter(|(address, _)| address.is_in(namespace, collection))
            .map(|(address, entry)| ((*address).clone(), entry))
            .collect()
    }
}

impl<V> StorageBackend<V> for InMemoryBackend<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn is_connected(&self) -> bool {
        true
    }

    async fn get(&self, address: &BackendAddress) -> BackendStatus<Record<V>> {
        match self.inner.get(address).await {
            Some(entry) => BackendStatus::Success(entry.to_record(address)),
            None => BackendStatus::NotFound,
        }
    }

    async fn get_many(&self, addresses: &[BackendAddress]) -> BackendStatus<Vec<Record<V>>> {
        let mut records = Vec::with_capacity(addresses.len());
        for address in addresses {
            if let Some(entry) = self.inner.get(address).await {
                records.push(entry.to_record(address));
            }
        }
        BackendStatus::Success(records)
    }

    async fn put(&self, address: &BackendAddress, payload: V, ttl: Option<Duration>, policy: KeyPolicy) -> BackendStatus {
        let stored_key = match policy {
            KeyPolicy::Send => Some(address.key().to_string()),
            KeyPolicy::Digest => None,
        };
        self.inner
            .insert(
                address.clone(),
                StoredEntry {
                    payload,
                    stored_key,
                    ttl,
                },
            )
            .await;
        BackendStatus::Success(())
    }

    async fn remove(&self, address: &BackendAddress) -> BackendStatus {
        match self.inner.remove(address).await {
            Some(_) => BackendStatus::Success(()),
            None => BackendStatus::NotFound,
        }
    }

    async fn scan(&self, namespace: &str, collection: &str, visit: &mut (dyn FnMut(Record<V>) + Send)) -> BackendStatus {
        for (address, entry) in self.matching(namespace, collection) {
            visit(entry.to_record(&address));
        }
        BackendStatus::Success(())
    }

    async fn truncate(&self, namespace: &str, collection: &str) -> Option<BackendStatus> {
        for (address, _) in self.matching(namespace, collection) {
            self.inner.invalidate(&address).await;
        }
        Some(BackendStatus::Success(()))
    }
}
