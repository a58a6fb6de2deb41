// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The cache adapter: key namespacing, TTL defaults, batch reads and deferred writes on
//! top of any [`StorageBackend`].

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use cachepool_backend::{BackendAddress, BackendStatus, KeyPolicy, Record, StorageBackend};
use parking_lot::Mutex;

use crate::deferred::{PendingWrite, PendingWrites};
use crate::key::{self, KeyTransformer, NamespacedKeys};
use crate::telemetry::ext::ClockExt;
use crate::telemetry::{CacheActivity, CacheOperation, CacheTelemetry};
use crate::{AdapterConfig, CacheItem, Error, Items, Result};

/// A cache item pool over a storage backend.
///
/// All operations take `&self`; share one adapter between tasks with an `Arc`. Build one
/// with [`AdapterBuilder`](crate::AdapterBuilder).
///
/// Backend failures never surface as errors from the lenient operations: reads degrade
/// to misses and writes and deletes return `false`, with a `WARN` event logged. Use
/// [`try_get_item`](Self::try_get_item) and [`try_get_items`](Self::try_get_items) to tell
/// a failure apart from a miss.
///
/// # Examples
///
/// ```
/// use cachepool::{AdapterBuilder, AdapterConfig, CacheAdapter, CacheItem};
/// use cachepool_backend::testing::MockBackend;
/// use std::time::Duration;
/// use tick::Clock;
///
/// # futures::executor::block_on(async {
/// let config = AdapterConfig::builder()
///     .host("localhost")
///     .port(3000)
///     .namespace("app")
///     .collection("users")
///     .build()?;
///
/// let cache: CacheAdapter<String, _> = AdapterBuilder::new(config, Clock::new_frozen()).build(MockBackend::new())?;
///
/// // Batch writes are buffered until commit
/// cache.save_deferred(CacheItem::with_value("a", "1".to_string()), None)?;
/// cache.save_deferred(CacheItem::with_value("b", "2".to_string()), Some(Duration::from_secs(30)))?;
/// assert!(cache.commit().await);
///
/// let items = cache.get_items(["a", "b", "c"]).await?;
/// assert_eq!(items.hits(), 2);
/// assert!(!items.get("c").unwrap().is_hit());
/// # Ok::<(), cachepool::Error>(())
/// # }).unwrap();
/// ```
pub struct CacheAdapter<V, B, T = NamespacedKeys> {
    config: AdapterConfig,
    backend: B,
    keys: T,
    telemetry: CacheTelemetry,
    pending: Mutex<PendingWrites<V>>,
}

impl<V, B, T> fmt::Debug for CacheAdapter<V, B, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheAdapter")
            .field("config", &self.config)
            .field("pending", &self.pending.lock().len())
            .finish_non_exhaustive()
    }
}

impl<V, B, T> CacheAdapter<V, B, T> {
    pub(crate) fn new(config: AdapterConfig, backend: B, keys: T, telemetry: CacheTelemetry) -> Self {
        Self {
            config,
            backend,
            keys,
            telemetry,
            pending: Mutex::new(PendingWrites::default()),
        }
    }

    /// The configuration this adapter was built with.
    #[must_use]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// The storage backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of deferred writes waiting for [`commit`](Self::commit).
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }
}

impl<V, B, T> CacheAdapter<V, B, T>
where
    V: Send,
    B: StorageBackend<V>,
    T: KeyTransformer,
{
    /// Reads one item. A backend failure is logged and returned as a miss.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidKey`](crate::ErrorKind::InvalidKey) if `key` is empty.
    pub async fn get_item(&self, key: &str) -> Result<CacheItem<V>> {
        key::validate(key)?;
        Ok(self.fetch(key).await.unwrap_or_else(|_| CacheItem::new(key)))
    }

    /// Reads one item, reporting backend failures instead of degrading them to a miss.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidKey`](crate::ErrorKind::InvalidKey) if `key` is empty, or
    /// [`ErrorKind::Backend`](crate::ErrorKind::Backend) if the backend call failed.
    pub async fn try_get_item(&self, key: &str) -> Result<CacheItem<V>> {
        key::validate(key)?;
        self.fetch(key).await.map_err(Error::backend)
    }

    /// Returns `true` if `key` resolves to a stored value.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidKey`](crate::ErrorKind::InvalidKey) if `key` is empty.
    pub async fn has_item(&self, key: &str) -> Result<bool> {
        Ok(self.get_item(key).await?.is_hit())
    }

    /// Reads several items with one backend call.
    ///
    /// The result holds one item per distinct key, in request order. If the backend call
    /// fails, every item is a miss.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidKey`](crate::ErrorKind::InvalidKey) if any key is empty;
    /// the backend is not called.
    pub async fn get_items<I, K>(&self, keys: I) -> Result<Items<V>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut items = requested(keys)?;
        // Failures are logged by `fetch_many`; the items stay misses.
        let _ = self.fetch_many(&mut items).await;
        Ok(items)
    }

    /// Reads several items, reporting a failed backend call instead of returning misses.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidKey`](crate::ErrorKind::InvalidKey) if any key is empty, or
    /// [`ErrorKind::Backend`](crate::ErrorKind::Backend) if the backend call failed.
    pub async fn try_get_items<I, K>(&self, keys: I) -> Result<Items<V>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut items = requested(keys)?;
        self.fetch_many(&mut items).await.map_err(Error::backend)?;
        Ok(items)
    }

    /// Writes an item immediately. Pending deferred writes are left untouched.
    ///
    /// The TTL is `ttl` if given, else the item's own TTL, else the configured default,
    /// else the backend's default. Returns `false` if the backend rejected the write.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidKey`](crate::ErrorKind::InvalidKey) if the key is empty, or
    /// [`ErrorKind::MissingValue`](crate::ErrorKind::MissingValue) if no value was set.
    pub async fn save(&self, item: CacheItem<V>, ttl: Option<Duration>) -> Result<bool> {
        let write = self.prepare(item, ttl)?;
        Ok(self.write(CacheOperation::Save, write).await)
    }

    /// Buffers a write until the next [`commit`](Self::commit).
    ///
    /// Deferring a key that is already buffered replaces the earlier write. The TTL is
    /// resolved now, as for [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Same as [`save`](Self::save); nothing is buffered on error.
    pub fn save_deferred(&self, item: CacheItem<V>, ttl: Option<Duration>) -> Result<()> {
        let write = self.prepare(item, ttl)?;
        self.telemetry
            .record(CacheOperation::SaveDeferred, CacheActivity::Deferred, Some(&write.key), None);
        self.pending.lock().insert(write);
        Ok(())
    }

    /// Writes every deferred item, in the order they were first deferred.
    ///
    /// Every write is attempted even if an earlier one fails. The buffer is empty
    /// afterwards; failed writes are dropped, not retried. Returns `true` if all writes
    /// succeeded, including when there was nothing to write.
    pub async fn commit(&self) -> bool {
        let writes = self.pending.lock().drain();
        let count = writes.len();

        let mut committed = true;
        for write in writes {
            committed &= self.write(CacheOperation::Commit, write).await;
        }

        let activity = if committed { CacheActivity::Committed } else { CacheActivity::Failed };
        self.telemetry.record_batch(CacheOperation::Commit, activity, count, None);
        committed
    }

    /// Deletes one item, including a pending deferred write for it.
    ///
    /// Deleting a key that does not exist succeeds. Returns `false` if the backend failed.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidKey`](crate::ErrorKind::InvalidKey) if `key` is empty.
    pub async fn delete_item(&self, key: &str) -> Result<bool> {
        key::validate(key)?;
        Ok(self.remove(key).await)
    }

    /// Deletes several items, attempting every key. Returns `true` if all deletes succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidKey`](crate::ErrorKind::InvalidKey) if any key is empty;
    /// nothing is deleted.
    pub async fn delete_items<I, K>(&self, keys: I) -> Result<bool>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<K> = keys.into_iter().collect();
        for key in &keys {
            key::validate(key.as_ref())?;
        }

        let mut deleted = true;
        for key in &keys {
            deleted &= self.remove(key.as_ref()).await;
        }
        Ok(deleted)
    }

    /// Deletes every item in the configured namespace and collection, and drops all
    /// deferred writes.
    ///
    /// Uses the backend's native truncate when it has one. Otherwise scans the collection
    /// and deletes each record that was stored with its key at the address it was found
    /// at, which costs one call per record; records stored without their key are skipped.
    /// Only the configured namespace and collection are scanned, so records a custom
    /// [`KeyTransformer`] places elsewhere are not reached. Returns `true` if the truncate,
    /// or the scan and every delete, succeeded.
    pub async fn clear(&self) -> bool {
        self.pending.lock().clear();

        let namespace = self.config.namespace();
        let collection = self.config.collection();
        let clock = self.telemetry.clock();

        let truncated = clock.timed_async(self.backend.truncate(namespace, collection)).await;
        if let Some(status) = truncated.result {
            let cleared = !status.is_failure();
            let activity = if cleared { CacheActivity::Cleared } else { CacheActivity::Failed };
            self.telemetry
                .record(CacheOperation::Clear, activity, None, Some(truncated.duration));
            return cleared;
        }

        // The stored key is the transformed one; delete where the record was found.
        let mut found = Vec::new();
        let scanned = clock
            .timed_async(self.backend.scan(namespace, collection, &mut |record: Record<V>| {
                if let Some(key) = record.stored_key() {
                    found.push((key.to_string(), record.address().clone()));
                }
            }))
            .await;

        let mut cleared = !scanned.result.is_failure();
        for (key, address) in &found {
            cleared &= self.remove_at(key, address).await;
        }

        let activity = if cleared { CacheActivity::Cleared } else { CacheActivity::Failed };
        self.telemetry
            .record_batch(CacheOperation::Clear, activity, found.len(), Some(scanned.duration));
        cleared
    }

    async fn fetch(&self, key: &str) -> std::result::Result<CacheItem<V>, cachepool_backend::Error> {
        let address = self.keys.transform(key);
        let timed = self.telemetry.clock().timed_async(self.backend.get(&address)).await;

        let payload = match timed.result {
            BackendStatus::Success(record) => record.into_parts().2,
            BackendStatus::NotFound => None,
            BackendStatus::Failure(error) => {
                self.telemetry
                    .record(CacheOperation::Get, CacheActivity::Failed, Some(key), Some(timed.duration));
                return Err(error);
            }
        };

        let activity = if payload.is_some() { CacheActivity::Hit } else { CacheActivity::Miss };
        self.telemetry.record(CacheOperation::Get, activity, Some(key), Some(timed.duration));

        Ok(match payload {
            Some(payload) => CacheItem::hit(key.to_string(), payload),
            None => CacheItem::new(key),
        })
    }

    /// Turns the misses in `items` into hits for every record the backend returns.
    ///
    /// Records are matched by address, so their order does not matter. Records for
    /// addresses that were not requested are ignored. On failure `items` is untouched.
    async fn fetch_many(&self, items: &mut Items<V>) -> std::result::Result<(), cachepool_backend::Error> {
        if items.is_empty() {
            return Ok(());
        }

        let addresses: Vec<BackendAddress> = items.keys().map(|key| self.keys.transform(key)).collect();
        let lookup: HashMap<BackendAddress, String> = addresses
            .iter()
            .cloned()
            .zip(items.keys().map(str::to_string))
            .collect();

        let timed = self.telemetry.clock().timed_async(self.backend.get_many(&addresses)).await;
        let records = match timed.result {
            BackendStatus::Success(records) => records,
            BackendStatus::NotFound => Vec::new(),
            BackendStatus::Failure(error) => {
                self.telemetry
                    .record_batch(CacheOperation::GetMany, CacheActivity::Failed, items.len(), Some(timed.duration));
                return Err(error);
            }
        };

        for record in records {
            let (address, _, payload) = record.into_parts();
            let (Some(key), Some(payload)) = (lookup.get(&address), payload) else {
                continue;
            };
            if let Some(slot) = items.get_mut(key)
                && !slot.is_hit()
            {
                *slot = CacheItem::hit(key.clone(), payload);
            }
        }

        self.telemetry
            .record_batch(CacheOperation::GetMany, CacheActivity::Ok, items.len(), Some(timed.duration));
        Ok(())
    }

    fn prepare(&self, item: CacheItem<V>, ttl: Option<Duration>) -> Result<PendingWrite<V>> {
        let (key, payload, item_ttl) = item.into_write_parts();
        key::validate(&key)?;
        let Some(payload) = payload else {
            return Err(Error::missing_value(&key));
        };

        Ok(PendingWrite {
            ttl: ttl.or(item_ttl).or(self.config.default_ttl()),
            key,
            payload,
        })
    }

    async fn write(&self, operation: CacheOperation, write: PendingWrite<V>) -> bool {
        let PendingWrite { key, payload, ttl } = write;
        let address = self.keys.transform(&key);
        let timed = self
            .telemetry
            .clock()
            .timed_async(self.backend.put(&address, payload, ttl, KeyPolicy::Send))
            .await;

        let written = timed.result.is_success();
        let activity = if written { CacheActivity::Inserted } else { CacheActivity::Failed };
        self.telemetry.record(operation, activity, Some(&key), Some(timed.duration));
        written
    }

    async fn remove(&self, key: &str) -> bool {
        self.pending.lock().remove(key);
        self.remove_at(key, &self.keys.transform(key)).await
    }

    async fn remove_at(&self, key: &str, address: &BackendAddress) -> bool {
        let timed = self.telemetry.clock().timed_async(self.backend.remove(address)).await;

        let removed = !timed.result.is_failure();
        let activity = if removed { CacheActivity::Invalidated } else { CacheActivity::Failed };
        self.telemetry
            .record(CacheOperation::Delete, activity, Some(key), Some(timed.duration));
        removed
    }
}

/// Validates the keys of a batch and turns them into misses, one per distinct key.
fn requested<V, I, K>(keys: I) -> Result<Items<V>>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    keys.into_iter()
        .map(|key| {
            let key = key.as_ref();
            key::validate(key)?;
            Ok(CacheItem::new(key))
        })
        .collect()
}
