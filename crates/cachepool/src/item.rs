// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

/// One cache slot: a key, whether it was found, and the stored value.
///
/// Items returned by reads are either hits, carrying the stored value, or misses. Reading
/// the value of a miss always yields `None`, even if a value was [`set`](CacheItem::set) on
/// it, so a miss can never be mistaken for fresh data.
///
/// To write, set a value on an item (a fresh one or a miss returned by a read) and hand it
/// to [`CacheAdapter::save`](crate::CacheAdapter::save) or
/// [`CacheAdapter::save_deferred`](crate::CacheAdapter::save_deferred).
///
/// # Examples
///
/// ```
/// use cachepool::CacheItem;
/// use std::time::Duration;
///
/// let mut item = CacheItem::new("user:42");
/// assert!(!item.is_hit());
///
/// item.set("Ada").expires_after(Duration::from_secs(300));
///
/// // Still a miss until it has been read back from storage.
/// assert!(!item.is_hit());
/// assert_eq!(item.value(), None);
/// assert_eq!(item.ttl(), Some(Duration::from_secs(300)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheItem<V> {
    key: String,
    value: Option<V>,
    hit: bool,
    ttl: Option<Duration>,
}

impl<V> CacheItem<V> {
    /// Creates an empty item (a miss) for the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            hit: false,
            ttl: None,
        }
    }

    /// Creates an item carrying a value to write.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachepool::CacheItem;
    ///
    /// let item = CacheItem::with_value("greeting", "hello".to_string());
    /// assert_eq!(item.key(), "greeting");
    /// assert!(!item.is_hit());
    /// ```
    pub fn with_value(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value: Some(value),
            hit: false,
            ttl: None,
        }
    }

    /// Creates a hit for a value read from storage.
    pub(crate) fn hit(key: String, value: V) -> Self {
        Self {
            key,
            value: Some(value),
            hit: true,
            ttl: None,
        }
    }

    /// The logical key of this item.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns `true` if the key was found in storage with a non-null value.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// The stored value, or `None` for a miss.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        if self.hit { self.value.as_ref() } else { None }
    }

    /// Consumes the item and returns the stored value, or `None` for a miss.
    #[must_use]
    pub fn into_value(self) -> Option<V> {
        if self.hit { self.value } else { None }
    }

    /// Sets the value to write. Does not turn a miss into a hit.
    pub fn set(&mut self, value: V) -> &mut Self {
        self.value = Some(value);
        self
    }

    /// Sets a per-item TTL, used when a write does not pass one explicitly.
    pub fn expires_after(&mut self, ttl: Duration) -> &mut Self {
        self.ttl = Some(ttl);
        self
    }

    /// The per-item TTL, if one was set.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Splits the item into its key, the value to write, and the per-item TTL.
    pub(crate) fn into_write_parts(self) -> (String, Option<V>, Option<Duration>) {
        (self.key, self.value, self.ttl)
    }
}
