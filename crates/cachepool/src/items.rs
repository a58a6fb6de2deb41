// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;

use crate::CacheItem;

/// The result of a batch read: one [`CacheItem`] per distinct requested key.
///
/// Items keep the order of the request. A key requested more than once appears once, at
/// the position of its first occurrence. Keys the backend did not return are misses.
///
/// # Examples
///
/// ```
/// use cachepool::{CacheItem, Items};
///
/// let items: Items<i32> = ["a", "b"].into_iter().map(CacheItem::new).collect();
/// assert_eq!(items.keys().collect::<Vec<_>>(), ["a", "b"]);
/// assert!(!items.get("a").unwrap().is_hit());
/// assert!(items.get("c").is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Items<V> {
    items: Vec<CacheItem<V>>,
    index: HashMap<String, usize>,
}

impl<V> Default for Items<V> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> Items<V> {
    /// Returns the item for `key`, if it was requested.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CacheItem<V>> {
        self.index.get(key).map(|&position| &self.items[position])
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no key was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items that are hits.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.items.iter().filter(|item| item.is_hit()).count()
    }

    /// Iterates over the items in request order.
    pub fn iter(&self) -> std::slice::Iter<'_, CacheItem<V>> {
        self.items.iter()
    }

    /// Iterates over the keys in request order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(CacheItem::key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut CacheItem<V>> {
        self.index.get(key).map(|&position| &mut self.items[position])
    }
}

impl<V> FromIterator<CacheItem<V>> for Items<V> {
    /// Collects items, keeping the first item of each key.
    fn from_iter<I: IntoIterator<Item = CacheItem<V>>>(iter: I) -> Self {
        let mut items = Self::default();
        for item in iter {
            if !items.index.contains_key(item.key()) {
                items.index.insert(item.key().to_string(), items.items.len());
                items.items.push(item);
            }
        }
        items
    }
}

impl<V> IntoIterator for Items<V> {
    type Item = CacheItem<V>;
    type IntoIter = std::vec::IntoIter<CacheItem<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Items<V> {
    type Item = &'a CacheItem<V>;
    type IntoIter = std::slice::Iter<'a, CacheItem<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
