// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Writes buffered by `save_deferred` until the next commit.

use std::collections::HashMap;
use std::time::Duration;

/// A write waiting for commit. The TTL is already resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PendingWrite<V> {
    pub key: String,
    pub payload: V,
    pub ttl: Option<Duration>,
}

/// Deferred writes keyed by logical key, drained in insertion order.
///
/// Buffering a key twice keeps the latest write at the position of the first one.
#[derive(Debug)]
pub(crate) struct PendingWrites<V> {
    order: Vec<String>,
    entries: HashMap<String, PendingWrite<V>>,
}

impl<V> Default for PendingWrites<V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<V> PendingWrites<V> {
    pub fn insert(&mut self, write: PendingWrite<V>) {
        if !self.entries.contains_key(&write.key) {
            self.order.push(write.key.clone());
        }
        self.entries.insert(write.key.clone(), write);
    }

    pub fn remove(&mut self, key: &str) -> Option<PendingWrite<V>> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    /// Empties the buffer and returns its writes in insertion order.
    pub fn drain(&mut self) -> Vec<PendingWrite<V>> {
        let mut entries = std::mem::take(&mut self.entries);
        std::mem::take(&mut self.order)
            .into_iter()
            .filter_map(|key| entries.remove(&key))
            .collect()
    }
}
