// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory backends.
//!
//! The builder abstracts the underlying moka configuration, so moka's types never
//! appear in the public API.

use std::marker::PhantomData;
use std::time::Duration;

use crate::backend::InMemoryBackend;

/// Builder for configuring an [`InMemoryBackend`].
///
/// # Examples
///
/// ```
/// use cachepool_memory::InMemoryBackend;
/// use std::time::Duration;
///
/// let backend = InMemoryBackend::<String>::builder()
///     .max_capacity(10_000)
///     .initial_capacity(100)
///     .default_ttl(Duration::from_secs(300))
///     .name("sessions")
///     .build();
/// ```
#[derive(Debug)]
pub struct InMemoryBackendBuilder<V> {
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) default_ttl: Option<Duration>,
    pub(crate) name: Option<String>,
    _phantom: PhantomData<V>,
}

impl<V> Default for InMemoryBackendBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> InMemoryBackendBuilder<V> {
    /// Creates a builder for an unbounded backend without a default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_capacity: None,
            initial_capacity: None,
            default_ttl: None,
            name: None,
            _phantom: PhantomData,
        }
    }

    /// Sets the maximum number of records.
    ///
    /// Once the capacity is reached, records are evicted using moka's `TinyLFU` policy.
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the initial capacity (pre-allocation hint).
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets the TTL of records written without one.
    ///
    /// This plays the role of an engine's namespace default; without it such records
    /// never expire.
    #[must_use]
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Sets a name that may appear in logs or debugging output of the underlying cache.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the configured backend.
    #[must_use]
    pub fn build(self) -> InMemoryBackend<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        InMemoryBackend::from_builder(&self)
    }
}
