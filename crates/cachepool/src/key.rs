// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mapping logical cache keys to backend addresses.

use cachepool_backend::BackendAddress;

use crate::{AdapterConfig, Error, Result};

/// Maps a logical cache key to the address of its record in the backend.
///
/// Implementations must be pure and injective: two distinct keys must never map to the
/// same address, or they would overwrite each other. The adapter cannot detect a
/// violation.
///
/// Any `Fn(&str) -> BackendAddress` closure is a transformer.
///
/// # Examples
///
/// ```
/// use cachepool::KeyTransformer;
/// use cachepool_backend::BackendAddress;
///
/// let lowercase = |key: &str| BackendAddress::new("app", "items", key.to_lowercase());
/// assert_eq!(lowercase.transform("Key").key(), "key");
/// ```
pub trait KeyTransformer: Send + Sync {
    /// Returns the backend address for `key`.
    fn transform(&self, key: &str) -> BackendAddress;
}

impl<F> KeyTransformer for F
where
    F: Fn(&str) -> BackendAddress + Send + Sync,
{
    fn transform(&self, key: &str) -> BackendAddress {
        self(key)
    }
}

/// Places every key in one namespace and collection, unchanged.
///
/// This is the default transformer; it reads the namespace and collection from
/// [`AdapterConfig`].
///
/// # Examples
///
/// ```
/// use cachepool::{KeyTransformer, NamespacedKeys};
///
/// let keys = NamespacedKeys::new("cache", "sessions");
/// assert_eq!(keys.transform("abc").to_string(), "cache/sessions/abc");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespacedKeys {
    namespace: String,
    collection: String,
}

impl NamespacedKeys {
    /// Creates a transformer for the given namespace and collection.
    pub fn new(namespace: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            collection: collection.into(),
        }
    }

    /// Creates a transformer for the namespace and collection of `config`.
    #[must_use]
    pub fn from_config(config: &AdapterConfig) -> Self {
        Self::new(config.namespace(), config.collection())
    }
}

impl KeyTransformer for NamespacedKeys {
    fn transform(&self, key: &str) -> BackendAddress {
        BackendAddress::new(self.namespace.as_str(), self.collection.as_str(), key)
    }
}

/// Rejects keys the adapter cannot address.
pub(crate) fn validate(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid_key(key));
    }
    Ok(())
}
