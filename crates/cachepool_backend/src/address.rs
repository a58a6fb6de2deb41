// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

/// The location of a record inside a storage engine.
///
/// Engines such as Aerospike address records by namespace, set, and user key; key-value
/// stores usually fold the same three parts into one string. `BackendAddress` carries the
/// parts separately and leaves the folding to the backend.
///
/// # Examples
///
/// ```
/// use cachepool_backend::BackendAddress;
///
/// let address = BackendAddress::new("cache", "sessions", "user:42");
/// assert_eq!(address.namespace(), "cache");
/// assert_eq!(address.collection(), "sessions");
/// assert_eq!(address.key(), "user:42");
/// assert_eq!(address.to_string(), "cache/sessions/user:42");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackendAddress {
    namespace: String,
    collection: String,
    key: String,
}

impl BackendAddress {
    /// Creates an address from its namespace, collection, and key parts.
    pub fn new(namespace: impl Into<String>, collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            collection: collection.into(),
            key: key.into(),
        }
    }

    /// The top-level namespace, typically one per application or tenant.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The collection (set, table, bucket) inside the namespace.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The key of the record inside its collection.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns `true` if this address lives in the given namespace and collection.
    #[must_use]
    pub fn is_in(&self, namespace: &str, collection: &str) -> bool {
        self.namespace == namespace && self.collection == collection
    }
}

impl fmt::Display for BackendAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.collection, self.key)
    }
}
