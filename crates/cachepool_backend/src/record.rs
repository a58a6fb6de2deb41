// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::BackendAddress;

/// Controls whether the user key is stored alongside a record.
///
/// Many engines hash the key into a digest and keep only the digest. A record written
/// with [`KeyPolicy::Digest`] cannot be mapped back to its key during a scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyPolicy {
    /// Store only what the engine needs to address the record.
    #[default]
    Digest,
    /// Store the user key with the record so scans can report it.
    Send,
}

/// A record read from a storage backend.
///
/// `payload` is `None` when the engine holds the record but its value is null.
/// `stored_key` is `Some` only when the record was written with [`KeyPolicy::Send`].
///
/// # Examples
///
/// ```
/// use cachepool_backend::{BackendAddress, Record};
///
/// let address = BackendAddress::new("ns", "set", "k");
/// let record = Record::new(address, Some("v")).with_stored_key("k");
/// assert_eq!(record.payload(), Some(&"v"));
/// assert_eq!(record.stored_key(), Some("k"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record<V> {
    address: BackendAddress,
    stored_key: Option<String>,
    payload: Option<V>,
}

impl<V> Record<V> {
    /// Creates a record without a stored key.
    pub fn new(address: BackendAddress, payload: Option<V>) -> Self {
        Self {
            address,
            stored_key: None,
            payload,
        }
    }

    /// Attaches the user key that was stored with the record.
    #[must_use]
    pub fn with_stored_key(mut self, key: impl Into<String>) -> Self {
        self.stored_key = Some(key.into());
        self
    }

    /// The address the record was read from.
    #[must_use]
    pub fn address(&self) -> &BackendAddress {
        &self.address
    }

    /// The user key stored with the record, if it was written with [`KeyPolicy::Send`].
    #[must_use]
    pub fn stored_key(&self) -> Option<&str> {
        self.stored_key.as_deref()
    }

    /// The stored value, or `None` if the record holds a null value.
    #[must_use]
    pub fn payload(&self) -> Option<&V> {
        self.payload.as_ref()
    }

    /// Splits the record into its address, stored key, and payload.
    #[must_use]
    pub fn into_parts(self) -> (BackendAddress, Option<String>, Option<V>) {
        (self.address, self.stored_key, self.payload)
    }
}
