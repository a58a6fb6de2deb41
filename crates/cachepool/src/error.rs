// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for adapter construction and caller mistakes.
//!
//! Backend failures during reads, writes, and deletes are not errors on the lenient
//! paths: they degrade to misses and `false`. Only the strict `try_*` reads surface them
//! as [`ErrorKind::Backend`].

/// The result for fallible adapter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised by a cache adapter.
///
/// Use [`Error::kind`] to tell the failure classes apart.
///
/// # Examples
///
/// ```
/// use cachepool::{AdapterConfig, ErrorKind};
///
/// let error = AdapterConfig::builder().host("localhost").build().unwrap_err();
/// assert!(matches!(error.kind(), ErrorKind::Configuration { option: "port" }));
/// ```
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(#[from] ErrorKind);

/// The class of an [`Error`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The logical key is empty.
    #[error("invalid cache key {key:?}: keys must not be empty")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },

    /// An item was handed to a write without a value to store.
    #[error("cache item {key:?} has no value to store")]
    MissingValue {
        /// The key of the rejected item.
        key: String,
    },

    /// A required configuration option is missing or empty.
    #[error("missing required configuration option `{option}`")]
    Configuration {
        /// The name of the option, as spelled in configuration files.
        option: &'static str,
    },

    /// The backend reported itself disconnected when the adapter was built.
    #[error("storage backend is not connected")]
    Disconnected,

    /// The connector failed to open a backend.
    #[error("failed to connect to the storage backend")]
    Connect(#[source] cachepool_backend::Error),

    /// A backend call failed; only returned by the strict `try_*` reads.
    #[error("storage backend operation failed")]
    Backend(#[source] cachepool_backend::Error),
}

impl Error {
    /// Returns the class of this error.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Returns `true` if the adapter could not reach its backend at construction.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self.0, ErrorKind::Disconnected | ErrorKind::Connect(_))
    }

    pub(crate) fn invalid_key(key: &str) -> Self {
        Self(ErrorKind::InvalidKey { key: key.to_string() })
    }

    pub(crate) fn missing_value(key: &str) -> Self {
        Self(ErrorKind::MissingValue { key: key.to_string() })
    }

    pub(crate) const fn configuration(option: &'static str) -> Self {
        Self(ErrorKind::Configuration { option })
    }

    pub(crate) const fn disconnected() -> Self {
        Self(ErrorKind::Disconnected)
    }

    pub(crate) const fn connect(error: cachepool_backend::Error) -> Self {
        Self(ErrorKind::Connect(error))
    }

    pub(crate) const fn backend(error: cachepool_backend::Error) -> Self {
        Self(ErrorKind::Backend(error))
    }
}
