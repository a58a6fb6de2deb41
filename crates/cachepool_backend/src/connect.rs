// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{Result, StorageBackend};

/// Where and how to connect to a storage engine.
///
/// # Examples
///
/// ```
/// use cachepool_backend::ConnectionSettings;
///
/// let settings = ConnectionSettings::new("127.0.0.1", 3000).persistent(true);
/// assert_eq!(settings.host(), "127.0.0.1");
/// assert_eq!(settings.port(), 3000);
/// assert!(settings.is_persistent());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionSettings {
    host: String,
    port: u16,
    persistent: bool,
}

impl ConnectionSettings {
    /// Creates settings for a non-persistent connection to `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            persistent: false,
        }
    }

    /// Requests a connection that outlives a single request, if the engine supports it.
    #[must_use]
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// The host name or address of the engine.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port of the engine.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether a persistent connection was requested.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }
}

/// Creates a connected [`StorageBackend`] from [`ConnectionSettings`].
///
/// Implemented for any closure of the right shape, so most callers never name this trait.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-util")]
/// # fn main() {
/// use cachepool_backend::{ConnectionSettings, Connector, StorageBackend, testing::MockBackend};
///
/// let connector = |_: &ConnectionSettings| -> cachepool_backend::Result<MockBackend<String>> { Ok(MockBackend::new()) };
/// let backend = Connector::<String>::connect(&connector, &ConnectionSettings::new("localhost", 3000)).unwrap();
/// assert!(backend.is_connected());
/// # }
/// # #[cfg(not(feature = "test-util"))]
/// # fn main() {}
/// ```
pub trait Connector<V> {
    /// The backend produced by this connector.
    type Backend: StorageBackend<V>;

    /// Opens a connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be reached or rejects the connection.
    fn connect(&self, settings: &ConnectionSettings) -> Result<Self::Backend>;
}

impl<V, B, F> Connector<V> for F
where
    F: Fn(&ConnectionSettings) -> Result<B>,
    B: StorageBackend<V>,
{
    type Backend = B;

    fn connect(&self, settings: &ConnectionSettings) -> Result<B> {
        self(settings)
    }
}
