// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Adapter configuration.
//!
//! Loading configuration is left to the application. [`AdapterConfigBuilder`] accepts the
//! options programmatically, or, with the `serde` feature, deserializes them from any
//! format using the option names below, and validates that the required ones are present.
//!
//! | Option | Required | Meaning |
//! |---|---|---|
//! | `host` | yes | Host of the storage engine |
//! | `port` | yes | Port of the storage engine |
//! | `namespace` | yes | Namespace all keys are stored under |
//! | `collectionName` | yes | Collection (set) inside the namespace |
//! | `defaultTtlSeconds` | no | TTL applied when a write passes none; `0` means none |
//! | `persistentConnection` | no | Ask the engine for a persistent connection |

use std::time::Duration;

use cachepool_backend::ConnectionSettings;

use crate::{Error, Result};

/// Validated configuration of a [`CacheAdapter`](crate::CacheAdapter).
///
/// # Examples
///
/// ```
/// use cachepool::AdapterConfig;
/// use std::time::Duration;
///
/// let config = AdapterConfig::builder()
///     .host("127.0.0.1")
///     .port(3000)
///     .namespace("cache")
///     .collection("sessions")
///     .default_ttl(Duration::from_secs(600))
///     .build()?;
///
/// assert_eq!(config.default_ttl(), Some(Duration::from_secs(600)));
/// assert!(!config.is_persistent());
/// # Ok::<(), cachepool::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterConfig {
    host: String,
    port: u16,
    namespace: String,
    collection: String,
    default_ttl: Option<Duration>,
    persistent: bool,
}

impl AdapterConfig {
    /// Creates an empty builder.
    #[must_use]
    pub fn builder() -> AdapterConfigBuilder {
        AdapterConfigBuilder::default()
    }

    /// Host of the storage engine.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port of the storage engine.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Namespace all keys are stored under.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Collection inside the namespace.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// TTL applied to writes that pass none; `None` leaves it to the engine.
    #[must_use]
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    /// Whether a persistent connection is requested.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// The settings a [`Connector`](cachepool_backend::Connector) needs to open a backend.
    #[must_use]
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings::new(self.host.as_str(), self.port).persistent(self.persistent)
    }
}

/// Builder for [`AdapterConfig`].
///
/// With the `serde` feature enabled, the builder can be deserialized directly:
///
/// ```
/// # #[cfg(feature = "serde")]
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use cachepool::config::AdapterConfigBuilder;
/// use std::time::Duration;
///
/// let builder: AdapterConfigBuilder = serde_json::from_str(r#"{
///     "host": "127.0.0.1",
///     "port": 3000,
///     "namespace": "cache",
///     "collectionName": "sessions",
///     "defaultTtlSeconds": 600
/// }"#)?;
/// let config = builder.build()?;
/// assert_eq!(config.collection(), "sessions");
/// assert_eq!(config.default_ttl(), Some(Duration::from_secs(600)));
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "serde"))]
/// # fn main() {}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default, rename_all = "camelCase"))]
pub struct AdapterConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    namespace: Option<String>,
    collection_name: Option<String>,
    default_ttl_seconds: Option<u64>,
    persistent_connection: bool,
}

impl AdapterConfigBuilder {
    /// Sets the host of the storage engine.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the port of the storage engine.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the namespace all keys are stored under.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the collection inside the namespace.
    #[must_use]
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection_name = Some(collection.into());
        self
    }

    /// Sets the default TTL, truncated to whole seconds. A zero TTL means no default.
    #[must_use]
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl_seconds = Some(ttl.as_secs());
        self
    }

    /// Requests a persistent connection.
    #[must_use]
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent_connection = persistent;
        self
    }

    /// Validates the options and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`](crate::ErrorKind::Configuration) naming the first
    /// required option that is missing or empty, checked in the order `host`, `port`,
    /// `namespace`, `collectionName`.
    pub fn build(self) -> Result<AdapterConfig> {
        let host = required(self.host, "host")?;
        let port = self.port.ok_or(Error::configuration("port"))?;
        let namespace = required(self.namespace, "namespace")?;
        let collection = required(self.collection_name, "collectionName")?;

        Ok(AdapterConfig {
            host,
            port,
            namespace,
            collection,
            default_ttl: self.default_ttl_seconds.filter(|secs| *secs > 0).map(Duration::from_secs),
            persistent: self.persistent_connection,
        })
    }
}

fn required(value: Option<String>, option: &'static str) -> Result<String> {
    value.filter(|v| !v.is_empty()).ok_or(Error::configuration(option))
}
