// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for [`CacheAdapter`].

use cachepool_backend::{Connector, StorageBackend};
use tick::Clock;

use crate::telemetry::{CacheActivity, CacheOperation, CacheTelemetry};
use crate::{AdapterConfig, CacheAdapter, Error, KeyTransformer, NamespacedKeys, Result};

/// Builds a [`CacheAdapter`] from a configuration and a backend.
///
/// The adapter never opens or retries connections itself. Either hand it a backend that
/// is already connected with [`build`](Self::build), or let a [`Connector`] open one from
/// the configured endpoint with [`connect`](Self::connect).
///
/// # Examples
///
/// ```
/// use cachepool::{AdapterBuilder, AdapterConfig, CacheAdapter};
/// use cachepool_backend::{BackendAddress, ConnectionSettings};
/// use cachepool_backend::testing::MockBackend;
/// use tick::Clock;
///
/// let config = AdapterConfig::builder()
///     .host("localhost")
///     .port(3000)
///     .namespace("app")
///     .collection("users")
///     .build()?;
///
/// let connector = |settings: &ConnectionSettings| -> cachepool_backend::Result<MockBackend<String>> {
///     assert_eq!(settings.port(), 3000);
///     Ok(MockBackend::new())
/// };
///
/// let cache: CacheAdapter<String, _, _> = AdapterBuilder::new(config, Clock::new_frozen())
///     .key_transformer(|key: &str| BackendAddress::new("app", "users", key.to_lowercase()))
///     .connect(&connector)?;
/// assert_eq!(cache.pending_len(), 0);
/// # Ok::<(), cachepool::Error>(())
/// ```
#[derive(Debug)]
pub struct AdapterBuilder<T = NamespacedKeys> {
    config: AdapterConfig,
    clock: Clock,
    keys: T,
}

impl AdapterBuilder {
    /// Creates a builder that places keys in the configured namespace and collection.
    #[must_use]
    pub fn new(config: AdapterConfig, clock: Clock) -> Self {
        Self {
            keys: NamespacedKeys::from_config(&config),
            config,
            clock,
        }
    }
}

impl<T> AdapterBuilder<T>
where
    T: KeyTransformer,
{
    /// Replaces the key transformer.
    ///
    /// The transformer must map distinct keys to distinct addresses.
    #[must_use]
    pub fn key_transformer<U: KeyTransformer>(self, keys: U) -> AdapterBuilder<U> {
        AdapterBuilder {
            config: self.config,
            clock: self.clock,
            keys,
        }
    }

    /// Builds the adapter over an already connected backend.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Disconnected`](crate::ErrorKind::Disconnected) if the backend
    /// does not report itself connected.
    pub fn build<V, B>(self, backend: B) -> Result<CacheAdapter<V, B, T>>
    where
        B: StorageBackend<V>,
    {
        let telemetry = CacheTelemetry::new(self.config.namespace(), self.clock);
        if !backend.is_connected() {
            telemetry.record(CacheOperation::Connect, CacheActivity::Disconnected, None, None);
            return Err(Error::disconnected());
        }

        telemetry.record(CacheOperation::Connect, CacheActivity::Ok, None, None);
        Ok(CacheAdapter::new(self.config, backend, self.keys, telemetry))
    }

    /// Opens a backend with `connector` and builds the adapter over it.
    ///
    /// The connector receives the host, port and persistence flag of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Connect`](crate::ErrorKind::Connect) carrying the connector's
    /// error, or [`ErrorKind::Disconnected`](crate::ErrorKind::Disconnected) if the opened
    /// backend is not connected.
    pub fn connect<V, C>(self, connector: &C) -> Result<CacheAdapter<V, C::Backend, T>>
    where
        C: Connector<V>,
    {
        match connector.connect(&self.config.connection_settings()) {
            Ok(backend) => self.build(backend),
            Err(error) => {
                tracing::error!(
                    cache.namespace = self.config.namespace(),
                    cache.operation = CacheOperation::Connect.as_str(),
                    cache.activity = CacheActivity::Disconnected.as_str(),
                    error = %error,
                    "cache.event"
                );
                Err(Error::connect(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cachepool_backend::ConnectionSettings;
    use cachepool_backend::testing::MockBackend;

    use super::*;
    use crate::ErrorKind;
    use crate::telemetry::testing::LogCapture;

    fn config() -> AdapterConfig {
        AdapterConfig::builder()
            .host("db.internal")
            .port(3000)
            .namespace("ns")
            .collection("set")
            .persistent(true)
            .build()
            .expect("config should build")
    }

    #[test]
    fn build_rejects_disconnected_backend() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        let backend = MockBackend::<String>::new();
        backend.set_connected(false);

        let error = AdapterBuilder::new(config(), Clock::new_frozen())
            .build(backend)
            .expect_err("disconnected backend should be rejected");
        assert!(matches!(error.kind(), ErrorKind::Disconnected));
        capture.assert_contains("ERROR");
        capture.assert_contains(CacheActivity::Disconnected.as_str());
    }

    #[test]
    fn connect_passes_configured_endpoint() {
        let connector = |settings: &ConnectionSettings| -> cachepool_backend::Result<MockBackend<String>> {
            assert_eq!(settings.host(), "db.internal");
            assert_eq!(settings.port(), 3000);
            assert!(settings.is_persistent());
            Ok(MockBackend::new())
        };

        let adapter: CacheAdapter<String, _> = AdapterBuilder::new(config(), Clock::new_frozen())
            .connect(&connector)
            .expect("connector should succeed");
        assert_eq!(adapter.config().namespace(), "ns");
    }

    #[test]
    fn connect_wraps_connector_error() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        let connector = |_: &ConnectionSettings| -> cachepool_backend::Result<MockBackend<String>> {
            Err(cachepool_backend::Error::from_message("connection refused"))
        };

        let error = AdapterBuilder::new(config(), Clock::new_frozen())
            .connect::<String, _>(&connector)
            .expect_err("connector error should surface");
        assert!(error.is_connection());
        assert!(matches!(error.kind(), ErrorKind::Connect(_)));
        capture.assert_contains("connection refused");
    }
}
