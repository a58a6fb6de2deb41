// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured logging of adapter operations.
//!
//! Every adapter operation emits one `cache.event` through [`tracing`]. The level follows
//! the outcome: reads and no-ops log at `DEBUG`, state changes at `INFO`, backend
//! failures the adapter degraded to a miss or `false` at `WARN`, and construction
//! failures at `ERROR`.

use std::time::Duration;

use tick::Clock;

pub(crate) mod attributes;
pub(crate) mod ext;
#[cfg(test)]
pub(crate) mod testing;

/// Log level of an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheOperation {
    Connect,
    Get,
    GetMany,
    Save,
    SaveDeferred,
    Commit,
    Delete,
    Clear,
}

impl CacheOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "cache.connect",
            Self::Get => "cache.get",
            Self::GetMany => "cache.get_many",
            Self::Save => "cache.save",
            Self::SaveDeferred => "cache.save_deferred",
            Self::Commit => "cache.commit",
            Self::Delete => "cache.delete",
            Self::Clear => "cache.clear",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheActivity {
    Hit,
    Miss,
    Ok,
    Deferred,
    Inserted,
    Committed,
    Invalidated,
    Cleared,
    Failed,
    Disconnected,
}

impl CacheActivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "cache.hit",
            Self::Miss => "cache.miss",
            Self::Ok => "cache.ok",
            Self::Deferred => "cache.deferred",
            Self::Inserted => "cache.inserted",
            Self::Committed => "cache.committed",
            Self::Invalidated => "cache.invalidated",
            Self::Cleared => "cache.cleared",
            Self::Failed => "cache.failed",
            Self::Disconnected => "cache.disconnected",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::Hit | Self::Miss | Self::Ok | Self::Deferred => Severity::Debug,
            Self::Inserted | Self::Committed | Self::Invalidated | Self::Cleared => Severity::Info,
            Self::Failed => Severity::Warn,
            Self::Disconnected => Severity::Error,
        }
    }
}

/// Emits cache events for one adapter and times backend calls.
#[derive(Clone, Debug)]
pub(crate) struct CacheTelemetry {
    namespace: String,
    clock: Clock,
}

impl CacheTelemetry {
    pub fn new(namespace: impl Into<String>, clock: Clock) -> Self {
        Self {
            namespace: namespace.into(),
            clock,
        }
    }

    #[inline]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Records an operation on a single key.
    #[inline]
    pub fn record(&self, operation: CacheOperation, activity: CacheActivity, key: Option<&str>, duration: Option<Duration>) {
        Self::emit(&self.namespace, operation, activity, key, None, duration);
    }

    /// Records an operation that touched `count` keys.
    #[inline]
    pub fn record_batch(&self, operation: CacheOperation, activity: CacheActivity, count: usize, duration: Option<Duration>) {
        Self::emit(&self.namespace, operation, activity, None, Some(count as u64), duration);
    }

    fn emit(
        namespace: &str,
        operation: CacheOperation,
        activity: CacheActivity,
        key: Option<&str>,
        count: Option<u64>,
        duration: Option<Duration>,
    ) {
        let op = operation.as_str();
        let act = activity.as_str();
        let duration_ns = duration.map(|d| d.as_nanos());

        // Tracing level must be constant, so a macro selects it.
        // Field names must match constants in attributes.rs.
        macro_rules! emit_event {
            ($level:ident) => {
                tracing::$level!(
                    cache.namespace = namespace,
                    cache.operation = op,
                    cache.activity = act,
                    cache.key = key,
                    cache.count = count,
                    cache.duration_ns = ?duration_ns,
                    "cache.event"
                )
            };
        }

        match activity.severity() {
            Severity::Error => emit_event!(error),
            Severity::Warn => emit_event!(warn),
            Severity::Info => emit_event!(info),
            Severity::Debug => emit_event!(debug),
        }
    }
}
