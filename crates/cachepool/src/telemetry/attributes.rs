// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Field names of emitted cache events.
//!
//! These must match the field names used in `CacheTelemetry::emit`; the
//! `emitted_fields_match_attribute_names` test keeps them in sync.

#[cfg(test)]
pub(crate) const CACHE_EVENT_NAME: &str = "cache.event";

#[cfg(test)]
pub(crate) const CACHE_NAMESPACE_NAME: &str = "cache.namespace";

#[cfg(test)]
pub(crate) const CACHE_OPERATION_NAME: &str = "cache.operation";

#[cfg(test)]
pub(crate) const CACHE_ACTIVITY_NAME: &str = "cache.activity";

#[cfg(test)]
pub(crate) const CACHE_KEY_NAME: &str = "cache.key";

#[cfg(test)]
pub(crate) const CACHE_COUNT_NAME: &str = "cache.count";

#[cfg(test)]
pub(crate) const CACHE_DURATION_NAME: &str = "cache.duration_ns";
