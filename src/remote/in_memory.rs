//! In-memory description source for tests and offline inspection.
//!
//! This module provides the InMemorySource implementation that serves canned
//! descriptions from a map, with per-object latency and failure injection for
//! exercising the engine's ordering and cancellation behaviour.

use crate::error::{ProbeError, Result};
use crate::remote::handle::RemoteHandle;
use crate::remote::source::{Description, RemoteSource};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Failure injected for a specific object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// The caller lacks access to the object
    PermissionDenied,
    /// The object does not exist remotely
    NotFound,
    /// Transport-level failure with an underlying io cause
    Transport,
}

/// Deterministic RemoteSource backed by a map of canned descriptions.
///
/// Lookups clone the stored description, so a source can be shared across any
/// number of concurrent jobs. A fetch counter records how many times the
/// engine actually hit the source, which pins down the one-fetch-per-dispatch
/// contract in tests.
#[derive(Debug, Default)]
pub struct InMemorySource {
    objects: HashMap<String, Description>,
    latencies: HashMap<String, Duration>,
    failures: HashMap<String, FailureMode>,
    fetches: AtomicU64,
}

impl InMemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from an id → description map
    pub fn from_objects(objects: impl IntoIterator<Item = (String, Description)>) -> Self {
        Self {
            objects: objects.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Add a description under `id`
    pub fn insert(mut self, id: impl Into<String>, description: Description) -> Self {
        self.objects.insert(id.into(), description);
        self
    }

    /// Delay every fetch of `id` by `latency`
    pub fn with_latency(mut self, id: impl Into<String>, latency: Duration) -> Self {
        self.latencies.insert(id.into(), latency);
        self
    }

    /// Make every fetch of `id` fail with `mode`
    pub fn with_failure(mut self, id: impl Into<String>, mode: FailureMode) -> Self {
        self.failures.insert(id.into(), mode);
        self
    }

    /// Number of fetches served so far, including failed ones
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Ids of all stored objects, unordered
    pub fn object_ids(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }
}

#[async_trait]
impl RemoteSource for InMemorySource {
    async fn fetch_description(&self, handle: &RemoteHandle) -> Result<Description> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        if let Some(delay) = self.latencies.get(handle.id()) {
            tokio::time::sleep(*delay).await;
        }

        match self.failures.get(handle.id()) {
            Some(FailureMode::PermissionDenied) => {
                return Err(ProbeError::permission_denied(handle.id()));
            }
            Some(FailureMode::NotFound) => {
                return Err(ProbeError::not_found(handle.id()));
            }
            Some(FailureMode::Transport) => {
                return Err(ProbeError::fetch_with(
                    format!("description request for {} failed", handle.id()),
                    std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        "connection reset by peer",
                    ),
                ));
            }
            None => {}
        }

        self.objects
            .get(handle.id())
            .cloned()
            .ok_or_else(|| ProbeError::not_found(handle.id()))
    }
}
