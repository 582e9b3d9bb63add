//! Remote description access seam.

use crate::error::Result;
use crate::remote::handle::RemoteHandle;
use async_trait::async_trait;

/// Structured snapshot of a remote object, as returned by the service.
///
/// Descriptions are arbitrarily nested JSON. They are produced once per fetch
/// and never mutated afterwards; renderers only borrow them.
pub type Description = serde_json::Value;

/// Core trait for fetching remote object descriptions.
///
/// This trait abstracts the remote service so the engine can run against a
/// real network client, a caching layer, or the in-memory fixture source with
/// the same dispatch code. Implementations may block for network round trips
/// and may fail with transport or permission errors. Fetching is idempotent
/// barring remote-side changes; the engine performs at most one fetch per
/// dispatched job.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the full description of the object behind `handle`
    async fn fetch_description(&self, handle: &RemoteHandle) -> Result<Description>;
}
