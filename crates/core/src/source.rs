//! ContextSource trait — the abstraction over the external profile source.

use async_trait::async_trait;

use crate::error::FetchError;

/// A source of external profile context.
///
/// `refresh()` performs the (possibly multi-read) fetch and assembles a
/// complete, human/model-readable context blob. Partial per-read failures
/// are degraded inside the implementation; an `Err` here means the source
/// was not reachable at all, and the cache layer decides what to serve.
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// A human-readable name for this source (e.g., "github").
    fn name(&self) -> &str;

    /// Fetch fresh data and assemble the context blob.
    async fn refresh(&self) -> std::result::Result<String, FetchError>;
}
