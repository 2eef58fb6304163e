//! Single-slot context cache with a validity window.
//!
//! Holds the last successfully assembled context blob and its fetch time.
//! Reads inside the window return the cached blob without touching the
//! network; stale reads trigger a refresh through the source. The cache is
//! opportunistic, not strict: a failed refresh keeps serving the stale
//! payload, and only a cache that has never been filled falls back to the
//! unavailability sentinel.

use std::time::{Duration, Instant};

use anigate_core::source::ContextSource;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Returned when no fetch has ever succeeded and a refresh just failed.
pub const UNAVAILABLE_SENTINEL: &str = "[System Note: GitHub data unavailable.]";

#[derive(Default)]
struct Slot {
    payload: Option<String>,
    fetched_at: Option<Instant>,
}

/// A process-lifetime cache for one context blob.
///
/// The slot is overwritten wholesale on every successful refresh, so a
/// reader never observes a partially written payload/timestamp pair. Two
/// concurrent stale reads may both refresh; last writer wins.
pub struct ContextCache {
    slot: RwLock<Slot>,
    ttl: Duration,
}

impl ContextCache {
    /// Create an empty cache with the given validity window.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(Slot::default()),
            ttl,
        }
    }

    /// Return the context blob, refreshing through `source` if stale.
    ///
    /// Always returns displayable text; refresh failures degrade to the
    /// stale payload or the unavailability sentinel.
    pub async fn get(&self, source: &dyn ContextSource) -> String {
        {
            let slot = self.slot.read().await;
            if let (Some(payload), Some(fetched_at)) = (&slot.payload, slot.fetched_at)
                && fetched_at.elapsed() < self.ttl
            {
                debug!(source = source.name(), "using cached context data");
                return payload.clone();
            }
        }

        match source.refresh().await {
            Ok(blob) => {
                let mut slot = self.slot.write().await;
                slot.payload = Some(blob.clone());
                slot.fetched_at = Some(Instant::now());
                blob
            }
            Err(e) => {
                warn!(
                    source = source.name(),
                    error = %e,
                    "context refresh failed, serving last known data"
                );
                let slot = self.slot.read().await;
                slot.payload
                    .clone()
                    .unwrap_or_else(|| UNAVAILABLE_SENTINEL.to_string())
            }
        }
    }
}
