//! Bounded acquisition of a published event's id.
//!
//! Polls [`PublishedEvent::get_id`] once, then up to `max_retries` more
//! times with `delay` between polls. The first non-empty id wins. A
//! client-side failure ends the loop at once and never consumes budget.

use std::time::Duration;

use section_metrics::PublishStats;
use tokio_util::sync::CancellationToken;

use crate::error::SectionEventError;
use crate::publisher::PublishedEvent;
use crate::types::{EventId, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};

/// How many extra polls to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Polls after the first one. Zero means a single attempt.
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Total number of polls this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Resolves an event id under a [`RetryPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryController {
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Poll until a non-empty id shows up or the budget runs out.
    pub async fn acquire<H: PublishedEvent + ?Sized>(
        &self,
        handle: &H,
    ) -> Result<EventId, SectionEventError> {
        self.run(handle, &CancellationToken::new(), None).await
    }

    /// Like [`acquire`](Self::acquire), but any wait is cut short by `cancel`.
    pub async fn acquire_with_cancel<H: PublishedEvent + ?Sized>(
        &self,
        handle: &H,
        cancel: &CancellationToken,
    ) -> Result<EventId, SectionEventError> {
        self.run(handle, cancel, None).await
    }

    pub(crate) async fn run<H: PublishedEvent + ?Sized>(
        &self,
        handle: &H,
        cancel: &CancellationToken,
        stats: Option<&PublishStats>,
    ) -> Result<EventId, SectionEventError> {
        let attempts = self.policy.max_attempts();

        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::debug!(attempt, "id acquisition cancelled");
                        return Err(SectionEventError::Cancelled);
                    }
                    _ = tokio::time::sleep(self.policy.delay) => {}
                }
            }

            if let Some(stats) = stats {
                stats.id_polls.inc();
            }
            let raw = handle.get_id().await.map_err(|reason| {
                tracing::warn!(attempt, %reason, "event id fetch failed");
                SectionEventError::Upstream { reason }
            })?;

            if let Some(id) = EventId::from_raw(raw) {
                tracing::debug!(attempt, %id, "event id acquired");
                return Ok(id);
            }
            tracing::debug!(attempt, attempts, "event id not yet available");
        }

        tracing::warn!(attempts, "event id still empty after retry budget");
        Err(SectionEventError::NotCreated { attempts })
    }
}
