//! Publish counters for section events.
//!
//! [`PublishStats`] is shared by a publisher across calls; every field is a
//! relaxed atomic [`Counter`], so it can be read from any task while
//! publishes are in flight. [`PublishStats::snapshot`] freezes the values
//! into a plain serializable struct.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// A monotonically increasing counter.
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Counter").field(&self.get()).finish()
    }
}

/// Live counters for one publisher.
#[derive(Debug, Default)]
pub struct PublishStats {
    /// `create_section` calls started.
    pub sections_requested: Counter,
    /// Individual `get_id` polls, first attempt included.
    pub id_polls: Counter,
    /// Sections that resolved to an event id.
    pub published: Counter,
    /// Retry budget exhausted with an empty id.
    pub not_created: Counter,
    /// Client-side failures (sign/broadcast or id fetch).
    pub upstream_failures: Counter,
    /// Waits interrupted by a cancellation token.
    pub cancelled: Counter,
}

/// Point-in-time copy of [`PublishStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishStatsSnapshot {
    pub sections_requested: u64,
    pub id_polls: u64,
    pub published: u64,
    pub not_created: u64,
    pub upstream_failures: u64,
    pub cancelled: u64,
}

impl PublishStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PublishStatsSnapshot {
        PublishStatsSnapshot {
            sections_requested: self.sections_requested.get(),
            id_polls: self.id_polls.get(),
            published: self.published.get(),
            not_created: self.not_created.get(),
            upstream_failures: self.upstream_failures.get(),
            cancelled: self.cancelled.get(),
        }
    }
}

impl PublishStatsSnapshot {
    /// Calls that ended without an id, whatever the reason.
    pub fn failed(&self) -> u64 {
        self.not_created + self.upstream_failures + self.cancelled
    }
}
