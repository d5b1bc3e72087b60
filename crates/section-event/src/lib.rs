//! Kind 30041 section events.
//!
//! Builds the tagged record for one section of a long-form publication,
//! hands it to an external protocol client for signing and broadcast, and
//! polls for the confirmed event id under a bounded retry policy.
//!
//! The client is reached through two traits: [`SignAndBroadcast`] and
//! [`PublishedEvent`]. Nothing here signs, encodes or talks to relays.
//!
//! ```rust,ignore
//! use section_event::{PublisherConfig, Section, SectionPublisher};
//!
//! let publisher = SectionPublisher::new(client, PublisherConfig::new());
//! let section = Section::from_json(r#"{"dTag":"ch-1","title":"Chapter 1"}"#)?;
//! let id = publisher.create_section(&section).await?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod log;
pub mod publish;
pub mod publisher;
pub mod retry;
pub mod section;
pub mod tag;
pub mod types;

pub use builder::{EventToPublish, RecordBuilder};
pub use config::PublisherConfig;
pub use error::SectionEventError;
pub use log::{EventLog, TracingLog};
pub use publish::{published_line, SectionPublisher};
pub use publisher::{PublishedEvent, PublisherAdapter, SignAndBroadcast};
pub use retry::{RetryController, RetryPolicy};
pub use section::Section;
pub use section_metrics::{PublishStats, PublishStatsSnapshot};
pub use tag::Tag;
pub use tokio_util::sync::CancellationToken;
pub use types::{EventId, DEFAULT_CONTENT_TYPE, SECTION_EVENT_KIND};
