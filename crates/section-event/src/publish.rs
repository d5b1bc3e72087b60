//! Section publishing entry point.
//!
//! [`SectionPublisher::create_section`] builds the kind 30041 record,
//! hands it to the client, resolves the event id under the retry policy
//! and logs `Published 30041 event with ID <id>` on success.

use std::sync::Arc;

use section_metrics::{PublishStats, PublishStatsSnapshot};
use tokio_util::sync::CancellationToken;

use crate::builder::RecordBuilder;
use crate::config::PublisherConfig;
use crate::error::SectionEventError;
use crate::log::{EventLog, TracingLog};
use crate::publisher::{PublisherAdapter, SignAndBroadcast};
use crate::retry::RetryController;
use crate::section::Section;
use crate::types::{EventId, SECTION_EVENT_KIND};

/// Line logged after a section event is confirmed.
pub fn published_line(id: &EventId) -> String {
    format!("Published {SECTION_EVENT_KIND} event with ID {id}")
}

/// Publishes sections through a protocol client.
///
/// Holds no per-call state; one publisher can serve concurrent calls.
pub struct SectionPublisher<C, L = TracingLog> {
    adapter: PublisherAdapter<C>,
    builder: RecordBuilder,
    retry: RetryController,
    log: L,
    stats: Arc<PublishStats>,
}

impl<C: SignAndBroadcast> SectionPublisher<C, TracingLog> {
    pub fn new(client: C, config: PublisherConfig) -> Self {
        Self::with_log(client, config, TracingLog)
    }
}

impl<C: SignAndBroadcast, L: EventLog> SectionPublisher<C, L> {
    pub fn with_log(client: C, config: PublisherConfig, log: L) -> Self {
        Self::from_parts(
            PublisherAdapter::new(client),
            RecordBuilder::new(config.content_type.clone()),
            RetryController::new(config.retry_policy()),
            log,
        )
    }

    /// Assemble a publisher from individually constructed components.
    pub fn from_parts(
        adapter: PublisherAdapter<C>,
        builder: RecordBuilder,
        retry: RetryController,
        log: L,
    ) -> Self {
        Self {
            adapter,
            builder,
            retry,
            log,
            stats: Arc::new(PublishStats::new()),
        }
    }

    pub fn client(&self) -> &C {
        self.adapter.client()
    }

    pub fn builder(&self) -> &RecordBuilder {
        &self.builder
    }

    pub fn retry(&self) -> &RetryController {
        &self.retry
    }

    pub fn stats(&self) -> PublishStatsSnapshot {
        self.stats.snapshot()
    }

    /// Live counters, shareable with a metrics reporter.
    pub fn shared_stats(&self) -> Arc<PublishStats> {
        Arc::clone(&self.stats)
    }

    /// Publish `section` and return its confirmed event id.
    pub async fn create_section(&self, section: &Section) -> Result<EventId, SectionEventError> {
        self.create_section_with_cancel(section, &CancellationToken::new()).await
    }

    /// Like [`create_section`](Self::create_section); `cancel` interrupts
    /// the wait between id polls.
    #[tracing::instrument(name = "create_section", skip_all, fields(d_tag = %section.d_tag))]
    pub async fn create_section_with_cancel(
        &self,
        section: &Section,
        cancel: &CancellationToken,
    ) -> Result<EventId, SectionEventError> {
        self.stats.sections_requested.inc();

        let event = self.builder.build(section);
        tracing::debug!(tags = event.tags().len(), "section event built");

        let handle = match self.adapter.publish_event(event).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("sign and broadcast failed: {e}");
                self.stats.upstream_failures.inc();
                return Err(e);
            }
        };

        match self.retry.run(&handle, cancel, Some(&self.stats)).await {
            Ok(id) => {
                self.stats.published.inc();
                self.log_section_event(&id);
                Ok(id)
            }
            Err(e) => {
                match &e {
                    SectionEventError::NotCreated { .. } => self.stats.not_created.inc(),
                    SectionEventError::Cancelled => self.stats.cancelled.inc(),
                    _ => self.stats.upstream_failures.inc(),
                }
                Err(e)
            }
        }
    }

    fn log_section_event(&self, id: &EventId) {
        self.log.log(&published_line(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::mock::CapturingLog;
    use crate::publisher::mock::{MockClient, ScriptedHandle};
    use crate::tag::Tag;
    use std::time::Duration;

    type TestPublisher = SectionPublisher<MockClient, CapturingLog>;

    fn publisher(handle: ScriptedHandle) -> (TestPublisher, CapturingLog) {
        let log = CapturingLog::new();
        let config = PublisherConfig::default()
            .max_retries(1)
            .retry_delay(Duration::from_millis(1));
        let publisher = SectionPublisher::with_log(MockClient::new(handle), config, log.clone());
        (publisher, log)
    }

    fn sample() -> Section {
        Section::new()
            .with_d_tag("test-d-tag")
            .with_title("Test Title")
            .with_author("Test Author")
            .with_version("1.0")
            .with_content("Test Content")
    }

    #[test]
    fn test_published_line_format() {
        let id = EventId::from_raw("mock-event-id".into()).unwrap();
        assert_eq!(published_line(&id), "Published 30041 event with ID mock-event-id");
    }

    #[tokio::test]
    async fn test_create_section_success() {
        let (publisher, log) = publisher(ScriptedHandle::always("mock-event-id"));

        let id = publisher.create_section(&sample()).await.unwrap();
        assert_eq!(id.as_str(), "mock-event-id");

        let published = publisher.client().published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].kind(), 30041);
        assert_eq!(published[0].content(), "Test Content");
        assert_eq!(published[0].tags()[0], ["d", "test-d-tag"]);
        assert_eq!(published[0].tags()[3], ["version", "1.0"]);

        assert_eq!(log.lines(), vec!["Published 30041 event with ID mock-event-id"]);

        let stats = publisher.stats();
        assert_eq!(stats.sections_requested, 1);
        assert_eq!(stats.published, 1);
        assert_eq!(stats.id_polls, 1);
    }

    #[tokio::test]
    async fn test_create_section_after_retry() {
        let (publisher, log) = publisher(ScriptedHandle::ids(&["", "mock-event-id"]));

        let id = publisher.create_section(&sample()).await.unwrap();
        assert_eq!(id.as_str(), "mock-event-id");
        assert_eq!(publisher.client().handle().calls(), 2);
        assert_eq!(log.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_create_section_not_created() {
        let (publisher, log) = publisher(ScriptedHandle::always(""));

        let err = publisher.create_section(&sample()).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "the section event was not created");
        assert!(log.lines().is_empty());
        assert_eq!(publisher.stats().not_created, 1);
        // Exactly one record per call, even when the id never shows up.
        assert_eq!(publisher.client().published().len(), 1);
    }

    #[tokio::test]
    async fn test_create_section_upstream_failure() {
        let (publisher, log) = publisher(ScriptedHandle::always("unused"));
        publisher.client().set_fail_publish("signer offline");

        let err = publisher.create_section(&sample()).await.unwrap_err();
        assert!(matches!(err, SectionEventError::Upstream { .. }));
        assert_eq!(publisher.client().handle().calls(), 0);
        assert!(log.lines().is_empty());
        assert_eq!(publisher.stats().upstream_failures, 1);
    }

    #[tokio::test]
    async fn test_id_fetch_failure_counts_as_upstream() {
        let (publisher, _log) = publisher(ScriptedHandle::new(vec![Err("timeout".into())]));

        let err = publisher.create_section(&sample()).await.unwrap_err();
        assert!(matches!(err, SectionEventError::Upstream { .. }));
        assert_eq!(publisher.stats().upstream_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_section_cancelled() {
        let log = CapturingLog::new();
        let config = PublisherConfig::default()
            .max_retries(5)
            .retry_delay(Duration::from_secs(30));
        let client = MockClient::new(ScriptedHandle::always(""));
        let publisher = SectionPublisher::with_log(client, config, log.clone());

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let err = publisher
            .create_section_with_cancel(&sample(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, SectionEventError::Cancelled));
        assert_eq!(publisher.stats().cancelled, 1);
        assert!(log.lines().is_empty());
    }

    #[tokio::test]
    async fn test_optional_tags_reach_the_client() {
        let (publisher, _log) = publisher(ScriptedHandle::always("id"));
        let section = sample().with_tag(Tag::new("t", "history"));

        publisher.create_section(&section).await.unwrap();
        let tags = publisher.client().published()[0].tags().to_vec();
        assert_eq!(tags[4], ["t", "history"]);
        assert_eq!(tags[5], ["m", "text/asciidoc"]);
    }

    #[tokio::test]
    async fn test_from_parts_wires_custom_components() {
        use crate::retry::RetryPolicy;

        let log = CapturingLog::new();
        let publisher = SectionPublisher::from_parts(
            PublisherAdapter::new(MockClient::new(ScriptedHandle::ids(&["", "", "z"]))),
            RecordBuilder::new(None),
            RetryController::new(RetryPolicy::new(2, Duration::from_millis(1))),
            log.clone(),
        );

        let id = publisher.create_section(&Section::new()).await.unwrap();
        assert_eq!(id.as_str(), "z");
        assert_eq!(publisher.client().published()[0].tags().len(), 4);
        assert_eq!(publisher.retry().policy().max_retries, 2);
    }
}
