use crate::builder::EventToPublish;
use crate::error::SectionEventError;
use crate::tag::Tag;

/// Signing and broadcast, supplied by the protocol client.
///
/// In production: implemented over a real client (keys + relay pool).
/// In tests: a scripted mock.
#[async_trait::async_trait]
pub trait SignAndBroadcast: Send + Sync {
    type Handle: PublishedEvent;

    /// Sign `event` and hand it to the relays.
    async fn sign_and_broadcast(&self, event: EventToPublish) -> Result<Self::Handle, String>;
}

/// A broadcast event whose id may not be known yet.
#[async_trait::async_trait]
pub trait PublishedEvent: Send + Sync {
    /// The confirmed id, or an empty string while it is still pending.
    async fn get_id(&self) -> Result<String, String>;
}

/// Builds the kind 30041 record and forwards it to the client.
pub struct PublisherAdapter<C> {
    client: C,
}

impl<C: SignAndBroadcast> PublisherAdapter<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Publish `content` with `tags`. Client failures become `Upstream`.
    pub async fn publish(
        &self,
        content: String,
        tags: Vec<Tag>,
    ) -> Result<C::Handle, SectionEventError> {
        self.publish_event(EventToPublish::section(content, tags)).await
    }

    pub(crate) async fn publish_event(
        &self,
        event: EventToPublish,
    ) -> Result<C::Handle, SectionEventError> {
        self.client
            .sign_and_broadcast(event)
            .await
            .map_err(|reason| SectionEventError::Upstream { reason })
    }
}

// ── Mock client (tests) ─────────────────────────────────────────────
