use std::time::Duration;

use crate::error::SectionEventError;
use crate::retry::RetryPolicy;
use crate::types::{DEFAULT_CONTENT_TYPE, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};

/// Environment override for [`PublisherConfig::max_retries`].
pub const ENV_MAX_RETRIES: &str = "SECTION_EVENT_MAX_RETRIES";
/// Environment override for [`PublisherConfig::retry_delay`], in milliseconds.
pub const ENV_RETRY_DELAY_MS: &str = "SECTION_EVENT_RETRY_DELAY_MS";

/// Configuration for a [`SectionPublisher`](crate::SectionPublisher).
///
/// All fields have sensible defaults. Use the builder pattern:
///
/// ```rust
/// use std::time::Duration;
/// use section_event::PublisherConfig;
///
/// let config = PublisherConfig::new()
///     .max_retries(2)
///     .retry_delay(Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    pub(crate) max_retries: u32,
    pub(crate) retry_delay: Duration,
    /// Value of the trailing `m` tag. `None` drops the tag.
    pub(crate) content_type: Option<String>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            content_type: Some(DEFAULT_CONTENT_TYPE.to_string()),
        }
    }
}

impl PublisherConfig {
    /// Defaults, with any well-formed environment overrides applied.
    ///
    /// Malformed values are ignored; use [`from_env`](Self::from_env) to
    /// reject them instead.
    pub fn new() -> Self {
        Self::from_lookup_lax(read_env)
    }

    /// Defaults plus environment overrides; malformed values are an error.
    pub fn from_env() -> Result<Self, SectionEventError> {
        Self::from_lookup(read_env)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SectionEventError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            config.max_retries = parse_retries(&raw)?;
        }
        if let Some(raw) = lookup(ENV_RETRY_DELAY_MS) {
            config.retry_delay = parse_delay(&raw)?;
        }
        Ok(config)
    }

    fn from_lookup_lax(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        match lookup(ENV_MAX_RETRIES).map(|raw| parse_retries(&raw)) {
            Some(Ok(retries)) => config.max_retries = retries,
            Some(Err(e)) => tracing::warn!("ignoring override: {e}"),
            None => {}
        }
        match lookup(ENV_RETRY_DELAY_MS).map(|raw| parse_delay(&raw)) {
            Some(Ok(delay)) => config.retry_delay = delay,
            Some(Err(e)) => tracing::warn!("ignoring override: {e}"),
            None => {}
        }
        config
    }

    /// Extra `get_id` polls after the first one (default: 5).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Wait between polls (default: 1 s).
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Content type for the trailing `m` tag (default: `text/asciidoc`).
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Publish without a content-type tag.
    pub fn without_content_type(mut self) -> Self {
        self.content_type = None;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }
}

fn parse_retries(raw: &str) -> Result<u32, SectionEventError> {
    raw.trim().parse().map_err(|_| {
        SectionEventError::Config(format!("{ENV_MAX_RETRIES}={raw:?} is not a count"))
    })
}

fn parse_delay(raw: &str) -> Result<Duration, SectionEventError> {
    let ms: u64 = raw.trim().parse().map_err(|_| {
        SectionEventError::Config(format!(
            "{ENV_RETRY_DELAY_MS}={raw:?} is not a number of milliseconds"
        ))
    })?;
    Ok(Duration::from_millis(ms))
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
