/// Errors surfaced by section building and publishing.
///
/// `NotCreated` is the user-facing validation failure; the other publish
/// variants (`Upstream`, `Cancelled`) are never retried by the publisher.
#[derive(Debug, thiserror::Error)]
pub enum SectionEventError {
    #[error("the section event was not created")]
    NotCreated { attempts: u32 },

    #[error("upstream publish failed: {reason}")]
    Upstream { reason: String },

    #[error("section publish cancelled")]
    Cancelled,

    #[error("invalid tag: {reason}")]
    InvalidTag { reason: String },

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SectionEventError {
    /// True for the retry-budget-exhausted failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, SectionEventError::NotCreated { .. })
    }
}

impl From<serde_json::Error> for SectionEventError {
    fn from(e: serde_json::Error) -> Self {
        SectionEventError::Serialization(e.to_string())
    }
}
