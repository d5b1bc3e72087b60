use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Event kind for a long-form content section (parameterized replaceable).
pub const SECTION_EVENT_KIND: u16 = 30041;

/// Markup carried by section content unless configured otherwise.
pub const DEFAULT_CONTENT_TYPE: &str = "text/asciidoc";

/// Additional `get_id` polls after the first one.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Wait between two `get_id` polls.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Identifier assigned to a signed event once the client confirms it.
///
/// Opaque to this crate; never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Wrap a raw id, treating the empty string as "not yet available".
    pub fn from_raw(raw: String) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
