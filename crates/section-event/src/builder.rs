//! Section → unsigned event record.
//!
//! Tag order is positional and fixed: `d`, `title`, `author`, `version`,
//! then the section's optional tags in their original order, then the
//! content-type tag if one is configured. Fixed tags are never omitted,
//! even when their value is empty.

use serde::{Deserialize, Serialize};

use crate::section::Section;
use crate::tag::Tag;
use crate::types::{DEFAULT_CONTENT_TYPE, SECTION_EVENT_KIND};

/// Unsigned event handed to the client for signing and broadcast.
///
/// Serializes to the unsigned-event JSON shape:
/// `{"kind":30041,"content":"...","tags":[["d","..."],...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventToPublish {
    kind: u16,
    content: String,
    tags: Vec<Tag>,
}

impl EventToPublish {
    /// Section event with the given content and tags.
    pub fn section(content: String, tags: Vec<Tag>) -> Self {
        Self {
            kind: SECTION_EVENT_KIND,
            content,
            tags,
        }
    }

    pub fn kind(&self) -> u16 {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// First value of the first tag named `name`.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags.iter().find(|t| t.name() == name).map(Tag::value)
    }

    /// Replaceable-event address `kind:pubkey:d`.
    pub fn coordinate(&self, pubkey: &str) -> String {
        format!("{}:{}:{}", self.kind, pubkey, self.tag_value("d").unwrap_or(""))
    }

    pub fn to_json(&self) -> Result<String, crate::SectionEventError> {
        serde_json::to_string(self).map_err(Into::into)
    }
}

/// Turns a [`Section`] into an [`EventToPublish`]. Pure, no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBuilder {
    content_type: Option<String>,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new(Some(DEFAULT_CONTENT_TYPE.to_string()))
    }
}

impl RecordBuilder {
    /// `content_type` adds a trailing `["m", ...]` tag; `None` leaves it out.
    pub fn new(content_type: Option<String>) -> Self {
        Self { content_type }
    }

    /// Ordered tag list for a section.
    pub fn tags(&self, section: &Section) -> Vec<Tag> {
        let mut tags = Vec::with_capacity(5 + section.optional_tags.len());
        tags.push(Tag::new("d", section.d_tag.as_str()));
        tags.push(Tag::new("title", section.title.as_str()));
        tags.push(Tag::new("author", section.author.as_str()));
        tags.push(Tag::new("version", section.version.as_str()));
        tags.extend(section.optional_tags.iter().cloned());
        if let Some(mime) = &self.content_type {
            tags.push(Tag::new("m", mime.as_str()));
        }
        tags
    }

    pub fn build(&self, section: &Section) -> EventToPublish {
        EventToPublish::section(section.content.clone(), self.tags(section))
    }
}
