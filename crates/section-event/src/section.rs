use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SectionEventError;
use crate::tag::Tag;

/// A section of a long-form publication, as supplied by the caller.
///
/// Every field is always present: anything missing from the input is an
/// empty string (or an empty tag list), never absent. Deserializing goes
/// through [`Section::from_mapping`], so serde and `from_json` accept the
/// same loose input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Map<String, Value>")]
pub struct Section {
    /// Stable identifier for the replaceable event (`d` tag).
    pub d_tag: String,
    pub title: String,
    pub author: String,
    pub version: String,
    /// Section body, published unmodified.
    pub content: String,
    /// Extra tags appended after the fixed ones, in this order.
    pub optional_tags: Vec<Tag>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a section from a loosely typed mapping.
    ///
    /// Missing keys and `null` become empty. Numbers and booleans are kept
    /// as their JSON text (`1.0` stays `"1.0"`). Unknown keys are ignored.
    pub fn from_mapping(map: &Map<String, Value>) -> Result<Self, SectionEventError> {
        Ok(Self {
            d_tag: scalar_field(map, "dTag")?,
            title: scalar_field(map, "title")?,
            author: scalar_field(map, "author")?,
            version: scalar_field(map, "version")?,
            content: scalar_field(map, "content")?,
            optional_tags: tags_field(map, "optionalTags")?,
        })
    }

    /// Parse a JSON object and build the section from it.
    pub fn from_json(json: &str) -> Result<Self, SectionEventError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Self::from_mapping(&map),
            other => Err(SectionEventError::InvalidField {
                field: "<root>".into(),
                reason: format!("expected an object, got {}", kind_of(&other)),
            }),
        }
    }

    pub fn with_d_tag(mut self, d_tag: impl Into<String>) -> Self {
        self.d_tag = d_tag.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Append one optional tag.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.optional_tags.push(tag);
        self
    }
}

impl TryFrom<Map<String, Value>> for Section {
    type Error = SectionEventError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        Section::from_mapping(&map)
    }
}

fn scalar_field(map: &Map<String, Value>, key: &str) -> Result<String, SectionEventError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
        Some(other) => Err(SectionEventError::InvalidField {
            field: key.to_string(),
            reason: format!("expected a string, got {}", kind_of(other)),
        }),
    }
}

fn tags_field(map: &Map<String, Value>, key: &str) -> Result<Vec<Tag>, SectionEventError> {
    let items = match map.get(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(SectionEventError::InvalidField {
                field: key.to_string(),
                reason: format!("expected an array of tags, got {}", kind_of(other)),
            })
        }
    };

    let mut tags = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Value::Array(parts) = item else {
            return Err(SectionEventError::InvalidField {
                field: format!("{key}[{i}]"),
                reason: format!("expected an array, got {}", kind_of(item)),
            });
        };
        let mut strings = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Value::String(s) => strings.push(s.clone()),
                other => {
                    return Err(SectionEventError::InvalidField {
                        field: format!("{key}[{i}]"),
                        reason: format!("expected string elements, got {}", kind_of(other)),
                    })
                }
            }
        }
        tags.push(Tag::from_parts(strings)?);
    }
    Ok(tags)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
