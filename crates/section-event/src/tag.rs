use serde::{Deserialize, Serialize};

use crate::error::SectionEventError;

/// A single protocol tag, e.g. `["title", "Test Title"]`.
///
/// Always holds a non-empty name followed by at least one value. The
/// parts are private, so a tag cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Tag(Vec<String>);

impl Tag {
    /// Two-element tag `[name, value]` for one of the builder's fixed names.
    ///
    /// `name` must be non-empty; outside the crate, use [`Tag::from_parts`].
    pub(crate) fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self(vec![name.to_string(), value.into()])
    }

    /// Tag from its raw parts. Rejects fewer than two parts or an empty name.
    pub fn from_parts<I, S>(parts: I) -> Result<Self, SectionEventError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        if parts.len() < 2 {
            return Err(SectionEventError::InvalidTag {
                reason: format!("expected at least 2 elements, got {}", parts.len()),
            });
        }
        if parts[0].is_empty() {
            return Err(SectionEventError::InvalidTag {
                reason: "empty tag name".into(),
            });
        }
        Ok(Self(parts))
    }

    pub fn name(&self) -> &str {
        &self.0[0]
    }

    /// First payload element.
    pub fn value(&self) -> &str {
        &self.0[1]
    }

    /// Everything after the name.
    pub fn values(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for Tag {
    type Error = SectionEventError;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        Tag::from_parts(parts)
    }
}

impl From<Tag> for Vec<String> {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl PartialEq<[&str]> for Tag {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Tag {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pair() {
        let tag = Tag::new("title", "Test Title");
        assert_eq!(tag.name(), "title");
        assert_eq!(tag.value(), "Test Title");
        assert_eq!(tag, ["title", "Test Title"]);
    }

    #[test]
    fn test_from_parts_keeps_extra_values() {
        let tag = Tag::from_parts(["a", "30040:abc:book", "wss://relay.example"]).unwrap();
        assert_eq!(tag.values().len(), 2);
        assert_eq!(tag.as_slice()[2], "wss://relay.example");
    }

    #[test]
    fn test_from_parts_rejects_short_tags() {
        let err = Tag::from_parts(["t"]).unwrap_err();
        assert!(matches!(err, SectionEventError::InvalidTag { .. }));
        assert!(Tag::from_parts(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_from_parts_rejects_empty_name() {
        let err = Tag::from_parts(["", "x"]).unwrap_err();
        assert!(err.to_string().contains("empty tag name"));
    }

    #[test]
    fn test_every_constructed_tag_deserializes_back() {
        let tags = [
            Tag::new("d", ""),
            Tag::new("m", "text/asciidoc"),
            Tag::from_parts(["e", "abc", "", "root"]).unwrap(),
        ];
        for tag in tags {
            let json = serde_json::to_string(&tag).unwrap();
            let back: Tag = serde_json::from_str(&json).unwrap();
            assert_eq!(back, tag);
        }
    }

    #[test]
    fn test_serializes_as_flat_array() {
        let tag = Tag::new("d", "test-d-tag");
        assert_eq!(serde_json::to_string(&tag).unwrap(), r#"["d","test-d-tag"]"#);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Tag = serde_json::from_str(r#"["t","rust"]"#).unwrap();
        assert_eq!(ok, ["t", "rust"]);
        assert!(serde_json::from_str::<Tag>(r#"["t"]"#).is_err());
    }
}
