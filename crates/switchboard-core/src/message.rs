//! Message container.
//!
//! A [`MessageBody`] is the ordered sequence of [`Segment`]s that makes up
//! one inbound message. The routing layer derives two views from it: the
//! concatenated plain text (for keyword matching) and the ordered list of
//! image locators.

use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// An ordered sequence of message segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBody(Vec<Segment>);

impl MessageBody {
    /// Creates an empty message body.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns an iterator over the segments.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.0.iter()
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the message has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the segments as a slice.
    pub fn as_slice(&self) -> &[Segment] {
        &self.0
    }

    /// Concatenates the content of all text segments, in order.
    ///
    /// Non-text segments (images, mentions, ...) are ignored.
    pub fn plain_text(&self) -> String {
        self.0.iter().filter_map(Segment::as_text).collect()
    }

    /// Collects every image segment's locator, preserving order.
    pub fn image_urls(&self) -> Vec<String> {
        self.0
            .iter()
            .filter_map(|seg| seg.image_url().map(str::to_owned))
            .collect()
    }
}

impl From<Vec<Segment>> for MessageBody {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<Segment> for MessageBody {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for MessageBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for seg in &self.0 {
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_skips_non_text() {
        let body: MessageBody = vec![
            Segment::text("a"),
            Segment::image("u1"),
            Segment::text("b"),
            Segment::image("u2"),
        ]
        .into();

        assert_eq!(body.plain_text(), "ab");
        assert_eq!(body.image_urls(), vec!["u1", "u2"]);
    }

    #[test]
    fn empty_body() {
        let body = MessageBody::new();
        assert!(body.is_empty());
        assert_eq!(body.plain_text(), "");
        assert!(body.image_urls().is_empty());
    }

    #[test]
    fn deserialize_from_segment_array() {
        let json = r#"[
            {"type":"text","data":{"text":"look "}},
            {"type":"image","data":{"file":"f","url":"https://img.example/1.png"}}
        ]"#;
        let body: MessageBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body.plain_text(), "look ");
        assert_eq!(body.image_urls(), vec!["https://img.example/1.png"]);
    }
}
