//! Message segment types.
//!
//! A segment is a single unit of content in an inbound message: plain text,
//! an image, a mention, an emoji. The gateway delivers messages as ordered
//! segment sequences in the `{type, data}` shape; this module models the
//! segment kinds the routing layer actually inspects.
//!
//! # Example
//!
//! ```rust,ignore
//! use switchboard_core::Segment;
//!
//! let text = Segment::text("hello");
//! let image = Segment::image("https://example.com/cat.png");
//! assert_eq!(text.as_text(), Some("hello"));
//! assert_eq!(image.image_url(), Some("https://example.com/cat.png"));
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Segment Enum
// ============================================================================

/// A single unit of message content.
///
/// Serializes to the gateway's `{"type": ..., "data": {...}}` mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Segment {
    /// Plain text content.
    Text(TextData),
    /// Image reference.
    Image(ImageData),
    /// @mention of a user.
    At(AtData),
    /// Platform emoji.
    Face(FaceData),
}

/// Plain text segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    /// The text content.
    pub text: String,
}

/// Image segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    /// Image file name, path, or URL as sent.
    pub file: String,
    /// Resolved download URL (receive only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// @mention segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtData {
    /// Target user ID, or "all" for @everyone.
    pub target: String,
}

/// Emoji segment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceData {
    /// Emoji ID in the platform's emoji table.
    pub id: String,
}

impl Segment {
    /// Creates a plain text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(TextData { text: text.into() })
    }

    /// Creates an image segment with a resolved URL.
    pub fn image(url: impl Into<String>) -> Self {
        let url = url.into();
        Segment::Image(ImageData {
            file: url.clone(),
            url: Some(url),
        })
    }

    /// Creates an @mention segment.
    pub fn at(target: impl Into<String>) -> Self {
        Segment::At(AtData {
            target: target.into(),
        })
    }

    /// Creates an emoji segment.
    pub fn face(id: i32) -> Self {
        Segment::Face(FaceData { id: id.to_string() })
    }

    /// Returns the type tag of this segment ("text", "image", ...).
    pub fn segment_type(&self) -> &'static str {
        match self {
            Segment::Text(_) => "text",
            Segment::Image(_) => "image",
            Segment::At(_) => "at",
            Segment::Face(_) => "face",
        }
    }

    /// Returns true if this is a plain text segment.
    pub fn is_text(&self) -> bool {
        matches!(self, Segment::Text(_))
    }

    /// Returns the text content if this is a text segment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Segment::Text(data) => Some(&data.text),
            _ => None,
        }
    }

    /// Returns the image locator if this is an image segment.
    ///
    /// Prefers the resolved download URL; falls back to the `file` field
    /// when the gateway did not attach one.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Segment::Image(data) => Some(data.url.as_deref().unwrap_or(&data.file)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Text(data) => write!(f, "{}", data.text),
            Segment::Image(data) => write!(f, "[image:{}]", data.file),
            Segment::At(data) => write!(f, "@{}", data.target),
            Segment::Face(data) => write!(f, "[face:{}]", data.id),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
