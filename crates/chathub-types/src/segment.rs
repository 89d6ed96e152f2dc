//! Message content segments.
//!
//! A message is an ordered list of segments, each one typed chunk of content
//! (text, image, audio, video, file). Segments are an internally tagged union
//! discriminated by the `type` field.

use serde::{Deserialize, Serialize};

/// One typed chunk of message content.
///
/// Serialized as an internally tagged object, e.g.
/// `{"type": "image", "url": "...", "alt": ""}`. Optional fields are omitted
/// when absent. Fields that belong to another variant are a decode error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum Segment {
    Text {
        text: String,
    },
    Image {
        /// URL or base64 data URI.
        url: String,
        /// Alternative text.
        #[serde(default)]
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    Audio {
        url: String,
        /// Duration in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
    },
    Video {
        url: String,
        /// Duration in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
        /// Cover image URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cover: Option<String>,
    },
    File {
        /// Download URL.
        url: String,
        filename: String,
        /// Size in bytes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<u64>,
    },
}

impl Segment {
    /// Build a text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text { text: text.into() }
    }

    /// Build an image segment with no alt text or dimensions.
    pub fn image(url: impl Into<String>) -> Self {
        Segment::Image {
            url: url.into(),
            alt: String::new(),
            width: None,
            height: None,
        }
    }

    /// Build a file segment.
    pub fn file(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Segment::File {
            url: url.into(),
            filename: filename.into(),
            size: None,
        }
    }

    /// The wire tag of this segment.
    pub fn kind(&self) -> &'static str {
        match self {
            Segment::Text { .. } => "text",
            Segment::Image { .. } => "image",
            Segment::Audio { .. } => "audio",
            Segment::Video { .. } => "video",
            Segment::File { .. } => "file",
        }
    }

    /// The text content, if this is a text segment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Segment::Text { text } => Some(text),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
