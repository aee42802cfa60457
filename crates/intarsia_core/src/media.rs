//! Media payloads for multimodal generation requests.

use serde::{Deserialize, Serialize};

/// Where media content comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MediaSource {
    /// A remote or local URL.
    Url(String),
    /// Base64-encoded content.
    Base64(String),
    /// Raw bytes.
    Raw(Vec<u8>),
}

/// A non-text input attached to a generation request.
///
/// Used by rules that prompt from non-text sources (transcribed audio,
/// image bytes) instead of the base field's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Attachment {
    /// Image input (PNG, JPEG, WebP, etc.).
    Image {
        /// MIME type, e.g. "image/png"
        mime: Option<String>,
        /// Media source
        source: MediaSource,
    },
    /// Audio input (MP3, WAV, OGG, etc.).
    Audio {
        /// MIME type, e.g. "audio/mp3"
        mime: Option<String>,
        /// Media source
        source: MediaSource,
    },
    /// Document input (PDF, plain text, etc.).
    Document {
        /// MIME type, e.g. "application/pdf"
        mime: Option<String>,
        /// Media source
        source: MediaSource,
        /// Optional filename for context
        filename: Option<String>,
    },
}
