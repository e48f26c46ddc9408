//! Types for the transform module.

/// What kind of media a downloaded recording is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Unknown,
}

impl MediaKind {
    /// Classify from an HTTP Content-Type header value.
    pub fn from_content_type(content_type: &str) -> Self {
        let lowered = content_type.to_ascii_lowercase();
        if lowered.contains("video") {
            Self::Video
        } else if lowered.contains("audio") {
            Self::Audio
        } else {
            Self::Unknown
        }
    }
}

/// One still frame sampled from a video recording.
#[derive(Debug, Clone)]
pub struct FrameCapture {
    /// Offset of the frame from the start of the recording.
    pub timestamp_secs: u64,
    /// JPEG-encoded image bytes.
    pub image: Vec<u8>,
}
