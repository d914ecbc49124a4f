pub mod completion;
pub mod config;
pub mod error;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub use error::{Result, TimestampError};

/// A single captioned segment as returned by the transcript service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub start: f64,
    pub text: String,
}

impl TranscriptEntry {
    pub fn new(start: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            text: text.into(),
        }
    }
}

/// 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

static VIDEO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtu\.be/|youtube\.com/(?:watch\?v=|v/|embed/|watch\?.+&v=))([A-Za-z0-9_-]{11})")
        .expect("video URL pattern is valid")
});

/// Extract video ID from the supported YouTube URL shapes
///
/// Accepted: `youtu.be/ID`, `youtube.com/watch?v=ID`, `youtube.com/v/ID`,
/// `youtube.com/embed/ID` and `youtube.com/watch?...&v=ID`.
pub fn extract_video_id(url: &str) -> Result<VideoId> {
    VIDEO_URL_RE
        .captures(url)
        .map(|caps| VideoId(caps[1].to_string()))
        .ok_or_else(|| TimestampError::InvalidInput(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(url: &str) -> String {
        extract_video_id(url).unwrap().to_string()
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=xT04yu1KUQw&ab_channel=CemEygi"),
            "xT04yu1KUQw"
        );
    }

    #[test]
    fn test_watch_url_v_after_other_params() {
        assert_eq!(
            id("https://www.youtube.com/watch?feature=shared&t=42&v=IlS1aR_gfzs"),
            "IlS1aR_gfzs"
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(id("youtu.be/a-b_c1234_Z?si=xyz"), "a-b_c1234_Z");
    }

    #[test]
    fn test_v_url() {
        assert_eq!(id("http://youtube.com/v/dQw4w9WgXcQ?version=3"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(id("https://www.youtube.com/embed/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_captures_exactly_eleven_chars() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQextra"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_invalid_urls() {
        for url in [
            "",
            "not a url",
            "dQw4w9WgXcQ",
            "https://vimeo.com/123456789",
            "https://www.youtube.com/watch?v=short",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
        ] {
            let err = extract_video_id(url).unwrap_err();
            assert!(matches!(err, TimestampError::InvalidInput(_)), "{url}");
        }
    }
}
