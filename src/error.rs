use thiserror::Error;

/// Everything that can abort a timestamp request
#[derive(Error, Debug)]
pub enum TimestampError {
    #[error("not a recognizable YouTube URL: {0}")]
    InvalidInput(String),

    #[error("no transcript available for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("malformed transcript: {0}")]
    MalformedTranscript(String),

    #[error("completion service failed: {0}")]
    CompletionServiceFailure(String),
}

pub type Result<T> = std::result::Result<T, TimestampError>;
