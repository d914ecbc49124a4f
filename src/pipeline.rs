use log::{debug, info};
use serde::Serialize;

use crate::completion::{CompletionRequest, CompletionService};
use crate::normalize::normalize;
use crate::prompt::{DEFAULT_SYSTEM_PROMPT, build_prompt};
use crate::youtube::TranscriptService;
use crate::{Result, VideoId, extract_video_id};

/// Generated timestamps for one video, exactly as the model returned them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestampResult {
    pub video_id: VideoId,
    pub text: String,
}

/// URL in, timestamp text out
///
/// Holds no per-request state; the same generator can serve any number of
/// requests. Every call re-fetches the transcript and re-queries the model.
pub struct TimestampGenerator<T, C> {
    transcripts: T,
    completions: C,
    model: String,
    system_prompt: String,
}

impl<T, C> TimestampGenerator<T, C>
where
    T: TranscriptService,
    C: CompletionService,
{
    pub fn new(transcripts: T, completions: C, model: impl Into<String>) -> Self {
        Self {
            transcripts,
            completions,
            model: model.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(&self, url: &str) -> Result<TimestampResult> {
        let video_id = extract_video_id(url)?;
        info!("Generating timestamps for video {video_id}");

        let entries = self.transcripts.fetch(&video_id).await?;
        debug!("Fetched {} transcript entries", entries.len());

        let transcript = normalize(&entries)?;
        debug!("Normalized transcript: {} lines", transcript.lines().count());

        let request = CompletionRequest {
            model: self.model.clone(),
            system: self.system_prompt.clone(),
            user: build_prompt(&transcript),
            temperature: 0.0,
        };

        let text = self.completions.complete(&request).await?;
        info!("Received {} bytes of timestamps for {video_id}", text.len());

        Ok(TimestampResult { video_id, text })
    }
}
