use std::sync::LazyLock;

use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::{Result, TimestampError, TranscriptEntry, VideoId};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Source of timestamped transcript entries for a video
#[async_trait]
pub trait TranscriptService: Send + Sync {
    async fn fetch(&self, video_id: &VideoId) -> Result<Vec<TranscriptEntry>>;
}

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Fetches YouTube's built-in captions via the InnerTube API
pub struct CaptionClient {
    http: reqwest::Client,
    lang: String,
}

impl CaptionClient {
    pub fn new(http: reqwest::Client, lang: impl Into<String>) -> Self {
        Self {
            http,
            lang: lang.into(),
        }
    }

    async fn get_text(&self, url: &str) -> reqwest::Result<String> {
        self.http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    async fn caption_tracks(&self, video_id: &VideoId, api_key: &str) -> reqwest::Result<Vec<CaptionTrack>> {
        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": self.lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id.as_str()
        });

        let resp: InnerTubePlayerResponse = self
            .http
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .and_then(|r| r.caption_tracks)
            .unwrap_or_default())
    }
}

#[async_trait]
impl TranscriptService for CaptionClient {
    async fn fetch(&self, video_id: &VideoId) -> Result<Vec<TranscriptEntry>> {
        let unavailable = |reason: String| TimestampError::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason,
        };

        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {watch_url}");

        let page_html = self
            .get_text(&watch_url)
            .await
            .map_err(|e| unavailable(format!("watch page request failed: {e}")))?;

        let api_key = extract_api_key(&page_html).ok_or_else(|| {
            unavailable("could not extract InnerTube API key from watch page".to_string())
        })?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let tracks = self
            .caption_tracks(video_id, &api_key)
            .await
            .map_err(|e| unavailable(format!("player request failed: {e}")))?;

        // Step 3: Prefer the requested language, fall back to the first track
        let track = select_track(&tracks, &self.lang)
            .ok_or_else(|| unavailable("no captions available".to_string()))?;
        debug!("Using caption track: lang={}", track.language_code);

        // Step 4: Fetch the caption XML
        let caption_xml = self
            .get_text(&track.base_url)
            .await
            .map_err(|e| unavailable(format!("caption request failed: {e}")))?;

        let entries = parse_caption_xml(&caption_xml)?;
        debug!("Parsed {} caption entries for {video_id}", entries.len());
        Ok(entries)
    }
}

fn select_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> Option<&'a CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.language_code == lang)
        .or_else(|| tracks.first())
}

static API_KEY_RES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).expect("api key pattern is valid"),
        // Newer watch pages
        Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).expect("api key pattern is valid"),
    ]
});

fn extract_api_key(html: &str) -> Option<String> {
    API_KEY_RES
        .iter()
        .find_map(|re| re.captures(html).map(|caps| caps[1].to_string()))
}

fn parse_caption_xml(xml: &str) -> Result<Vec<TranscriptEntry>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut current_start: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let start = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.as_ref() == b"start")
                    .and_then(|attr| String::from_utf8_lossy(&attr.value).parse::<f64>().ok());
                match start {
                    Some(start) => current_start = Some(start),
                    None => {
                        return Err(TimestampError::MalformedTranscript(format!(
                            "caption entry {} has no valid start attribute",
                            entries.len()
                        )));
                    }
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => {
                // An empty <text></text> must not claim the whitespace after it
                current_start = None;
            }
            Ok(Event::Empty(_)) => {
                // Self-closing <text .../> with no content
            }
            Ok(Event::Text(ref e)) => {
                if let Some(start) = current_start.take() {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.trim().is_empty() {
                        entries.push(TranscriptEntry { start, text });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TimestampError::MalformedTranscript(format!(
                    "error parsing caption XML: {e}"
                )));
            }
            _ => {}
        }
    }

    Ok(entries)
}
