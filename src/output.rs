use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::pipeline::TimestampResult;

static CHAPTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,3}):([0-5]\d)\s*\|\|\s*(.+?)\s*$").expect("chapter pattern is valid"));

/// One `MM:SS || Title` line recognized in the model output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chapter {
    pub time: String,
    pub seconds: u64,
    pub title: String,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    video_id: &'a str,
    model: &'a str,
    timestamps: &'a str,
    chapters: Vec<Chapter>,
}

/// Pick out the lines that follow the timestamp format, ignoring anything else
pub fn parse_chapters(text: &str) -> Vec<Chapter> {
    text.lines()
        .filter_map(|line| {
            let caps = CHAPTER_RE.captures(line)?;
            let minutes: u64 = caps[1].parse().ok()?;
            let seconds: u64 = caps[2].parse().ok()?;
            Some(Chapter {
                time: format!("{}:{}", &caps[1], &caps[2]),
                seconds: minutes * 60 + seconds,
                title: caps[3].to_string(),
            })
        })
        .collect()
}

/// Render the timestamps exactly as generated
pub fn render_text(result: &TimestampResult) -> String {
    result.text.clone()
}

/// Render the timestamps plus parsed chapters as pretty JSON
pub fn render_json(result: &TimestampResult, model: &str) -> String {
    let report = Report {
        video_id: result.video_id.as_str(),
        model,
        timestamps: &result.text,
        chapters: parse_chapters(&result.text),
    };
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract_video_id;

    fn sample_result() -> TimestampResult {
        TimestampResult {
            video_id: extract_video_id("https://youtu.be/abc12345678").unwrap(),
            text: "Here are the timestamps:\n00:00 || Introduction\n02:56 || Setting up the project\n".to_string(),
        }
    }

    #[test]
    fn test_parse_chapters() {
        let chapters = parse_chapters(&sample_result().text);
        assert_eq!(
            chapters,
            vec![
                Chapter {
                    time: "00:00".to_string(),
                    seconds: 0,
                    title: "Introduction".to_string(),
                },
                Chapter {
                    time: "02:56".to_string(),
                    seconds: 176,
                    title: "Setting up the project".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_chapters_long_video() {
        let chapters = parse_chapters("105:09 || Wrap-up");
        assert_eq!(chapters[0].seconds, 105 * 60 + 9);
    }

    #[test]
    fn test_parse_chapters_ignores_other_lines() {
        assert!(parse_chapters("no timestamps here\n12:99 || bad seconds").is_empty());
    }

    #[test]
    fn test_render_text_is_verbatim() {
        let result = sample_result();
        assert_eq!(render_text(&result), result.text);
    }

    #[test]
    fn test_render_json() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&sample_result(), "gpt-4")).unwrap();
        assert_eq!(json["video_id"], "abc12345678");
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["timestamps"], sample_result().text.as_str());
        assert_eq!(json["chapters"].as_array().unwrap().len(), 2);
        assert_eq!(json["chapters"][1]["title"], "Setting up the project");
    }
}
