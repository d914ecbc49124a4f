/// Maximum number of timestamps the model is asked to produce
pub const MAX_TIMESTAMPS: usize = 6;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a knowledgeable programming-content video analyst.";

const INSTRUCTIONS: &str = "\
As an AI skilled in analyzing YouTube video content, your task is to create up to {max} accurate \
timestamps from the provided transcript. Each timestamp should represent a distinct topic or main \
idea in the video.

Guidelines for Timestamp Generation:
1. Analyze the transcript without summarizing it. Do not provide a summary, only generate the timestamps.
2. Ensure timestamps are well-spaced across the video, each representing a complete topic or idea.
3. Limit the total number of timestamps to {max}.
4. Titles for timestamps must be concise and clearly reflect the content of the segment.

Timestamp Format (one per line, MM:SS with leading zeros):
00:00 || Title for the first segment
02:56 || Title for the next segment
... and so on.

Each transcript line below is written as `MM:SS || spoken text`.

Based on the guidelines, generate the timestamps from this transcript:";

/// Embed a normalized transcript into the timestamp instructions
pub fn build_prompt(transcript: &str) -> String {
    let instructions = INSTRUCTIONS.replace("{max}", &MAX_TIMESTAMPS.to_string());
    format!("{instructions}\n\n{transcript}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = "00:00 || Hello\n02:05 || World";

    #[test]
    fn test_prompt_contains_transcript_verbatim() {
        assert!(build_prompt(TRANSCRIPT).contains(TRANSCRIPT));
    }

    #[test]
    fn test_prompt_limits_timestamp_count() {
        let prompt = build_prompt(TRANSCRIPT);
        assert!(prompt.contains(&format!("Limit the total number of timestamps to {MAX_TIMESTAMPS}")));
        assert!(prompt.contains(&format!("up to {MAX_TIMESTAMPS} accurate timestamps")));
    }

    #[test]
    fn test_prompt_states_six_timestamps() {
        let prompt = build_prompt(TRANSCRIPT);
        assert!(prompt.contains("up to 6 accurate timestamps"));
        assert!(prompt.contains("Limit the total number of timestamps to 6."));
        assert!(!prompt.contains("{max}"));
    }

    #[test]
    fn test_placeholder_in_transcript_is_untouched() {
        let transcript = "00:10 || print(\"{max}\")";
        assert!(build_prompt(transcript).contains(transcript));
    }

    #[test]
    fn test_prompt_describes_output_format() {
        let prompt = build_prompt(TRANSCRIPT);
        assert!(prompt.contains("00:00 || Title for the first segment"));
        assert!(prompt.contains("without summarizing"));
        assert!(prompt.contains("concise"));
    }

    #[test]
    fn test_prompt_ends_with_transcript() {
        let prompt = build_prompt(TRANSCRIPT);
        assert!(prompt.trim_end().ends_with(TRANSCRIPT));
    }

    #[test]
    fn test_prompt_with_empty_transcript() {
        let prompt = build_prompt("");
        assert!(prompt.ends_with("from this transcript:\n\n\n"));
    }
}
