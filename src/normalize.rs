use crate::{Result, TimestampError, TranscriptEntry};

/// Format a start offset as `MM:SS`
///
/// Minutes are not folded into hours, so offsets past 99:59 widen to `100:00`.
pub fn format_offset(start: f64) -> String {
    let total = start.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Render transcript entries as `MM:SS || text` lines
///
/// Entries whose text starts with `[` (`[Music]`, `[Applause]`) are not speech
/// and are dropped.
pub fn normalize(entries: &[TranscriptEntry]) -> Result<String> {
    let mut lines = Vec::with_capacity(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        if entry.text.starts_with('[') {
            continue;
        }
        if !entry.start.is_finite() || entry.start < 0.0 {
            return Err(TimestampError::MalformedTranscript(format!(
                "entry {i} has invalid start offset {}",
                entry.start
            )));
        }
        lines.push(format!("{} || {}", format_offset(entry.start), entry.text));
    }

    Ok(lines.join("\n"))
}
