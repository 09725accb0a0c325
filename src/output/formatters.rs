use anyhow::Result;

use crate::transcripts::TranscriptItem;
use crate::utils::format_timestamp;

/// Separator between transcripts in text based batch output
const TRANSCRIPT_SEPARATOR: &str = "\n\n\n";

/// Indented JSON
pub fn format_as_pretty(transcript: &[TranscriptItem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(transcript)?)
}

pub fn format_batch_as_pretty(transcripts: &[Vec<TranscriptItem>]) -> Result<String> {
    Ok(serde_json::to_string_pretty(transcripts)?)
}

/// Compact JSON
pub fn format_as_json(transcript: &[TranscriptItem]) -> Result<String> {
    Ok(serde_json::to_string(transcript)?)
}

pub fn format_batch_as_json(transcripts: &[Vec<TranscriptItem>]) -> Result<String> {
    Ok(serde_json::to_string(transcripts)?)
}

/// Caption texts only, one per line
pub fn format_as_text(transcript: &[TranscriptItem]) -> String {
    transcript
        .iter()
        .map(|item| item.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// SubRip cues
pub fn format_as_srt(transcript: &[TranscriptItem]) -> String {
    let cues: Vec<String> = cue_times(transcript)
        .enumerate()
        .map(|(index, (item, start, end))| {
            format!(
                "{}\n{} --> {}\n{}\n",
                index + 1,
                format_timestamp(start, ','),
                format_timestamp(end, ','),
                item.text
            )
        })
        .collect();

    format!("{}\n", cues.join("\n"))
}

/// WebVTT cues
pub fn format_as_vtt(transcript: &[TranscriptItem]) -> String {
    let cues: Vec<String> = cue_times(transcript)
        .map(|(item, start, end)| {
            format!(
                "{} --> {}\n{}",
                format_timestamp(start, '.'),
                format_timestamp(end, '.'),
                item.text
            )
        })
        .collect();

    format!("WEBVTT\n\n{}\n", cues.join("\n\n"))
}

/// Join per-transcript text output
pub fn join_text_outputs(outputs: Vec<String>) -> String {
    outputs.join(TRANSCRIPT_SEPARATOR)
}

/// Cue start and end, the end clamped so cues never overlap the next one
fn cue_times(transcript: &[TranscriptItem]) -> impl Iterator<Item = (&TranscriptItem, f64, f64)> {
    transcript.iter().enumerate().map(move |(index, item)| {
        let mut end = item.start + item.duration;
        if let Some(next) = transcript.get(index + 1) {
            if next.start < end {
                end = next.start;
            }
        }
        (item, item.start, end)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TranscriptItem> {
        vec![
            TranscriptItem {
                text: "Hello".to_string(),
                start: 0.0,
                duration: 2.5,
            },
            TranscriptItem {
                text: "world".to_string(),
                start: 2.0,
                duration: 1.0,
            },
        ]
    }

    #[test]
    fn test_format_as_text() {
        assert_eq!(format_as_text(&sample()), "Hello\nworld");
        assert_eq!(
            join_text_outputs(vec!["a".to_string(), "b".to_string()]),
            "a\n\n\nb"
        );
    }

    #[test]
    fn test_format_as_srt_clamps_overlap() {
        let expected = "1\n00:00:00,000 --> 00:00:02,000\nHello\n\n\
                        2\n00:00:02,000 --> 00:00:03,000\nworld\n\n";
        assert_eq!(format_as_srt(&sample()), expected);
    }

    #[test]
    fn test_format_as_vtt() {
        let expected = "WEBVTT\n\n\
                        00:00:00.000 --> 00:00:02.000\nHello\n\n\
                        00:00:02.000 --> 00:00:03.000\nworld\n";
        assert_eq!(format_as_vtt(&sample()), expected);
    }

    #[test]
    fn test_json_formats() {
        let json = format_as_json(&sample()).unwrap();
        assert!(json.starts_with(r#"[{"text":"Hello","start":0.0,"duration":2.5}"#));

        let batch = format_batch_as_json(&[sample(), Vec::new()]).unwrap();
        assert!(batch.ends_with(",[]]"));

        let pretty = format_as_pretty(&sample()).unwrap();
        assert!(pretty.contains("\n  {\n    \"text\": \"Hello\""));
    }
}
