use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::transcripts::TranscriptItem;

pub mod formatters;

pub use formatters::*;

/// Format a single transcript
pub fn format_transcript(transcript: &[TranscriptItem], format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Pretty => format_as_pretty(transcript)?,
        OutputFormat::Json => format_as_json(transcript)?,
        OutputFormat::Text => format_as_text(transcript),
        OutputFormat::Srt => format_as_srt(transcript),
        OutputFormat::Webvtt => format_as_vtt(transcript),
    };

    Ok(content)
}

/// Format several transcripts as one document
pub fn format_transcripts(transcripts: &[Vec<TranscriptItem>], format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Pretty => format_batch_as_pretty(transcripts)?,
        OutputFormat::Json => format_batch_as_json(transcripts)?,
        OutputFormat::Text | OutputFormat::Srt | OutputFormat::Webvtt => {
            let outputs = transcripts
                .iter()
                .map(|transcript| format_transcript(transcript, format))
                .collect::<Result<Vec<_>>>()?;
            join_text_outputs(outputs)
        }
    };

    Ok(content)
}

/// Save formatted transcripts to file
pub fn save_to_file(transcripts: &[Vec<TranscriptItem>], path: &Path, format: &OutputFormat) -> Result<()> {
    let content = format_transcripts(transcripts, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print formatted transcripts to console
pub fn print_to_console(transcripts: &[Vec<TranscriptItem>], format: &OutputFormat) -> Result<()> {
    let content = format_transcripts(transcripts, format)?;
    println!("{}", content);
    Ok(())
}
