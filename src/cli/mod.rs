use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::transcripts::{Transcript, TranscriptList};
use crate::Result;

#[derive(Parser)]
#[command(
    name = "yt-transcript",
    about = "YouTube Transcripts - fetch caption transcripts for YouTube videos",
    version,
    long_about = "Retrieves the manually created or automatically generated captions of YouTube videos, \
                  picking the first available language from a priority list and optionally translating it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch transcripts for one or more videos
    Fetch {
        /// Video ids or YouTube URLs
        #[arg(value_name = "VIDEO_ID", required = true)]
        video_ids: Vec<String>,

        /// Language codes in descending priority (defaults to the configured list)
        #[arg(short, long, value_name = "LANG", num_args = 1..)]
        languages: Vec<String>,

        /// Only consider manually created transcripts
        #[arg(long)]
        exclude_generated: bool,

        /// Only consider automatically generated transcripts
        #[arg(long)]
        exclude_manually_created: bool,

        /// Translate the selected transcript into this language
        #[arg(short, long, value_name = "LANG")]
        translate: Option<String>,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Proxy for HTTP requests
        #[arg(long, value_name = "URL", env = "HTTP_PROXY")]
        http_proxy: Option<String>,

        /// Proxy for HTTPS requests
        #[arg(long, value_name = "URL", env = "HTTPS_PROXY")]
        https_proxy: Option<String>,

        /// Cookie file for authenticated requests (not supported)
        #[arg(long, value_name = "FILE")]
        cookies: Option<PathBuf>,

        /// Stop at the first video that fails
        #[arg(long)]
        fail_fast: bool,
    },

    /// List the transcripts available for one or more videos
    List {
        /// Video ids or YouTube URLs
        #[arg(value_name = "VIDEO_ID", required = true)]
        video_ids: Vec<String>,

        /// Proxy for HTTP requests
        #[arg(long, value_name = "URL", env = "HTTP_PROXY")]
        http_proxy: Option<String>,

        /// Proxy for HTTPS requests
        #[arg(long, value_name = "URL", env = "HTTPS_PROXY")]
        https_proxy: Option<String>,

        /// Cookie file for authenticated requests (not supported)
        #[arg(long, value_name = "FILE")]
        cookies: Option<PathBuf>,
    },

    /// Show or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented JSON
    Pretty,
    /// Compact JSON
    Json,
    /// Plain text
    Text,
    /// SRT subtitle format
    Srt,
    /// WebVTT format
    Webvtt,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Srt => write!(f, "srt"),
            OutputFormat::Webvtt => write!(f, "webvtt"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(value, true)
    }
}

/// Which kinds of transcript the fetch command may select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFilter {
    Any,
    ManuallyCreated,
    Generated,
    /// Both kinds excluded
    Nothing,
}

impl TranscriptFilter {
    pub fn from_flags(exclude_generated: bool, exclude_manually_created: bool) -> Self {
        match (exclude_generated, exclude_manually_created) {
            (false, false) => TranscriptFilter::Any,
            (true, false) => TranscriptFilter::ManuallyCreated,
            (false, true) => TranscriptFilter::Generated,
            (true, true) => TranscriptFilter::Nothing,
        }
    }

    /// Pick a transcript from the list, `None` when everything is excluded
    pub fn select<'a>(&self, list: &'a TranscriptList, languages: &[&str]) -> Result<Option<&'a Transcript>> {
        let transcript = match self {
            TranscriptFilter::Any => list.find_transcript(languages)?,
            TranscriptFilter::ManuallyCreated => list.find_manually_created_transcript(languages)?,
            TranscriptFilter::Generated => list.find_generated_transcript(languages)?,
            TranscriptFilter::Nothing => return Ok(None),
        };

        Ok(Some(transcript))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcripts::MockTimedTextSource;
    use std::sync::Arc;

    fn list() -> TranscriptList {
        let track = |code: &str, generated: bool| {
            Transcript::new(
                Arc::new(MockTimedTextSource::new()),
                "vid1",
                format!("https://www.youtube.com/api/timedtext?lang={}", code),
                code,
                code,
                generated,
                Vec::new(),
            )
        };
        TranscriptList::new("vid1", vec![track("de", false)], vec![track("en", true)], Vec::new())
    }

    #[test]
    fn test_parse_fetch_command() {
        let cli = Cli::try_parse_from([
            "yt-transcript",
            "fetch",
            "abc",
            "def",
            "--languages",
            "de",
            "en",
            "--format",
            "srt",
            "--exclude-generated",
        ])
        .unwrap();

        match cli.command {
            Commands::Fetch {
                video_ids,
                languages,
                format,
                exclude_generated,
                exclude_manually_created,
                ..
            } => {
                assert_eq!(video_ids, vec!["abc", "def"]);
                assert_eq!(languages, vec!["de", "en"]);
                assert_eq!(format, Some(OutputFormat::Srt));
                assert!(exclude_generated);
                assert!(!exclude_manually_created);
            }
            _ => panic!("expected fetch command"),
        }
    }

    #[test]
    fn test_fetch_requires_video_id() {
        assert!(Cli::try_parse_from(["yt-transcript", "fetch"]).is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("WEBVTT".parse::<OutputFormat>(), Ok(OutputFormat::Webvtt));
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Pretty.to_string(), "pretty");
    }

    #[test]
    fn test_filter_selection() {
        let list = list();

        let any = TranscriptFilter::from_flags(false, false);
        assert_eq!(any.select(&list, &["en", "de"]).unwrap().unwrap().language_code(), "en");

        let manual = TranscriptFilter::from_flags(true, false);
        assert_eq!(manual.select(&list, &["en", "de"]).unwrap().unwrap().language_code(), "de");

        let generated = TranscriptFilter::from_flags(false, true);
        assert!(generated.select(&list, &["de"]).is_err());

        let nothing = TranscriptFilter::from_flags(true, true);
        assert!(nothing.select(&list, &["en"]).unwrap().is_none());
    }
}
