//! YouTube Transcripts - retrieve caption transcripts for YouTube videos
//!
//! This library resolves the caption tracks available for a video, picks one according
//! to a language-priority list, and fetches its timed text. Batches of videos can be
//! retrieved either fail-fast or with per-video failures collected.

pub mod api;
pub mod cli;
pub mod config;
pub mod output;
pub mod transcripts;
pub mod utils;
pub mod youtube;

pub use api::{ensure_no_cookies, run_batch, BatchResult, Proxies, TranscriptApi, DEFAULT_LANGUAGES};
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use transcripts::{
    TimedTextSource, Transcript, TranscriptItem, TranscriptList, TranscriptListFetcher,
    TranslationLanguage,
};
pub use youtube::YoutubeFetcher;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Error types specific to transcript retrieval
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("Subtitles are disabled for video {video_id}")]
    TranscriptsDisabled { video_id: String },

    #[error("Video {video_id} is no longer available")]
    VideoUnavailable { video_id: String },

    #[error("YouTube is receiving too many requests from this IP (video {video_id})")]
    TooManyRequests { video_id: String },

    #[error("No transcripts are available for video {video_id}")]
    NoTranscriptAvailable { video_id: String },

    #[error(
        "No transcript found for video {video_id} in any of the requested languages [{}]\n\n{available}",
        .requested_languages.join(", ")
    )]
    NoTranscriptFound {
        video_id: String,
        requested_languages: Vec<String>,
        available: String,
    },

    #[error("The requested language is not translatable (video {video_id})")]
    NotTranslatable { video_id: String },

    #[error("The requested translation language '{language_code}' is not available (video {video_id})")]
    TranslationUnavailable {
        video_id: String,
        language_code: String,
    },

    #[error("Request to YouTube failed for video {video_id}: HTTP {status}")]
    RequestFailed { video_id: String, status: u16 },

    #[error("Failed to parse response for video {video_id}: {reason}")]
    Parse { video_id: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TranscriptError {
    /// The video this error concerns, when known
    pub fn video_id(&self) -> Option<&str> {
        match self {
            TranscriptError::TranscriptsDisabled { video_id }
            | TranscriptError::VideoUnavailable { video_id }
            | TranscriptError::TooManyRequests { video_id }
            | TranscriptError::NoTranscriptAvailable { video_id }
            | TranscriptError::NoTranscriptFound { video_id, .. }
            | TranscriptError::NotTranslatable { video_id }
            | TranscriptError::TranslationUnavailable { video_id, .. }
            | TranscriptError::RequestFailed { video_id, .. }
            | TranscriptError::Parse { video_id, .. } => Some(video_id),
            TranscriptError::UnsupportedFeature(_) | TranscriptError::Http(_) => None,
        }
    }
}
