use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod list;

pub use list::TranscriptList;

use crate::api::Proxies;
use crate::{Result, TranscriptError};

/// A single timed caption entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptItem {
    /// Caption text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// A language a transcript can be translated into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationLanguage {
    /// Human readable language name
    pub language: String,

    /// Language code, e.g. "de"
    pub language_code: String,
}

impl fmt::Display for TranslationLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (\"{}\")", self.language_code, self.language)
    }
}

/// Resolves the caption tracks available for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptListFetcher: Send + Sync {
    /// Fetch and parse the availability data of a video into a transcript list
    async fn fetch_transcript_list(&self, video_id: &str, proxies: &Proxies) -> Result<TranscriptList>;
}

/// Downloads and parses the timed text behind a transcript URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimedTextSource: Send + Sync {
    async fn fetch_timed_text(&self, video_id: &str, url: &str) -> Result<Vec<TranscriptItem>>;
}

/// Metadata about one available caption track, able to fetch or translate itself
#[derive(Clone)]
pub struct Transcript {
    video_id: String,
    url: String,
    language: String,
    language_code: String,
    is_generated: bool,
    translation_languages: Vec<TranslationLanguage>,
    source: Arc<dyn TimedTextSource>,
}

impl Transcript {
    pub fn new(
        source: Arc<dyn TimedTextSource>,
        video_id: impl Into<String>,
        url: impl Into<String>,
        language: impl Into<String>,
        language_code: impl Into<String>,
        is_generated: bool,
        translation_languages: Vec<TranslationLanguage>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            url: url.into(),
            language: language.into(),
            language_code: language_code.into(),
            is_generated,
            translation_languages,
            source,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    /// Whether the track was produced by speech recognition
    pub fn is_generated(&self) -> bool {
        self.is_generated
    }

    pub fn translation_languages(&self) -> &[TranslationLanguage] {
        &self.translation_languages
    }

    pub fn is_translatable(&self) -> bool {
        !self.translation_languages.is_empty()
    }

    /// Fetch the timed text of this track
    pub async fn fetch(&self) -> Result<Vec<TranscriptItem>> {
        tracing::debug!(
            "Fetching '{}' transcript for video {}",
            self.language_code,
            self.video_id
        );
        self.source.fetch_timed_text(&self.video_id, &self.url).await
    }

    /// Derive a transcript in another language using YouTube's translation
    pub fn translate(&self, language_code: &str) -> Result<Transcript> {
        if !self.is_translatable() {
            return Err(TranscriptError::NotTranslatable {
                video_id: self.video_id.clone(),
            });
        }

        let target = self
            .translation_languages
            .iter()
            .find(|candidate| candidate.language_code == language_code)
            .ok_or_else(|| TranscriptError::TranslationUnavailable {
                video_id: self.video_id.clone(),
                language_code: language_code.to_string(),
            })?;

        Ok(Transcript {
            video_id: self.video_id.clone(),
            url: format!("{}&tlang={}", self.url, urlencoding::encode(language_code)),
            language: target.language.clone(),
            language_code: target.language_code.clone(),
            is_generated: true,
            translation_languages: Vec::new(),
            source: Arc::clone(&self.source),
        })
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (\"{}\")", self.language_code, self.language)?;
        if self.is_translatable() {
            write!(f, "[TRANSLATABLE]")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("video_id", &self.video_id)
            .field("language_code", &self.language_code)
            .field("language", &self.language)
            .field("is_generated", &self.is_generated)
            .field("translation_languages", &self.translation_languages)
            .finish_non_exhaustive()
    }
}
