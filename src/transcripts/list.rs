use std::collections::HashSet;
use std::fmt;

use super::{Transcript, TranslationLanguage};
use crate::{Result, TranscriptError};

/// The caption tracks available for one video
///
/// Manually created tracks come first in iteration order, followed by generated
/// ones; within each group the order reported by YouTube is kept. A language code
/// appears at most once per group: a video may carry both a manual and a generated
/// "en" track, and both stay reachable through the restricted lookups. The
/// unrestricted lookup prefers the manual one.
#[derive(Debug, Clone)]
pub struct TranscriptList {
    video_id: String,
    manually_created: Vec<Transcript>,
    generated: Vec<Transcript>,
    translation_languages: Vec<TranslationLanguage>,
}

impl TranscriptList {
    /// Build a list, keeping the first track seen for each language code of a group
    pub fn new(
        video_id: impl Into<String>,
        manually_created: Vec<Transcript>,
        generated: Vec<Transcript>,
        translation_languages: Vec<TranslationLanguage>,
    ) -> Self {
        let video_id = video_id.into();
        let manually_created = unique_by_language(&video_id, manually_created);
        let generated = unique_by_language(&video_id, generated);

        Self {
            video_id,
            manually_created,
            generated,
            translation_languages,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Languages any translatable track of this video can be translated into
    pub fn translation_languages(&self) -> &[TranslationLanguage] {
        &self.translation_languages
    }

    /// All tracks, manually created first
    pub fn iter(&self) -> impl Iterator<Item = &Transcript> {
        self.manually_created.iter().chain(self.generated.iter())
    }

    pub fn len(&self) -> usize {
        self.manually_created.len() + self.generated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find a transcript for the highest-priority language available
    ///
    /// Manually created and generated tracks are equally eligible; only the order
    /// of `language_codes` decides. Never falls back to translation.
    pub fn find_transcript(&self, language_codes: &[&str]) -> Result<&Transcript> {
        self.find(language_codes, &[&self.manually_created, &self.generated])
    }

    /// Like [`find_transcript`](Self::find_transcript), restricted to manually created tracks
    pub fn find_manually_created_transcript(&self, language_codes: &[&str]) -> Result<&Transcript> {
        self.find(language_codes, &[&self.manually_created])
    }

    /// Like [`find_transcript`](Self::find_transcript), restricted to generated tracks
    pub fn find_generated_transcript(&self, language_codes: &[&str]) -> Result<&Transcript> {
        self.find(language_codes, &[&self.generated])
    }

    fn find<'a>(&'a self, language_codes: &[&str], groups: &[&'a Vec<Transcript>]) -> Result<&'a Transcript> {
        for code in language_codes {
            let found = groups
                .iter()
                .flat_map(|group| group.iter())
                .find(|track| track.language_code() == *code);

            if let Some(track) = found {
                tracing::debug!("Selected '{}' transcript for video {}", code, self.video_id);
                return Ok(track);
            }
        }

        Err(TranscriptError::NoTranscriptFound {
            video_id: self.video_id.clone(),
            requested_languages: language_codes.iter().map(|code| code.to_string()).collect(),
            available: self.to_string(),
        })
    }
}

impl<'a> IntoIterator for &'a TranscriptList {
    type Item = &'a Transcript;
    type IntoIter = std::iter::Chain<std::slice::Iter<'a, Transcript>, std::slice::Iter<'a, Transcript>>;

    fn into_iter(self) -> Self::IntoIter {
        self.manually_created.iter().chain(self.generated.iter())
    }
}

fn unique_by_language(video_id: &str, tracks: Vec<Transcript>) -> Vec<Transcript> {
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|track| {
            let fresh = seen.insert(track.language_code().to_string());
            if !fresh {
                tracing::warn!(
                    "Dropping duplicate '{}' track for video {}",
                    track.language_code(),
                    video_id
                );
            }
            fresh
        })
        .collect()
}

fn write_section<T: fmt::Display>(f: &mut fmt::Formatter<'_>, title: &str, entries: &[T]) -> fmt::Result {
    writeln!(f, "({})", title)?;
    if entries.is_empty() {
        writeln!(f, "None")
    } else {
        for entry in entries {
            writeln!(f, " - {}", entry)?;
        }
        Ok(())
    }
}

impl fmt::Display for TranscriptList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "For this video ({}) transcripts are available in the following languages:",
            self.video_id
        )?;
        writeln!(f)?;
        write_section(f, "MANUALLY CREATED", &self.manually_created)?;
        writeln!(f)?;
        write_section(f, "GENERATED", &self.generated)?;
        writeln!(f)?;
        write_section(f, "TRANSLATION LANGUAGES", &self.translation_languages)
    }
}
