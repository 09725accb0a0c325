use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

use crate::config::FetchConfig;
use crate::transcripts::{TranscriptItem, TranscriptList, TranscriptListFetcher};
use crate::youtube::YoutubeFetcher;
use crate::{Result, TranscriptError};

/// Languages used when the caller does not pass any
pub const DEFAULT_LANGUAGES: &[&str] = &["en"];

/// Proxy URLs handed through to the fetcher untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proxies {
    pub http: Option<String>,
    pub https: Option<String>,
}

impl Proxies {
    pub fn is_empty(&self) -> bool {
        self.http.is_none() && self.https.is_none()
    }
}

/// Outcome of a batch retrieval
///
/// Every requested id ends up in exactly one of the two collections.
#[derive(Debug)]
pub struct BatchResult<T = Vec<TranscriptItem>> {
    /// Retrieved values keyed by video id
    pub successes: HashMap<String, T>,

    /// Videos that could not be retrieved, in input order
    pub failures: Vec<String>,
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self {
            successes: HashMap::new(),
            failures: Vec::new(),
        }
    }
}

/// Run `retrieve` for each id in turn, applying the batch error policy
///
/// With `continue_after_error` unset the first error is returned as is. Otherwise
/// errors are logged and the id is recorded as failed. An id given more than once
/// keeps the outcome of its last attempt.
pub async fn run_batch<S, T, F, Fut>(
    video_ids: &[S],
    continue_after_error: bool,
    mut retrieve: F,
) -> Result<BatchResult<T>>
where
    S: AsRef<str>,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut batch = BatchResult::default();

    for video_id in video_ids {
        let video_id = video_id.as_ref().to_string();

        match retrieve(video_id.clone()).await {
            Ok(value) => {
                batch.failures.retain(|failed| *failed != video_id);
                batch.successes.insert(video_id, value);
            }
            Err(err) if continue_after_error => {
                tracing::warn!("Skipping video {}: {}", video_id, err);
                batch.successes.remove(&video_id);
                if !batch.failures.contains(&video_id) {
                    batch.failures.push(video_id);
                }
            }
            Err(err) => return Err(err),
        }
    }

    Ok(batch)
}

/// Entry point for transcript retrieval
///
/// Owns the list fetcher (and through it the HTTP client); dropping the api
/// releases the transport.
pub struct TranscriptApi<F: TranscriptListFetcher = YoutubeFetcher> {
    fetcher: F,
}

impl TranscriptApi<YoutubeFetcher> {
    /// Create an api backed by the YouTube web fetcher
    pub fn new(settings: &FetchConfig) -> Result<Self> {
        Ok(Self::with_fetcher(YoutubeFetcher::new(settings)?))
    }
}

impl<F: TranscriptListFetcher> TranscriptApi<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolve the caption tracks available for a video
    pub async fn list_transcripts(
        &self,
        video_id: &str,
        proxies: Option<&Proxies>,
        cookies: Option<&Path>,
    ) -> Result<TranscriptList> {
        ensure_no_cookies(cookies)?;

        let no_proxies = Proxies::default();
        let proxies = proxies.unwrap_or(&no_proxies);

        tracing::debug!("Listing transcripts for video {}", video_id);
        self.fetcher.fetch_transcript_list(video_id, proxies).await
    }

    /// Fetch the transcript of a video in the first available requested language
    pub async fn get_transcript(
        &self,
        video_id: &str,
        languages: Option<&[&str]>,
        proxies: Option<&Proxies>,
        cookies: Option<&Path>,
    ) -> Result<Vec<TranscriptItem>> {
        let languages = languages.unwrap_or(DEFAULT_LANGUAGES);

        let list = self.list_transcripts(video_id, proxies, cookies).await?;
        let transcript = list.find_transcript(languages)?;

        tracing::info!(
            "Fetching '{}' transcript for video {}",
            transcript.language_code(),
            video_id
        );
        transcript.fetch().await
    }

    /// Fetch transcripts for several videos, one after another
    ///
    /// With `continue_after_error` unset the first failure is returned and nothing
    /// else; with it set failing ids are collected in [`BatchResult::failures`].
    pub async fn get_transcripts<S: AsRef<str>>(
        &self,
        video_ids: &[S],
        languages: Option<&[&str]>,
        continue_after_error: bool,
        proxies: Option<&Proxies>,
        cookies: Option<&Path>,
    ) -> Result<BatchResult> {
        ensure_no_cookies(cookies)?;

        run_batch(video_ids, continue_after_error, |video_id| async move {
            self.get_transcript(&video_id, languages, proxies, None).await
        })
        .await
    }
}

/// Authenticated retrieval is not implemented, so any cookie file is refused
pub fn ensure_no_cookies(cookies: Option<&Path>) -> Result<()> {
    match cookies {
        Some(path) if !path.as_os_str().is_empty() => Err(TranscriptError::UnsupportedFeature(format!(
            "loading cookies from {} is not implemented",
            path.display()
        ))),
        _ => Ok(()),
    }
}
