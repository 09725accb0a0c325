use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, Proxy};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub mod timed_text;

pub use timed_text::{HttpTimedTextSource, TimedTextParser};

use crate::api::Proxies;
use crate::config::FetchConfig;
use crate::transcripts::{
    TimedTextSource, Transcript, TranscriptList, TranscriptListFetcher, TranslationLanguage,
};
use crate::utils::unescape_html;
use crate::{Result, TranscriptError};

pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionsJson {
    player_captions_tracklist_renderer: Option<CaptionTracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTracklist {
    caption_tracks: Option<Vec<CaptionTrack>>,
    #[serde(default)]
    translation_languages: Vec<TranslationLanguageJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    #[serde(default)]
    name: LocalizedText,
    language_code: String,
    kind: Option<String>,
    #[serde(default)]
    is_translatable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationLanguageJson {
    language_code: String,
    #[serde(default)]
    language_name: LocalizedText,
}

/// YouTube sends names either as `simpleText` or as a list of text runs
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalizedText {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl LocalizedText {
    fn text(&self) -> String {
        match &self.simple_text {
            Some(text) => text.clone(),
            None => self.runs.iter().map(|run| run.text.as_str()).collect(),
        }
    }
}

/// Transcript list fetcher scraping the YouTube watch page
pub struct YoutubeFetcher {
    client: Client,
    settings: FetchConfig,
}

impl YoutubeFetcher {
    pub fn new(settings: &FetchConfig) -> Result<Self> {
        let client = Self::build_client(settings, &settings.proxies())?;

        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    fn build_client(settings: &FetchConfig, proxies: &Proxies) -> Result<Client> {
        let accept_language = HeaderValue::from_str(&settings.accept_language).unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid Accept-Language '{}', falling back to en-US",
                settings.accept_language
            );
            HeaderValue::from_static("en-US")
        });

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, accept_language);

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs));

        if let Some(proxy) = &proxies.http {
            builder = builder.proxy(Proxy::http(proxy)?);
        }
        if let Some(proxy) = &proxies.https {
            builder = builder.proxy(Proxy::https(proxy)?);
        }

        Ok(builder.build()?)
    }

    /// Shared client unless the call brings its own proxies
    fn client_for(&self, proxies: &Proxies) -> Result<Client> {
        if proxies.is_empty() {
            Ok(self.client.clone())
        } else {
            Self::build_client(&self.settings, proxies)
        }
    }

    async fn fetch_video_html(&self, client: &Client, video_id: &str) -> Result<String> {
        let url = format!("{}{}", WATCH_URL, urlencoding::encode(video_id));
        tracing::debug!("Requesting watch page: {}", url);

        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(TranscriptError::RequestFailed {
                video_id: video_id.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(unescape_html(&body))
    }
}

#[async_trait]
impl TranscriptListFetcher for YoutubeFetcher {
    async fn fetch_transcript_list(&self, video_id: &str, proxies: &Proxies) -> Result<TranscriptList> {
        let client = self.client_for(proxies)?;
        let html = self.fetch_video_html(&client, video_id).await?;

        let source: Arc<dyn TimedTextSource> = Arc::new(HttpTimedTextSource::new(
            client,
            self.settings.preserve_formatting,
        ));

        let list = parse_watch_page(video_id, &html, source)?;
        tracing::info!("Found {} transcripts for video {}", list.len(), video_id);
        Ok(list)
    }
}

/// Build the transcript list from an (unescaped) watch page
pub fn parse_watch_page(
    video_id: &str,
    html: &str,
    source: Arc<dyn TimedTextSource>,
) -> Result<TranscriptList> {
    let tracklist = extract_tracklist(video_id, html)?;

    let tracks = tracklist
        .caption_tracks
        .ok_or_else(|| TranscriptError::NoTranscriptAvailable {
            video_id: video_id.to_string(),
        })?;

    let translation_languages: Vec<TranslationLanguage> = tracklist
        .translation_languages
        .into_iter()
        .map(|language| TranslationLanguage {
            language: language.language_name.text(),
            language_code: language.language_code,
        })
        .collect();

    let mut manually_created = Vec::new();
    let mut generated = Vec::new();

    for track in tracks {
        let is_generated = track.kind.as_deref() == Some("asr");
        let translations = if track.is_translatable {
            translation_languages.clone()
        } else {
            Vec::new()
        };

        let transcript = Transcript::new(
            Arc::clone(&source),
            video_id,
            track.base_url,
            track.name.text(),
            track.language_code,
            is_generated,
            translations,
        );

        if is_generated {
            generated.push(transcript);
        } else {
            manually_created.push(transcript);
        }
    }

    Ok(TranscriptList::new(
        video_id,
        manually_created,
        generated,
        translation_languages,
    ))
}

fn extract_tracklist(video_id: &str, html: &str) -> Result<CaptionTracklist> {
    let Some((_, captions)) = html.split_once("\"captions\":") else {
        let video_id = video_id.to_string();
        return Err(if html.contains("class=\"g-recaptcha\"") {
            TranscriptError::TooManyRequests { video_id }
        } else if !html.contains("\"playabilityStatus\":") {
            TranscriptError::VideoUnavailable { video_id }
        } else {
            TranscriptError::TranscriptsDisabled { video_id }
        });
    };

    let json = captions
        .split(",\"videoDetails")
        .next()
        .unwrap_or(captions)
        .replace('\n', "");

    // the object may be followed by more script text
    let parsed = serde_json::Deserializer::from_str(&json)
        .into_iter::<CaptionsJson>()
        .next()
        .ok_or_else(|| TranscriptError::Parse {
            video_id: video_id.to_string(),
            reason: "empty captions section".to_string(),
        })?
        .map_err(|err| TranscriptError::Parse {
            video_id: video_id.to_string(),
            reason: err.to_string(),
        })?;

    parsed
        .player_captions_tracklist_renderer
        .ok_or_else(|| TranscriptError::TranscriptsDisabled {
            video_id: video_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcripts::MockTimedTextSource;

    const WATCH_PAGE: &str = r##"<html><script>var ytInitialPlayerResponse = {"playabilityStatus":{"status":"OK"},"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[
{"baseUrl":"https://www.youtube.com/api/timedtext?v=vid1&lang=de","name":{"simpleText":"German"},"languageCode":"de","isTranslatable":true},
{"baseUrl":"https://www.youtube.com/api/timedtext?v=vid1&lang=en&kind=asr","name":{"runs":[{"text":"English "},{"text":"(auto-generated)"}]},"languageCode":"en","kind":"asr","isTranslatable":true},
{"baseUrl":"https://www.youtube.com/api/timedtext?v=vid1&lang=fr","name":{"simpleText":"French"},"languageCode":"fr"}],
"translationLanguages":[{"languageCode":"es","languageName":{"simpleText":"Spanish"}}]}},"videoDetails":{"videoId":"vid1"}};</script></html>"##;

    fn source() -> Arc<dyn TimedTextSource> {
        Arc::new(MockTimedTextSource::new())
    }

    #[test]
    fn test_parse_watch_page() {
        let list = parse_watch_page("vid1", WATCH_PAGE, source()).unwrap();

        let codes: Vec<&str> = list.iter().map(|t| t.language_code()).collect();
        assert_eq!(codes, vec!["de", "fr", "en"]);

        let english = list.find_generated_transcript(&["en"]).unwrap();
        assert_eq!(english.language(), "English (auto-generated)");
        assert!(english.url().ends_with("kind=asr"));

        let german = list.find_manually_created_transcript(&["de"]).unwrap();
        assert_eq!(german.translation_languages().len(), 1);
        assert!(german.translate("es").is_ok());

        let french = list.find_transcript(&["fr"]).unwrap();
        assert!(!french.is_translatable());

        assert_eq!(list.translation_languages()[0].language, "Spanish");
    }

    #[test]
    fn test_missing_captions_section() {
        let disabled = r#"{"playabilityStatus":{"status":"OK"},"videoDetails":{}}"#;
        assert!(matches!(
            parse_watch_page("vid1", disabled, source()),
            Err(TranscriptError::TranscriptsDisabled { .. })
        ));

        let unavailable = "<html><body>gone</body></html>";
        assert!(matches!(
            parse_watch_page("vid1", unavailable, source()),
            Err(TranscriptError::VideoUnavailable { .. })
        ));

        let captcha = r#"<div class="g-recaptcha"></div>"#;
        assert!(matches!(
            parse_watch_page("vid1", captcha, source()),
            Err(TranscriptError::TooManyRequests { .. })
        ));
    }

    #[test]
    fn test_tracklist_without_tracks() {
        let page = r#""captions":{"playerCaptionsTracklistRenderer":{"translationLanguages":[]}},"videoDetails":{}"#;
        assert!(matches!(
            parse_watch_page("vid1", page, source()),
            Err(TranscriptError::NoTranscriptAvailable { .. })
        ));

        let page = r#""captions":{"somethingElse":{}},"videoDetails":{}"#;
        assert!(matches!(
            parse_watch_page("vid1", page, source()),
            Err(TranscriptError::TranscriptsDisabled { .. })
        ));
    }

    #[test]
    fn test_malformed_captions_json() {
        let page = r#""captions":{"playerCaptionsTracklistRenderer":,"videoDetails":{}"#;
        assert!(matches!(
            parse_watch_page("vid1", page, source()),
            Err(TranscriptError::Parse { .. })
        ));
    }

    #[test]
    fn test_fetcher_builds_with_proxies() {
        let mut settings = FetchConfig::default();
        settings.https_proxy = Some("http://127.0.0.1:3128".to_string());
        let fetcher = YoutubeFetcher::new(&settings).unwrap();

        let per_call = Proxies {
            http: Some("http://127.0.0.1:8080".to_string()),
            https: None,
        };
        assert!(fetcher.client_for(&per_call).is_ok());
        assert!(fetcher.client_for(&Proxies::default()).is_ok());
    }
}
