use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;

use crate::transcripts::{TimedTextSource, TranscriptItem};
use crate::utils::unescape_html;
use crate::{Result, TranscriptError};

/// Tags kept in caption text when formatting is preserved
const FORMATTING_TAGS: &[&str] = &[
    "strong", "em", "b", "i", "mark", "small", "del", "ins", "sub", "sup",
];

/// Timed text downloaded over HTTP from YouTube's timedtext endpoint
pub struct HttpTimedTextSource {
    client: Client,
    parser: TimedTextParser,
}

impl HttpTimedTextSource {
    pub fn new(client: Client, preserve_formatting: bool) -> Self {
        Self {
            client,
            parser: TimedTextParser::new(preserve_formatting),
        }
    }
}

#[async_trait]
impl TimedTextSource for HttpTimedTextSource {
    async fn fetch_timed_text(&self, video_id: &str, url: &str) -> Result<Vec<TranscriptItem>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(TranscriptError::RequestFailed {
                video_id: video_id.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(self.parser.parse(&body))
    }
}

/// Turns a timedtext XML document into transcript items
#[derive(Debug, Clone)]
pub struct TimedTextParser {
    markup: Regex,
}

impl TimedTextParser {
    pub fn new(preserve_formatting: bool) -> Self {
        let pattern = if preserve_formatting {
            // no lookahead in regex; formatting tags are captured and put back in strip_markup
            format!(r"</?(?:({})\b)?[^>]*>", FORMATTING_TAGS.join("|"))
        } else {
            r"<[^>]*>".to_string()
        };

        Self {
            markup: Regex::new(&pattern).expect("valid markup regex"),
        }
    }

    /// Parse every `<text>` element that has content
    pub fn parse(&self, document: &str) -> Vec<TranscriptItem> {
        text_open_regex()
            .captures_iter(document)
            .filter_map(|caps| {
                let attributes = caps.get(1).map_or("", |m| m.as_str());
                if attributes.trim_end().ends_with('/') {
                    return None;
                }

                let rest = &document[caps.get(0)?.end()..];
                let raw = &rest[..rest.find("</text>")?];
                if raw.is_empty() {
                    return None;
                }

                let start = attribute(attributes, "start")?.parse::<f64>().ok()?;
                let duration = attribute(attributes, "dur")
                    .and_then(|dur| dur.parse::<f64>().ok())
                    .unwrap_or(0.0);

                // XML layer first, then the HTML escaping YouTube applies inside it
                let text = unescape_html(&unescape_html(raw));

                Some(TranscriptItem {
                    text: self.strip_markup(&text),
                    start,
                    duration,
                })
            })
            .collect()
    }

    fn strip_markup(&self, text: &str) -> String {
        self.markup
            .replace_all(text, |caps: &regex::Captures| {
                if caps.get(1).is_some() {
                    caps[0].to_string()
                } else {
                    String::new()
                }
            })
            .into_owned()
    }
}

fn text_open_regex() -> &'static Regex {
    static TEXT: OnceLock<Regex> = OnceLock::new();
    TEXT.get_or_init(|| Regex::new(r"<text\b([^>]*)>").expect("valid text regex"))
}

fn attribute<'a>(attributes: &'a str, name: &str) -> Option<&'a str> {
    static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    let pattern = ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#).expect("valid attribute regex")
    });

    pattern
        .captures_iter(attributes)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}
