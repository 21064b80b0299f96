//! YouTube transcript loader
//!
//! Fetches the watch page, locates the caption track list embedded in the
//! player response, downloads the timed-text XML, and produces one document
//! per transcript segment with its timestamp.

use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Deserialize;

use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::types::{Document, SourceMetadata};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Loader for YouTube video transcripts
pub struct YoutubeLoader {
    http: reqwest::Client,
    language: String,
    caption_tracks: Regex,
    page_title: Regex,
}

/// One caption track from the player response
#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode", default)]
    language_code: String,
}

/// One transcript segment with its start offset
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TranscriptSegment {
    pub start_secs: f64,
    pub text: String,
}

impl YoutubeLoader {
    /// Create a loader from configuration
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            language: config.transcript_language.clone(),
            caption_tracks: Regex::new(r#""captionTracks":(\[.*?\])"#).expect("static regex"),
            page_title: Regex::new(r"<title>(.*?)</title>").expect("static regex"),
        })
    }

    /// Load the transcript of a video as per-segment documents
    pub async fn load(&self, url: &str) -> Result<Vec<Document>> {
        tracing::info!(url, "loading youtube transcript");

        let page = self.fetch(url).await?;

        let title = self
            .page_title
            .captures(&page)
            .map(|c| c[1].trim_end_matches(" - YouTube").trim().to_string())
            .filter(|t| !t.is_empty());

        let tracks = self.parse_caption_tracks(&page)?;
        let track = self.pick_track(&tracks)?;

        let xml = self.fetch(&track.base_url).await?;
        let segments = parse_timed_text(&xml)?;

        if segments.is_empty() {
            return Err(Error::NoTranscript(format!("{}: transcript is empty", url)));
        }

        Ok(segments
            .into_iter()
            .map(|segment| {
                let metadata = SourceMetadata::youtube(
                    url,
                    format_timestamp(segment.start_secs),
                    title.clone(),
                );
                Document::new(segment.text, metadata)
            })
            .collect())
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("reading body of {} failed: {}", url, e)))
    }

    /// Extract the caption track list embedded in the watch page
    fn parse_caption_tracks(&self, page: &str) -> Result<Vec<CaptionTrack>> {
        let raw = self
            .caption_tracks
            .captures(page)
            .map(|c| c[1].to_string())
            .ok_or_else(|| {
                Error::NoTranscript("video has no caption tracks (transcripts disabled?)".to_string())
            })?;

        serde_json::from_str(&raw)
            .map_err(|e| Error::NoTranscript(format!("caption track list unparseable: {}", e)))
    }

    /// Prefer the configured language, fall back to the first track
    fn pick_track<'a>(&self, tracks: &'a [CaptionTrack]) -> Result<&'a CaptionTrack> {
        tracks
            .iter()
            .find(|t| t.language_code == self.language)
            .or_else(|| tracks.first())
            .ok_or_else(|| Error::NoTranscript("caption track list is empty".to_string()))
    }
}

/// Parse timed-text XML (`<transcript><text start="…" dur="…">…</text>…`)
pub(crate) fn parse_timed_text(xml: &str) -> Result<Vec<TranscriptSegment>> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                current_start = None;
                current_text.clear();
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"start" {
                        current_start = attr
                            .unescape_value()
                            .ok()
                            .and_then(|v| v.parse::<f64>().ok());
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Ok(text) = t.unescape() {
                    current_text.push_str(&text);
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"text" => {
                let text = current_text.trim().to_string();
                if let (Some(start), false) = (current_start.take(), text.is_empty()) {
                    segments.push(TranscriptSegment {
                        start_secs: start,
                        text,
                    });
                }
                current_text.clear();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::NoTranscript(format!("timed-text XML unparseable: {}", e)));
            }
        }
    }

    Ok(segments)
}

/// Format seconds as "MM:SS", or "H:MM:SS" past one hour
pub(crate) fn format_timestamp(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_format_as_minutes_and_seconds() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(75.4), "01:15");
        assert_eq!(format_timestamp(754.0), "12:34");
    }

    #[test]
    fn timestamps_past_an_hour_include_hours() {
        assert_eq!(format_timestamp(3661.0), "1:01:01");
        assert_eq!(format_timestamp(7322.0), "2:02:02");
    }

    #[test]
    fn timed_text_parses_segments_in_order() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <transcript>
              <text start="0.12" dur="2.5">Hello and welcome</text>
              <text start="2.62" dur="3.1">to the &amp;quot;channel&amp;quot;</text>
              <text start="5.72" dur="1.0"></text>
            </transcript>"#;

        let segments = parse_timed_text(xml).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello and welcome");
        assert_eq!(segments[0].start_secs, 0.12);
        assert!(segments[1].text.contains("channel"));
    }

    #[test]
    fn empty_transcript_parses_to_no_segments() {
        let segments = parse_timed_text("<transcript></transcript>").unwrap();
        assert!(segments.is_empty());
    }
}
