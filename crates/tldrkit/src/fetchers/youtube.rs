//! YouTube transcript fetcher
//!
//! Transcripts and video details come from `yt-transcript-rs`. Details are
//! best effort: when they cannot be read, title and author fall back to
//! oEmbed, and when that fails too the transcript is still returned.

use crate::error::FetchError;
use crate::fetchers::{Fetcher, LoadOptions, TlsPolicy};
use crate::source::video_id;
use crate::types::{Fragment, LoadedContent, VideoDetails};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;
use yt_transcript_rs::api::YouTubeTranscriptApi;

/// Default origin for oEmbed lookups
pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

/// Caption transcript of one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTranscript {
    /// Transcript text, whitespace collapsed
    pub text: String,
    /// Language code of the chosen caption track
    pub language_code: String,
    /// Whether the track was generated by speech recognition
    pub is_generated: bool,
}

/// Where transcripts and video details come from
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Transcript in the first available preferred language
    async fn transcript(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<CaptionTranscript, FetchError>;

    /// Title, author and length of the video
    async fn details(&self, video_id: &str) -> Result<VideoDetails, FetchError>;
}

/// [`TranscriptSource`] backed by the YouTube transcript API
#[derive(Debug, Default, Clone, Copy)]
pub struct YouTubeTranscripts;

impl YouTubeTranscripts {
    fn api() -> Result<YouTubeTranscriptApi, FetchError> {
        YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| FetchError::RequestError(format!("transcript client: {}", e)))
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscripts {
    async fn transcript(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<CaptionTranscript, FetchError> {
        let api = Self::api()?;
        let languages: Vec<&str> = languages.iter().map(String::as_str).collect();

        let fetched = api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| FetchError::TranscriptUnavailable(e.to_string()))?;

        let text = collapse_transcript(&fetched.text());
        Ok(CaptionTranscript {
            text,
            language_code: fetched.language_code,
            is_generated: fetched.is_generated,
        })
    }

    async fn details(&self, video_id: &str) -> Result<VideoDetails, FetchError> {
        let api = Self::api()?;
        let details = api
            .fetch_video_details(video_id)
            .await
            .map_err(|e| FetchError::MalformedPayload(format!("video details: {}", e)))?;

        Ok(VideoDetails {
            video_id: video_id.to_string(),
            title: non_empty(details.title),
            author: non_empty(details.author),
            length_seconds: parse_count(&details.length_seconds),
            view_count: parse_count(&details.view_count),
            description: non_empty(details.short_description),
        })
    }
}

/// YouTube transcript fetcher
pub struct YouTubeFetcher {
    source: Box<dyn TranscriptSource>,
    oembed_base: String,
}

impl YouTubeFetcher {
    /// Create a new YouTube fetcher against youtube.com
    pub fn new() -> Self {
        Self {
            source: Box::new(YouTubeTranscripts),
            oembed_base: YOUTUBE_BASE_URL.to_string(),
        }
    }

    /// Use a different transcript source
    pub fn with_source(mut self, source: impl TranscriptSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Query oEmbed at a different origin
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.oembed_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Title and author from oEmbed, used when details are missing
    async fn fetch_oembed(&self, options: &LoadOptions, video_id: &str) -> Option<OEmbed> {
        // Relaxed certificates only ever apply to generic pages
        let options = LoadOptions {
            tls_policy: TlsPolicy::Verify,
            ..options.clone()
        };
        let client = options
            .http_client(HeaderMap::new())
            .inspect_err(|e| warn!(error = %e, "Cannot build oEmbed client"))
            .ok()?;

        let canonical = format!("https://www.youtube.com/watch?v={}", video_id);
        let endpoint = Url::parse_with_params(
            &format!("{}/oembed", self.oembed_base),
            &[("url", canonical.as_str()), ("format", "json")],
        )
        .inspect_err(|e| warn!(error = %e, "Invalid oEmbed endpoint"))
        .ok()?;

        match client.get(endpoint).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<OEmbed>().await {
                Ok(oembed) => Some(oembed),
                Err(e) => {
                    warn!(error = %e, video_id, "Failed to parse oEmbed metadata");
                    None
                }
            },
            Ok(resp) => {
                warn!(status = resp.status().as_u16(), video_id, "oEmbed metadata unavailable");
                None
            }
            Err(e) => {
                warn!(error = %e, video_id, "Failed to fetch oEmbed metadata");
                None
            }
        }
    }
}

impl Default for YouTubeFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OEmbed {
    title: Option<String>,
    author_name: Option<String>,
}

#[async_trait]
impl Fetcher for YouTubeFetcher {
    fn name(&self) -> &'static str {
        "youtube"
    }

    async fn fetch(&self, url: &Url, options: &LoadOptions) -> Result<LoadedContent, FetchError> {
        let video_id = video_id(url).ok_or(FetchError::MissingVideoId)?;

        let transcript = self
            .source
            .transcript(&video_id, &options.languages)
            .await?;
        if transcript.text.is_empty() {
            return Err(FetchError::TranscriptUnavailable(
                "caption track is empty".to_string(),
            ));
        }
        debug!(
            video_id = %video_id,
            language = %transcript.language_code,
            generated = transcript.is_generated,
            "Fetched transcript"
        );

        let mut details = match self.source.details(&video_id).await {
            Ok(details) => details,
            Err(e) => {
                warn!(error = %e, video_id = %video_id, "Video details unavailable");
                VideoDetails {
                    video_id: video_id.clone(),
                    ..Default::default()
                }
            }
        };

        if details.title.is_none() {
            if let Some(oembed) = self.fetch_oembed(options, &video_id).await {
                details.title = oembed.title;
                details.author = details.author.or(oembed.author_name);
            }
        }

        let fragment = transcript_fragment(transcript.text, &details)
            .with_meta("language", transcript.language_code)
            .with_meta("is_generated", transcript.is_generated);

        Ok(LoadedContent::video(vec![fragment], Some(details)))
    }
}

/// Join transcript lines into one line of text
fn collapse_transcript(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Counts arrive as numbers or numeric strings; anything else is dropped
fn parse_count(value: &impl ToString) -> Option<u64> {
    let value = value.to_string();
    match value.trim().parse() {
        Ok(count) => Some(count),
        Err(_) => {
            if !value.trim().is_empty() {
                warn!(value = %value, "Ignoring non-numeric video count");
            }
            None
        }
    }
}

fn transcript_fragment(text: String, details: &VideoDetails) -> Fragment {
    let mut fragment = Fragment::new(text).with_meta("source", details.video_id.as_str());
    if let Some(title) = &details.title {
        fragment = fragment.with_meta("title", title.as_str());
    }
    if let Some(author) = &details.author {
        fragment = fragment.with_meta("author", author.as_str());
    }
    if let Some(length) = details.length_seconds {
        fragment = fragment.with_meta("length_seconds", length);
    }
    if let Some(views) = details.view_count {
        fragment = fragment.with_meta("view_count", views);
    }
    if let Some(description) = &details.description {
        fragment = fragment.with_meta("description", description.as_str());
    }
    fragment
}
