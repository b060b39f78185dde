//! Source classification
//!
//! A request is classified once, from the parsed URL host, into one of two
//! loading strategies.

use serde::{Deserialize, Serialize};
use url::Url;

/// Hosts served by the video strategy
const VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
    "youtu.be",
];

/// Length of a YouTube video id
const VIDEO_ID_LEN: usize = 11;

/// Which loading strategy a URL needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Video hosting platform, loaded via transcript
    Video,
    /// Any other web document
    Generic,
}

impl SourceKind {
    /// Classify a URL by its host
    pub fn of(url: &Url) -> Self {
        match url.host_str() {
            Some(host) if is_video_host(host) => SourceKind::Video,
            _ => SourceKind::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Video => "video",
            SourceKind::Generic => "generic",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_video_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    VIDEO_HOSTS.contains(&host.as_str())
}

/// Extract the video id from a YouTube URL
///
/// Handles `watch?v=`, `youtu.be/<id>`, and the `/shorts/`, `/embed/`,
/// `/live/` and `/v/` path forms.
pub fn video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    if !is_video_host(&host) {
        return None;
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let candidate = if host == "youtu.be" {
        segments.first().map(|s| s.to_string())
    } else {
        match segments.as_slice() {
            ["watch", ..] => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            ["shorts" | "embed" | "live" | "v", id, ..] => Some(id.to_string()),
            _ => None,
        }
    };

    candidate.filter(|id| is_valid_video_id(id))
}

fn is_valid_video_id(id: &str) -> bool {
    id.len() == VIDEO_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
