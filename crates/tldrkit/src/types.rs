//! Core types for TLDRKit

use crate::source::SourceKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// One summarization request, created per submission
#[derive(Clone, Default)]
pub struct Request {
    /// URL to summarize, as entered
    pub url: String,
    /// API key for the hosted model
    pub credential: String,
}

impl Request {
    /// Create a new request
    pub fn new(url: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credential: credential.into(),
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("url", &self.url)
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Tool input accepted over MCP
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SummarizeInput {
    /// The web page or YouTube URL to summarize (must be http:// or https://)
    pub url: String,
}

/// One unit of fetched content
///
/// `text` is optional. When it is absent, [`Fragment::content`] falls back
/// to the [`Display`](fmt::Display) form, which renders the metadata as
/// `key=value` pairs in key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl Fragment {
    /// Create a fragment with text and no metadata
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            metadata: BTreeMap::new(),
        }
    }

    /// Create a fragment carrying only metadata
    pub fn metadata_only() -> Self {
        Self::default()
    }

    /// Add a metadata entry
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Text used when combining: `text` if present, else the string form
    pub fn content(&self) -> Cow<'_, str> {
        match &self.text {
            Some(text) => Cow::Borrowed(text.as_str()),
            None => Cow::Owned(self.to_string()),
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = &self.text {
            return f.write_str(text);
        }
        for (i, (key, value)) in self.metadata.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match value {
                Value::String(s) => write!(f, "{}={}", key, s)?,
                other => write!(f, "{}={}", key, other)?,
            }
        }
        Ok(())
    }
}

/// Details about a video, when obtainable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub video_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Output of a content loader
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedContent {
    /// Strategy that produced this content
    pub source: SourceKind,
    /// Fragments in document order
    pub fragments: Vec<Fragment>,
    /// Video details (video sources only)
    pub video: Option<VideoDetails>,
}

impl LoadedContent {
    /// Content from a generic page
    pub fn generic(fragments: Vec<Fragment>) -> Self {
        Self {
            source: SourceKind::Generic,
            fragments,
            video: None,
        }
    }

    /// Content from a video
    pub fn video(fragments: Vec<Fragment>, details: Option<VideoDetails>) -> Self {
        Self {
            source: SourceKind::Video,
            fragments,
            video: details,
        }
    }
}

impl AsRef<[Fragment]> for LoadedContent {
    fn as_ref(&self) -> &[Fragment] {
        &self.fragments
    }
}

/// All fragments joined into one text blob
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedText {
    pub text: String,
}

/// Final summary of one URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Summary text from the model
    pub text: String,
    /// URL that was summarized
    pub url: String,
    /// Strategy used to load the content
    pub source: SourceKind,
    /// Model identifier
    pub model: String,
    /// Video title, when the source was a video and the title was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
