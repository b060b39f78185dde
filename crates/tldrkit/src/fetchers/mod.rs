//! Content loading strategies
//!
//! Design: a request is classified once into a [`SourceKind`]. The
//! [`ContentLoader`] holds exactly one [`Fetcher`] per kind and dispatches
//! on that tag, so no URL is ever inspected twice to pick a strategy.

mod webpage;
mod youtube;

pub use webpage::WebPageFetcher;
pub use youtube::{
    CaptionTranscript, TranscriptSource, YouTubeFetcher, YouTubeTranscripts, YOUTUBE_BASE_URL,
};

use crate::error::FetchError;
use crate::source::SourceKind;
use crate::types::LoadedContent;
use crate::BROWSER_USER_AGENT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Default connect + request timeout for content fetches
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Certificate handling for outgoing fetches
///
/// `AcceptInvalid` keeps misconfigured sites reachable. It is a
/// compatibility policy, not a security guarantee: certificates are not
/// verified at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsPolicy {
    /// Accept any certificate, including self-signed and expired ones
    #[default]
    AcceptInvalid,
    /// Verify certificates against the system roots
    Verify,
}

/// Options shared by all fetchers
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Custom User-Agent (defaults to a desktop browser string)
    pub user_agent: Option<String>,
    /// Certificate policy
    pub tls_policy: TlsPolicy,
    /// Connect + request timeout
    pub timeout: Duration,
    /// Preferred transcript languages, most preferred first
    pub languages: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            tls_policy: TlsPolicy::default(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            languages: vec!["en".to_string()],
        }
    }
}

impl LoadOptions {
    /// Effective User-Agent header value
    pub fn user_agent_header(&self) -> HeaderValue {
        let ua = self.user_agent.as_deref().unwrap_or(BROWSER_USER_AGENT);
        HeaderValue::from_str(ua).unwrap_or_else(|_| HeaderValue::from_static(BROWSER_USER_AGENT))
    }

    /// Build an HTTP client honoring the timeout and TLS policy
    pub(crate) fn http_client(&self, mut headers: HeaderMap) -> Result<reqwest::Client, FetchError> {
        headers.insert(USER_AGENT, self.user_agent_header());

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(self.timeout)
            .timeout(self.timeout);

        if self.tls_policy == TlsPolicy::AcceptInvalid {
            warn!("TLS certificate verification disabled for content fetch");
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(FetchError::ClientBuildError)
    }
}

/// One content loading strategy
///
/// Implement this trait to plug a different loader into a
/// [`ContentLoader`], for example in tests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Load the URL into ordered fragments
    async fn fetch(&self, url: &Url, options: &LoadOptions) -> Result<LoadedContent, FetchError>;
}

/// Dispatches a classified URL to its fetcher
pub struct ContentLoader {
    video: Box<dyn Fetcher>,
    generic: Box<dyn Fetcher>,
}

impl Default for ContentLoader {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ContentLoader {
    /// Create a loader from explicit strategies
    pub fn new(video: Box<dyn Fetcher>, generic: Box<dyn Fetcher>) -> Self {
        Self { video, generic }
    }

    /// Create a loader with the built-in YouTube and web page fetchers
    pub fn with_defaults() -> Self {
        Self::new(
            Box::new(YouTubeFetcher::new()),
            Box::new(WebPageFetcher::new()),
        )
    }

    /// Fetcher responsible for a source kind
    pub fn fetcher(&self, kind: SourceKind) -> &dyn Fetcher {
        match kind {
            SourceKind::Video => self.video.as_ref(),
            SourceKind::Generic => self.generic.as_ref(),
        }
    }

    /// Load a URL with the strategy for `kind`
    pub async fn load(
        &self,
        url: &Url,
        kind: SourceKind,
        options: &LoadOptions,
    ) -> Result<LoadedContent, FetchError> {
        let fetcher = self.fetcher(kind);
        tracing::debug!(fetcher = fetcher.name(), source = %kind, url = %url, "Using fetcher");
        fetcher
            .fetch(url, options)
            .await
            .inspect_err(|e| tracing::error!(error = %e, url = %url, "Failed to load content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_with_defaults() {
        let loader = ContentLoader::with_defaults();
        assert_eq!(loader.fetcher(SourceKind::Video).name(), "youtube");
        assert_eq!(loader.fetcher(SourceKind::Generic).name(), "webpage");
    }

    #[test]
    fn test_load_options_default() {
        let options = LoadOptions::default();
        assert!(options.user_agent.is_none());
        assert_eq!(options.tls_policy, TlsPolicy::AcceptInvalid);
        assert_eq!(options.timeout, DEFAULT_FETCH_TIMEOUT);
        assert_eq!(options.languages, vec!["en"]);
    }

    #[test]
    fn test_user_agent_header() {
        let options = LoadOptions::default();
        assert_eq!(options.user_agent_header(), BROWSER_USER_AGENT);

        let options = LoadOptions {
            user_agent: Some("TestAgent/1.0".to_string()),
            ..Default::default()
        };
        assert_eq!(options.user_agent_header(), "TestAgent/1.0");

        // Invalid header values fall back to the browser string
        let options = LoadOptions {
            user_agent: Some("bad\nagent".to_string()),
            ..Default::default()
        };
        assert_eq!(options.user_agent_header(), BROWSER_USER_AGENT);
    }

    #[test]
    fn test_http_client_builds_for_both_policies() {
        for policy in [TlsPolicy::AcceptInvalid, TlsPolicy::Verify] {
            let options = LoadOptions {
                tls_policy: policy,
                ..Default::default()
            };
            assert!(options.http_client(HeaderMap::new()).is_ok());
        }
    }
}
