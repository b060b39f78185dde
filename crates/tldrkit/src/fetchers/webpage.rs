//! Generic web page fetcher
//!
//! Handles every URL not classified as video. Presents a browser
//! User-Agent, converts HTML into one fragment per text block, and
//! passes other textual bodies through as a single fragment.

use crate::convert::{extract_blocks, is_html};
use crate::error::FetchError;
use crate::fetchers::{Fetcher, LoadOptions};
use crate::types::{Fragment, LoadedContent};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// Binary content type prefixes
const BINARY_PREFIXES: &[&str] = &[
    "image/",
    "audio/",
    "video/",
    "application/octet-stream",
    "application/pdf",
    "application/zip",
    "application/gzip",
    "application/x-tar",
    "application/x-rar",
    "application/x-7z",
    "application/vnd.ms-",
    "application/vnd.openxmlformats",
    "font/",
];

/// Body timeout (total)
const BODY_TIMEOUT: Duration = Duration::from_secs(30);

/// Generic web page fetcher
pub struct WebPageFetcher {
    body_timeout: Duration,
}

impl WebPageFetcher {
    /// Create a new web page fetcher
    pub fn new() -> Self {
        Self {
            body_timeout: BODY_TIMEOUT,
        }
    }

    /// Override the total body read timeout
    pub fn with_body_timeout(mut self, timeout: Duration) -> Self {
        self.body_timeout = timeout;
        self
    }
}

impl Default for WebPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for WebPageFetcher {
    fn name(&self) -> &'static str {
        "webpage"
    }

    async fn fetch(&self, url: &Url, options: &LoadOptions) -> Result<LoadedContent, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,text/plain;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = options.http_client(headers)?;

        let response = client
            .get(url.as_str())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if let Some(ref ct) = content_type {
            if is_binary_content_type(ct) {
                return Err(FetchError::UnsupportedContentType(ct.clone()));
            }
        }

        let (body, truncated) = read_body_with_timeout(response, self.body_timeout).await;
        let body = String::from_utf8_lossy(&body);
        debug!(url = %url, bytes = body.len(), truncated, "Fetched page body");

        let fragments = if is_html(content_type.as_deref(), &body) {
            html_fragments(url, &body)
        } else {
            text_fragments(url, &body, content_type.as_deref())
        };

        if fragments.is_empty() {
            return Err(FetchError::EmptyContent);
        }

        let fragments = if truncated {
            fragments
                .into_iter()
                .map(|f| f.with_meta("truncated", true))
                .collect()
        } else {
            fragments
        };

        Ok(LoadedContent::generic(fragments))
    }
}

/// One fragment per text block, tagged with its category
fn html_fragments(url: &Url, html: &str) -> Vec<Fragment> {
    let doc = extract_blocks(html);

    doc.blocks
        .into_iter()
        .map(|block| {
            let fragment = Fragment::new(block.text)
                .with_meta("source", url.as_str())
                .with_meta("category", block.kind.as_str());
            match &doc.title {
                Some(title) => fragment.with_meta("page_title", title.as_str()),
                None => fragment,
            }
        })
        .collect()
}

/// Non-HTML text as a single fragment
fn text_fragments(url: &Url, body: &str, content_type: Option<&str>) -> Vec<Fragment> {
    let text = body.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let fragment = Fragment::new(text).with_meta("source", url.as_str());
    let fragment = match content_type {
        Some(ct) => fragment.with_meta("content_type", ct),
        None => fragment,
    };
    vec![fragment]
}

/// Check if content type indicates binary content
fn is_binary_content_type(content_type: &str) -> bool {
    let ct_lower = content_type.to_lowercase();
    BINARY_PREFIXES
        .iter()
        .any(|prefix| ct_lower.starts_with(prefix))
}

/// Read response body with timeout, returning partial content if timeout occurs
async fn read_body_with_timeout(response: reqwest::Response, timeout: Duration) -> (Bytes, bool) {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        tokio::select! {
            chunk = stream.next() => {
                match chunk {
                    Some(Ok(bytes)) => body.extend_from_slice(&bytes),
                    Some(Err(e)) => {
                        error!("Error reading body chunk: {}", e);
                        let has_content = !body.is_empty();
                        return (Bytes::from(body), has_content);
                    }
                    None => return (Bytes::from(body), false),
                }
            }
            _ = tokio::time::sleep_until(deadline) => {
                warn!("Body timeout reached, returning partial content");
                return (Bytes::from(body), true);
            }
        }
    }
}
