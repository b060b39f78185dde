//! Input validation
//!
//! Runs before anything touches the network.

use crate::error::InputError;
use url::Url;

/// Validate a credential and URL pair
///
/// Missing inputs are reported before syntax problems, credential first.
/// Returns the parsed URL when both inputs are usable.
pub fn validate(credential: &str, url: &str) -> Result<Url, InputError> {
    if credential.trim().is_empty() {
        return Err(InputError::MissingCredential);
    }

    let url = url.trim();
    if url.is_empty() {
        return Err(InputError::MissingUrl);
    }

    parse_url(url)
}

/// Parse a URL that the loaders can fetch: http(s) with a host
pub fn parse_url(url: &str) -> Result<Url, InputError> {
    let parsed = Url::parse(url.trim()).map_err(|e| InputError::MalformedUrl(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(InputError::MalformedUrl(format!(
            "unsupported scheme '{}', must be http or https",
            parsed.scheme()
        )));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(InputError::MalformedUrl("missing host".to_string())),
    }
}
