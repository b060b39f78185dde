//! Error types for TLDRKit
//!
//! Each pipeline layer has its own error enum. [`SummarizeError`] unifies
//! them for callers that run the whole pipeline.

use thiserror::Error;

/// Message shown when a required input is empty
pub const MISSING_INPUT_MESSAGE: &str = "Please provide the information to get started";

/// Message shown when the URL does not parse
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid URL";

/// Message shown for any failure after validation
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while summarizing this URL. Please try again.";

/// Input problems detected locally, before any network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// API key is empty or whitespace
    #[error("Missing required input: API key")]
    MissingCredential,

    /// URL is empty or whitespace
    #[error("Missing required input: url")]
    MissingUrl,

    /// URL does not parse or cannot be fetched
    #[error("Invalid URL: {0}")]
    MalformedUrl(String),
}

impl InputError {
    /// True for the "missing information" family, false for an invalid URL
    pub fn is_missing(&self) -> bool {
        matches!(self, InputError::MissingCredential | InputError::MissingUrl)
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        if self.is_missing() {
            MISSING_INPUT_MESSAGE
        } else {
            INVALID_URL_MESSAGE
        }
    }
}

/// Errors that can occur while loading content from a URL
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Server refused access (401/403)
    #[error("Access denied: HTTP {0}")]
    AccessDenied(u16),

    /// Any other non-success status
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    /// Binary or otherwise non-textual content
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Page fetched but contains no text
    #[error("No textual content found at URL")]
    EmptyContent,

    /// Video URL without a recognizable video id
    #[error("Could not find a video id in URL")]
    MissingVideoId,

    /// Video has no usable captions
    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    /// Upstream payload did not have the expected shape
    #[error("Malformed upstream response: {0}")]
    MalformedPayload(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::ConnectError(err)
        } else {
            FetchError::RequestError(err.to_string())
        }
    }

    /// Map a non-success status code
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => FetchError::AccessDenied(status),
            _ => FetchError::HttpStatus(status),
        }
    }
}

/// Errors from the hosted model endpoint
#[derive(Debug, Error)]
pub enum ModelError {
    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Credential rejected
    #[error("Authentication failed: {message}")]
    Auth { status: u16, message: String },

    /// Rate limit or quota exhausted
    #[error("Quota exceeded: {message}")]
    Quota { message: String },

    /// Other non-success response
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network failure or timeout
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Errors extracting text from a completion envelope
#[derive(Debug, Error)]
pub enum ParseError {
    /// Body is not a chat-completion envelope
    #[error("Malformed completion response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Envelope has no choices
    #[error("Completion response has no choices")]
    NoChoices,

    /// First choice has no text
    #[error("Completion response has empty content")]
    EmptyContent,
}

/// Any failure of the summarization pipeline
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SummarizeError {
    /// Message suitable for showing to the user
    ///
    /// Input errors keep their specific message. Everything after
    /// validation collapses to one generic message.
    pub fn user_message(&self) -> &'static str {
        match self {
            SummarizeError::Input(err) => err.user_message(),
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}
