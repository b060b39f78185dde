//! Chat-completion client for OpenAI-compatible endpoints

use crate::error::ModelError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Groq's OpenAI-compatible API
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Timeout for a full completion round trip
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for one hosted model endpoint
pub struct ChatClient {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Error body returned by OpenAI-compatible APIs
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.into(),
            timeout: DEFAULT_MODEL_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send one completion request and return the raw response body
    ///
    /// No retries and no streaming: the whole body is awaited. Model
    /// certificates are always verified.
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        let client = Client::builder()
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(ModelError::ClientBuild)?;

        let body = ChatRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let resp = client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let message = error_message(&resp.text().await.unwrap_or_default());
            return Err(match status {
                401 | 403 => ModelError::Auth { status, message },
                429 => ModelError::Quota { message },
                _ => ModelError::Api { status, message },
            });
        }

        Ok(resp.text().await?)
    }
}

/// Reduce an error body to its message, or keep it verbatim
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_json() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        assert_eq!(error_message(body), "Invalid API Key");
    }

    #[test]
    fn test_error_message_verbatim() {
        assert_eq!(error_message("  upstream exploded \n"), "upstream exploded");
        assert_eq!(error_message(""), "");
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: DEFAULT_MODEL,
            messages: [ChatMessage {
                role: "user",
                content: "Summarize this",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Summarize this");
        assert!(json.get("stream").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ChatClient::new("key").with_base_url("http://localhost:8080/v1/");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }
}
