//! Summarizer builder and pipeline

use crate::combine::combine;
use crate::error::SummarizeError;
use crate::fetchers::{ContentLoader, LoadOptions, TlsPolicy, WebPageFetcher, YouTubeFetcher};
use crate::llm::{parse_completion, ChatClient, DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_MODEL_TIMEOUT};
use crate::prompt::{render_prompt, truncate_chars};
use crate::source::SourceKind;
use crate::types::{CombinedText, Request, Summary, SummarizeInput};
use crate::validate::validate;
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Status update during a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStatus {
    /// Current phase ("validate", "load", "combine", "prompt", "model", "complete")
    pub phase: String,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PipelineStatus {
    /// Create a new status with phase
    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            message: None,
        }
    }

    /// Set message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Builder for configuring a [`Summarizer`]
#[derive(Debug, Clone)]
pub struct SummarizerBuilder {
    model: String,
    api_base: String,
    youtube_base: Option<String>,
    model_timeout: Duration,
    max_content_chars: Option<usize>,
    load: LoadOptions,
}

impl Default for SummarizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SummarizerBuilder {
    /// Create a builder with Groq defaults
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            youtube_base: None,
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            max_content_chars: None,
            load: LoadOptions::default(),
        }
    }

    /// Model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Base URL of the OpenAI-compatible API
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Origin for oEmbed lookups when video details are missing
    pub fn youtube_base(mut self, url: impl Into<String>) -> Self {
        self.youtube_base = Some(url.into());
        self
    }

    /// Custom User-Agent for content fetches
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.load.user_agent = Some(ua.into());
        self
    }

    /// Certificate policy for generic page fetches
    pub fn tls_policy(mut self, policy: TlsPolicy) -> Self {
        self.load.tls_policy = policy;
        self
    }

    /// Timeout for content fetches
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.load.timeout = timeout;
        self
    }

    /// Timeout for the model call
    pub fn model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    /// Preferred transcript languages, most preferred first
    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let languages: Vec<String> = languages.into_iter().map(Into::into).collect();
        if !languages.is_empty() {
            self.load.languages = languages;
        }
        self
    }

    /// Cap on combined text length, in characters
    pub fn max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = Some(max);
        self
    }

    /// Build the summarizer with the built-in loaders
    pub fn build(self) -> Summarizer {
        let youtube = match &self.youtube_base {
            Some(base) => YouTubeFetcher::new().with_base_url(base.as_str()),
            None => YouTubeFetcher::new(),
        };
        let loader = ContentLoader::new(Box::new(youtube), Box::new(WebPageFetcher::new()));
        self.build_with_loader(loader)
    }

    /// Build the summarizer with a custom loader
    pub fn build_with_loader(self, loader: ContentLoader) -> Summarizer {
        Summarizer {
            loader,
            model: self.model,
            api_base: self.api_base,
            model_timeout: self.model_timeout,
            max_content_chars: self.max_content_chars,
            load: self.load,
        }
    }
}

/// Configured summarization pipeline
pub struct Summarizer {
    loader: ContentLoader,
    model: String,
    api_base: String,
    model_timeout: Duration,
    max_content_chars: Option<usize>,
    load: LoadOptions,
}

impl Default for Summarizer {
    fn default() -> Self {
        SummarizerBuilder::new().build()
    }
}

impl Summarizer {
    /// Create a new summarizer builder
    pub fn builder() -> SummarizerBuilder {
        SummarizerBuilder::new()
    }

    /// Model identifier in use
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get input schema as JSON
    pub fn input_schema(&self) -> serde_json::Value {
        let schema = schema_for!(SummarizeInput);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Validate a request and run the whole pipeline
    pub async fn summarize(&self, request: &Request) -> Result<Summary, SummarizeError> {
        self.summarize_with_status(request, |_| {}).await
    }

    /// Validate a request and run the pipeline with status updates
    pub async fn summarize_with_status<F>(
        &self,
        request: &Request,
        mut status_callback: F,
    ) -> Result<Summary, SummarizeError>
    where
        F: FnMut(PipelineStatus),
    {
        status_callback(PipelineStatus::new("validate"));
        let url = validate(&request.credential, &request.url)?;
        self.run(&url, &request.credential, status_callback).await
    }

    /// Run the pipeline for an already validated URL
    pub async fn summarize_url(&self, url: &Url, credential: &str) -> Result<Summary, SummarizeError> {
        self.run(url, credential, |_| {}).await
    }

    async fn run<F>(
        &self,
        url: &Url,
        credential: &str,
        mut status_callback: F,
    ) -> Result<Summary, SummarizeError>
    where
        F: FnMut(PipelineStatus),
    {
        let source = SourceKind::of(url);
        info!(url = %url, source = %source, "Summarizing");

        status_callback(
            PipelineStatus::new("load").with_message(format!("Loading {} content", source)),
        );
        let content = self.loader.load(url, source, &self.load).await?;
        debug!(fragments = content.fragments.len(), "Content loaded");

        status_callback(PipelineStatus::new("combine"));
        let combined = self.limit(combine(&content));

        status_callback(PipelineStatus::new("prompt"));
        let prompt = render_prompt(&combined);
        debug!(chars = combined.text.chars().count(), "Prompt rendered");

        status_callback(
            PipelineStatus::new("model").with_message(format!("Waiting for {}", self.model)),
        );
        let client = ChatClient::new(credential.trim())
            .with_base_url(self.api_base.as_str())
            .with_timeout(self.model_timeout);
        let envelope = client.complete(&self.model, &prompt).await?;
        let text = parse_completion(&envelope)?;

        status_callback(PipelineStatus::new("complete"));
        info!(url = %url, chars = text.chars().count(), "Summary ready");

        Ok(Summary {
            text,
            url: url.to_string(),
            source,
            model: self.model.clone(),
            title: content.video.and_then(|v| v.title),
        })
    }

    fn limit(&self, combined: CombinedText) -> CombinedText {
        match self.max_content_chars {
            Some(max) => {
                let text = truncate_chars(&combined.text, max);
                if text.len() < combined.text.len() {
                    debug!(max, "Combined text truncated");
                }
                CombinedText {
                    text: text.to_string(),
                }
            }
            None => combined,
        }
    }
}
