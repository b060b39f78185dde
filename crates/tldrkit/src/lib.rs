//! TLDRKit - summarize a web page or YouTube video with a hosted LLM
//!
//! A request (URL + API key) is validated, classified as video or
//! generic, loaded into ordered text fragments, combined into one text,
//! placed into a fixed prompt and sent to an OpenAI-compatible chat
//! completion endpoint (Groq by default).
//!
//! ## Loaders
//!
//! The [`ContentLoader`] holds one [`Fetcher`] per [`SourceKind`]:
//! - [`YouTubeFetcher`] - caption transcript plus video details
//! - [`WebPageFetcher`] - generic pages, one fragment per text block
//!
//! ## Example
//!
//! ```no_run
//! use tldrkit::{Request, Summarizer};
//!
//! # async fn run() -> Result<(), tldrkit::SummarizeError> {
//! let summarizer = Summarizer::builder().build();
//! let summary = summarizer
//!     .summarize(&Request::new("https://example.com", "gsk_..."))
//!     .await?;
//! println!("{}", summary.text);
//! # Ok(())
//! # }
//! ```

mod combine;
mod convert;
mod error;
pub mod fetchers;
pub mod llm;
mod prompt;
mod shell;
mod source;
mod summarizer;
mod types;
mod validate;

pub use combine::{combine, FRAGMENT_SEPARATOR};
pub use convert::{extract_blocks, BlockKind, HtmlDocument, TextBlock};
pub use error::{
    FetchError, InputError, ModelError, ParseError, SummarizeError, GENERIC_FAILURE_MESSAGE,
    INVALID_URL_MESSAGE, MISSING_INPUT_MESSAGE,
};
pub use fetchers::{
    CaptionTranscript, ContentLoader, Fetcher, LoadOptions, TlsPolicy, TranscriptSource,
    WebPageFetcher, YouTubeFetcher, YouTubeTranscripts, DEFAULT_FETCH_TIMEOUT, YOUTUBE_BASE_URL,
};
pub use llm::{ChatClient, DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_MODEL_TIMEOUT};
pub use prompt::{render_prompt, PROMPT_TEMPLATE};
pub use shell::{FailureStage, Phase, Shell, ShellState};
pub use source::{video_id, SourceKind};
pub use summarizer::{PipelineStatus, Summarizer, SummarizerBuilder};
pub use types::{
    CombinedText, Fragment, LoadedContent, Request, Summary, SummarizeInput, VideoDetails,
};
pub use validate::validate;

/// Desktop browser User-Agent sent with content fetches
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5_1) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

/// Tool description for LLM consumption
pub const TOOL_DESCRIPTION: &str = r#"Summarizes a web page or YouTube video in about 300 words.

- YouTube links use the caption transcript
- Other links use the page's visible text
- Returns the summary with the URL, source kind and model"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# TLDRKit Tool

Summarizes the content behind a URL in about 300 words using a hosted LLM.

## Capabilities
- YouTube videos (youtube.com, youtu.be, m.youtube.com): caption transcript
- Any other http/https page: visible text, one fragment per block
- Binary content (images, PDFs, archives) is rejected

## Input Parameters
- `url` (required): The URL to summarize (must be http:// or https://)

## Output Fields
- `text`: The summary
- `url`: The summarized URL
- `source`: "video" or "generic"
- `model`: Model identifier used
- `title`: Video title, when known

## Examples

### Summarize an article
```json
{"url": "https://example.com/blog/post"}
```

### Summarize a video
```json
{"url": "https://youtu.be/dQw4w9WgXcQ"}
```

## Error Handling
- Missing or malformed URLs are rejected before any network call
- Videos without captions fail with a transcript error
- Authentication and rate limit errors from the model are reported as such
"#;
