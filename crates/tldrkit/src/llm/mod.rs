//! Hosted model access
//!
//! [`ChatClient`] sends one chat-completion request and returns the raw
//! envelope; [`parse_completion`] extracts the text from it.

pub mod client;
pub mod parser;

pub use client::{ChatClient, DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_MODEL_TIMEOUT};
pub use parser::parse_completion;
