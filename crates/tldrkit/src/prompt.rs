//! Prompt rendering

use crate::types::CombinedText;

/// Placeholder replaced with the combined text
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Summarization instruction sent to the model
pub const PROMPT_TEMPLATE: &str = "
Provide summary of the following content in 300 words:
Content:{text}
";

/// Fill the template with the combined text
///
/// Substitutes exactly once, so placeholder-like text inside the content
/// is left alone.
pub fn render_prompt(content: &CombinedText) -> String {
    PROMPT_TEMPLATE.replacen(TEXT_PLACEHOLDER, &content.text, 1)
}

/// Cut text to at most `max_chars` characters, on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
