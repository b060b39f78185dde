//! Completion envelope parsing

use crate::error::ParseError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Extract the first choice's text from a chat-completion body
pub fn parse_completion(body: &str) -> Result<String, ParseError> {
    let response: CompletionResponse = serde_json::from_str(body)?;

    let choice = response.choices.into_iter().next().ok_or(ParseError::NoChoices)?;
    let text = choice.message.content.unwrap_or_default();
    let text = text.trim();

    if text.is_empty() {
        return Err(ParseError::EmptyContent);
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "llama-3.1-8b-instant",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  A summary.\n"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "Another."}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        }"#;
        assert_eq!(parse_completion(body).unwrap(), "A summary.");
    }

    #[test]
    fn test_parse_completion_no_choices() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, ParseError::NoChoices));
    }

    #[test]
    fn test_parse_completion_empty_content() {
        let err =
            parse_completion(r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#)
                .unwrap_err();
        assert!(matches!(err, ParseError::EmptyContent));

        let err =
            parse_completion(r#"{"choices": [{"message": {"role": "assistant", "content": "  "}}]}"#)
                .unwrap_err();
        assert!(matches!(err, ParseError::EmptyContent));
    }

    #[test]
    fn test_parse_completion_malformed() {
        assert!(matches!(
            parse_completion("<html>Bad Gateway</html>").unwrap_err(),
            ParseError::Malformed(_)
        ));
        assert!(matches!(
            parse_completion(r#"{"result": "text"}"#).unwrap_err(),
            ParseError::Malformed(_)
        ));
    }
}
