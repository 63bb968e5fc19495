//! LLM request/response types
//!
//! Every generator call is a single rendered prompt in and one text
//! completion out.

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Rendered prompt, sent as the only user message
    pub prompt: String,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn prompt(text: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: text.into(),
            max_tokens,
        }
    }
}

/// Response from a completion request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Response text, or an empty string if the model returned none
    pub fn text_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_request() {
        let request = CompletionRequest::prompt("Generate questions", 500);
        assert_eq!(request.prompt, "Generate questions");
        assert_eq!(request.max_tokens, 500);
    }

    #[test]
    fn test_text_or_empty() {
        let response = CompletionResponse {
            content: Some("hi".to_string()),
        };
        assert_eq!(response.text_or_empty(), "hi");
        assert_eq!(CompletionResponse::default().text_or_empty(), "");
    }
}
