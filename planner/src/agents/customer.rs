//! Customer agent: asks the questions a buyer would ask

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::QuestionGenerator;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{PromptContext, PromptLoader};
use crate::session::QaRecord;

const QUESTION_MAX_TOKENS: u32 = 1024;

/// Characters stripped from the front of each line (list numbering)
const NUMBERING_CHARS: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', ')', '-', ' '];

/// Lines this short are headings or noise, not questions
const MIN_QUESTION_CHARS: usize = 10;

/// Question generator that plays a prospective customer
pub struct CustomerAgent {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    max_questions: usize,
}

impl CustomerAgent {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_questions: usize) -> Self {
        Self {
            llm,
            prompts,
            max_questions,
        }
    }
}

#[async_trait]
impl QuestionGenerator for CustomerAgent {
    async fn generate_questions(&self, topic: &str, context: Option<&[QaRecord]>) -> Vec<String> {
        let history = context.unwrap_or_default();
        debug!(%topic, history_len = history.len(), "CustomerAgent::generate_questions: called");

        let template = if history.is_empty() {
            "questions-first"
        } else {
            "questions-followup"
        };
        let prompt = match self
            .prompts
            .render(template, &PromptContext::questions(topic, self.max_questions, history))
        {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Failed to render question prompt");
                return Vec::new();
            }
        };

        match self.llm.complete(CompletionRequest::prompt(prompt, QUESTION_MAX_TOKENS)).await {
            Ok(response) => {
                let questions = parse_questions(response.text_or_empty(), self.max_questions);
                info!(count = questions.len(), "Customer agent generated questions");
                questions
            }
            Err(e) => {
                warn!(error = %e, "Question generation failed");
                Vec::new()
            }
        }
    }

    fn model(&self) -> &str {
        self.llm.model()
    }
}

/// Extract questions from a numbered-list response
///
/// Strips list numbering, drops lines of ten characters or fewer and keeps
/// at most `max` questions.
pub fn parse_questions(response: &str, max: usize) -> Vec<String> {
    debug!(response_len = response.len(), %max, "parse_questions: called");
    response
        .lines()
        .map(|line| line.trim().trim_start_matches(NUMBERING_CHARS))
        .filter(|line| line.chars().count() > MIN_QUESTION_CHARS)
        .map(String::from)
        .take(max)
        .collect()
}
