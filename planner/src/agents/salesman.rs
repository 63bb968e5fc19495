//! Salesman agent: answers customer questions from product knowledge

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::AnswerGenerator;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{PromptContext, PromptLoader};

const ANSWER_MAX_TOKENS: u32 = 512;

/// Knowledge text used when the context file is missing or empty
pub const NO_PRODUCT_CONTEXT: &str = "No specific product information available.";

/// Answer generator grounded in a product context file
pub struct SalesmanAgent {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    context_file: PathBuf,
    product_context: Option<String>,
}

impl SalesmanAgent {
    /// Create the agent, reading product knowledge from `context_file`
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, context_file: impl Into<PathBuf>) -> Self {
        let context_file = context_file.into();
        let product_context = load_context(&context_file);
        Self {
            llm,
            prompts,
            context_file,
            product_context,
        }
    }

    pub fn has_context(&self) -> bool {
        self.product_context.is_some()
    }
}

fn load_context(path: &Path) -> Option<String> {
    debug!(?path, "load_context: called");
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => {
            warn!(path = %path.display(), "Product context file is empty");
            None
        }
        Ok(content) => {
            info!(path = %path.display(), bytes = content.len(), "Loaded product context");
            Some(content)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not load product context");
            None
        }
    }
}

#[async_trait]
impl AnswerGenerator for SalesmanAgent {
    async fn answer(&self, question: &str, topic: &str) -> Option<String> {
        debug!(%question, %topic, "SalesmanAgent::answer: called");
        let knowledge = self.product_context.as_deref().unwrap_or(NO_PRODUCT_CONTEXT);

        let prompt = match self
            .prompts
            .render("salesman", &PromptContext::salesman(topic, knowledge, question))
        {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Failed to render salesman prompt");
                return None;
            }
        };

        match self.llm.complete(CompletionRequest::prompt(prompt, ANSWER_MAX_TOKENS)).await {
            Ok(response) => {
                let answer = response.text_or_empty().trim();
                (!answer.is_empty()).then(|| answer.to_string())
            }
            Err(e) => {
                warn!(error = %e, "Salesman answer failed");
                None
            }
        }
    }

    fn model(&self) -> &str {
        self.llm.model()
    }

    fn unavailable_reason(&self) -> Option<String> {
        (!self.has_context()).then(|| {
            format!(
                "No product context found at {}. Please create the file first.",
                self.context_file.display()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use tempfile::tempdir;

    fn loader() -> Arc<PromptLoader> {
        Arc::new(PromptLoader::embedded_only())
    }

    #[tokio::test]
    async fn test_answer_uses_product_context() {
        let temp = tempdir().unwrap();
        let context = temp.path().join("context.md");
        std::fs::write(&context, "# Buds\nBattery lasts 8 hours.").unwrap();

        let llm = Arc::new(MockLlmClient::new(vec!["  About 8 hours per charge.  "]));
        let agent = SalesmanAgent::new(llm.clone(), loader(), &context);

        assert!(agent.has_context());
        assert!(agent.unavailable_reason().is_none());
        let answer = agent.answer("How long does the battery last?", "Buds").await;
        assert_eq!(answer.as_deref(), Some("About 8 hours per charge."));
        assert!(llm.prompts()[0].contains("Battery lasts 8 hours."));
    }

    #[tokio::test]
    async fn test_missing_context_file() {
        let llm = Arc::new(MockLlmClient::new(vec!["Please contact support."]));
        let agent = SalesmanAgent::new(llm.clone(), loader(), "/nonexistent/context.md");

        assert!(!agent.has_context());
        let reason = agent.unavailable_reason().unwrap();
        assert!(reason.contains("/nonexistent/context.md"));

        agent.answer("Is it waterproof?", "Buds").await;
        assert!(llm.prompts()[0].contains(NO_PRODUCT_CONTEXT));
    }

    #[tokio::test]
    async fn test_blank_answer_is_none() {
        let llm = Arc::new(MockLlmClient::new(vec!["   "]));
        let agent = SalesmanAgent::new(llm, loader(), "/nonexistent/context.md");
        assert!(agent.answer("Anything?", "Buds").await.is_none());
    }

    #[tokio::test]
    async fn test_llm_failure_is_none() {
        let llm = Arc::new(MockLlmClient::new(Vec::<String>::new()));
        let agent = SalesmanAgent::new(llm, loader(), "/nonexistent/context.md");
        assert!(agent.answer("Anything?", "Buds").await.is_none());
    }
}
