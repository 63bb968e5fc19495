//! Content strategist: turns Q&A insights into article ideas

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::IdeaGenerator;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{PromptContext, PromptLoader};
use crate::session::{ContentIdea, QaRecord};

const IDEA_MAX_TOKENS: u32 = 4096;

/// Longest summary kept verbatim; longer ones are cut with an ellipsis
const MAX_SUMMARY_CHARS: usize = 150;

/// Summary used when only a title could be salvaged
const FALLBACK_SUMMARY: &str = "Content article about this topic.";

/// Pulls `{"title": ..., "summary": ...}` objects out of free-form model output
pub struct IdeaParser {
    object_pattern: Regex,
    limit: usize,
}

impl IdeaParser {
    pub fn new(limit: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            object_pattern: Regex::new(r"\{[^}]+\}")?,
            limit,
        })
    }

    /// Parse every brace-delimited object, salvaging what it can
    ///
    /// Objects without a string `title` are skipped. Fragments that are not
    /// JSON but longer than ten characters become a title with a stock
    /// summary.
    pub fn parse(&self, response: &str) -> Vec<ContentIdea> {
        debug!(response_len = response.len(), limit = self.limit, "IdeaParser::parse: called");
        let mut ideas = Vec::new();

        for fragment in self.object_pattern.find_iter(response).map(|m| m.as_str()) {
            match serde_json::from_str::<Value>(fragment) {
                Ok(obj) => {
                    let Some(title) = obj.get("title").and_then(Value::as_str) else {
                        debug!(%fragment, "IdeaParser::parse: object without title");
                        continue;
                    };
                    let summary = obj.get("summary").and_then(Value::as_str).unwrap_or("");
                    ideas.push(ContentIdea::new(title.trim(), truncate_summary(summary).trim()));
                }
                Err(e) => {
                    let line = fragment.trim();
                    if line.chars().count() > 10 {
                        debug!(error = %e, "IdeaParser::parse: salvaging non-JSON fragment");
                        let title = line.trim_start_matches(|c: char| c.is_ascii_digit() || ".)- ".contains(c));
                        ideas.push(ContentIdea::new(title, FALLBACK_SUMMARY));
                    }
                }
            }
        }

        ideas.truncate(self.limit);
        ideas
    }
}

fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() > MAX_SUMMARY_CHARS {
        let head: String = summary.chars().take(MAX_SUMMARY_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        summary.to_string()
    }
}

/// Idea generator that plays an e-commerce content strategist
pub struct ContentStrategist {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    parser: IdeaParser,
}

impl ContentStrategist {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, ideas_per_round: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            llm,
            prompts,
            parser: IdeaParser::new(ideas_per_round)?,
        })
    }
}

#[async_trait]
impl IdeaGenerator for ContentStrategist {
    async fn generate_ideas(&self, topic: &str, context: &[QaRecord], existing: &[ContentIdea]) -> Vec<ContentIdea> {
        debug!(%topic, context_len = context.len(), existing_len = existing.len(), "ContentStrategist::generate_ideas: called");

        let ctx = PromptContext::ideas(topic, self.parser.limit, context, existing);
        let prompt = match self.prompts.render("ideas", &ctx) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Failed to render ideas prompt");
                return Vec::new();
            }
        };

        match self.llm.complete(CompletionRequest::prompt(prompt, IDEA_MAX_TOKENS)).await {
            Ok(response) => {
                let ideas = self.parser.parse(response.text_or_empty());
                info!(count = ideas.len(), "Content strategist generated ideas");
                ideas
            }
            Err(e) => {
                warn!(error = %e, "Idea generation failed");
                Vec::new()
            }
        }
    }

    fn model(&self) -> &str {
        self.llm.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;

    fn parser(limit: usize) -> IdeaParser {
        IdeaParser::new(limit).unwrap()
    }

    #[test]
    fn test_parse_json_lines() {
        let response = r#"Here are your ideas:
1. {"title": " How to Pick Running Buds ", "summary": "A buying guide."}
2. {"title": "Buds vs Wired Headphones", "summary": "Comparison for runners."}"#;

        let ideas = parser(10).parse(response);
        assert_eq!(
            ideas,
            vec![
                ContentIdea::new("How to Pick Running Buds", "A buying guide."),
                ContentIdea::new("Buds vs Wired Headphones", "Comparison for runners."),
            ]
        );
    }

    #[test]
    fn test_parse_truncates_long_summary() {
        let long = "x".repeat(200);
        let response = format!(r#"{{"title": "Long One", "summary": "{}"}}"#, long);
        let ideas = parser(10).parse(&response);

        assert_eq!(ideas[0].summary.chars().count(), 150);
        assert!(ideas[0].summary.ends_with("..."));
        assert_eq!(&ideas[0].summary[..147], &long[..147]);
    }

    #[test]
    fn test_parse_summary_at_limit_kept() {
        let exact = "y".repeat(150);
        let response = format!(r#"{{"title": "Exact", "summary": "{}"}}"#, exact);
        assert_eq!(parser(10).parse(&response)[0].summary, exact);
    }

    #[test]
    fn test_parse_missing_summary_and_title() {
        let response = r#"{"title": "No Summary Here"} {"summary": "orphan summary"}"#;
        assert_eq!(parser(10).parse(response), vec![ContentIdea::new("No Summary Here", "")]);
    }

    #[test]
    fn test_parse_salvages_non_json_fragment() {
        let response = "{title: Unquoted Idea Title}\n{bad}";
        let ideas = parser(10).parse(response);

        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title, "{title: Unquoted Idea Title}");
        assert_eq!(ideas[0].summary, FALLBACK_SUMMARY);
    }

    #[test]
    fn test_parse_caps_at_limit() {
        let response = (1..=5)
            .map(|i| format!(r#"{{"title": "Idea {}", "summary": ""}}"#, i))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parser(3).parse(&response).len(), 3);
    }

    #[test]
    fn test_parse_no_objects() {
        assert!(parser(10).parse("I could not think of anything.").is_empty());
    }

    #[tokio::test]
    async fn test_generate_ideas_passes_existing_titles() {
        let llm = Arc::new(MockLlmClient::new(vec![
            r#"{"title": "Five Reasons Runners Choose Buds", "summary": "Listicle."}"#,
        ]));
        let strategist = ContentStrategist::new(llm.clone(), Arc::new(PromptLoader::embedded_only()), 10).unwrap();

        let history = vec![QaRecord::new(1, "Is it waterproof?", "IPX7 rated")];
        let existing = vec![ContentIdea::new("Are Buds Waterproof?", "")];
        let ideas = strategist.generate_ideas("Buds", &history, &existing).await;

        assert_eq!(ideas.len(), 1);
        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("A: IPX7 rated"));
        assert!(prompt.contains("- Are Buds Waterproof?"));
    }

    #[tokio::test]
    async fn test_generate_ideas_failure_yields_empty() {
        let llm = Arc::new(MockLlmClient::new(Vec::<String>::new()));
        let strategist = ContentStrategist::new(llm, Arc::new(PromptLoader::embedded_only()), 10).unwrap();
        assert!(strategist.generate_ideas("Buds", &[], &[]).await.is_empty());
    }
}
