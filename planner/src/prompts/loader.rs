//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::session::{ContentIdea, QaRecord};

/// One question/answer pair as rendered into a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
}

impl From<&QaRecord> for HistoryEntry {
    fn from(record: &QaRecord) -> Self {
        Self {
            question: record.question.clone(),
            answer: record.answer.clone(),
        }
    }
}

/// Context for rendering prompt templates
///
/// One shape serves every template; fields a template does not reference
/// are left empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromptContext {
    /// Product or topic under discussion
    pub product_name: String,
    /// Questions requested per round
    pub max_questions: usize,
    /// Ideas requested per round
    pub ideas_per_round: usize,
    /// Q&A history, oldest first
    pub history: Vec<HistoryEntry>,
    /// Titles the strategist must not repeat
    pub existing_titles: Vec<String>,
    /// Product knowledge handed to the salesman
    pub product_knowledge: String,
    /// Customer question the salesman answers
    pub question: String,
}

impl PromptContext {
    /// Context for the customer question templates
    pub fn questions(product_name: &str, max_questions: usize, history: &[QaRecord]) -> Self {
        debug!(%product_name, %max_questions, history_len = history.len(), "PromptContext::questions: called");
        Self {
            product_name: product_name.to_string(),
            max_questions,
            history: history.iter().map(HistoryEntry::from).collect(),
            ..Self::default()
        }
    }

    /// Context for the content strategist template
    pub fn ideas(product_name: &str, ideas_per_round: usize, history: &[QaRecord], existing: &[ContentIdea]) -> Self {
        debug!(%product_name, %ideas_per_round, existing_len = existing.len(), "PromptContext::ideas: called");
        Self {
            product_name: product_name.to_string(),
            ideas_per_round,
            history: history.iter().map(HistoryEntry::from).collect(),
            existing_titles: existing.iter().map(|i| i.title.clone()).collect(),
            ..Self::default()
        }
    }

    /// Context for the salesman template
    pub fn salesman(product_name: &str, product_knowledge: &str, question: &str) -> Self {
        debug!(%product_name, "PromptContext::salesman: called");
        Self {
            product_name: product_name.to_string(),
            product_knowledge: product_knowledge.to_string(),
            question: question.to_string(),
            ..Self::default()
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.content-planner/prompts/`)
    user_dir: Option<PathBuf>,
    /// Repo default directory (e.g., `prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at `base`
    ///
    /// Looks for `.content-planner/prompts/` and `prompts/` under `base`.
    pub fn new(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        debug!(?base, "PromptLoader::new: called");
        let user_dir = base.join(".content-planner/prompts");
        let repo_dir = base.join("prompts");

        let user_dir_exists = user_dir.exists();
        let repo_dir_exists = repo_dir.exists();
        debug!(
            ?user_dir,
            %user_dir_exists,
            ?repo_dir,
            %repo_dir_exists,
            "PromptLoader::new: checking directories"
        );

        Self {
            hbs: Self::engine(),
            user_dir: user_dir_exists.then_some(user_dir),
            repo_dir: repo_dir_exists.then_some(repo_dir),
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
            repo_dir: None,
        }
    }

    // Prompts are plain text; HTML escaping would mangle quotes in product names
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.content-planner/prompts/{name}.pmt`
    /// 2. Repo default: `prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        for dir in [&self.user_dir, &self.repo_dir].into_iter().flatten() {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found on disk");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, product_name = %context.product_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}'", template_name);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}
