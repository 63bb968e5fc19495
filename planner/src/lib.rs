//! Content Planner - AI-guided Q&A for product content ideas
//!
//! An interactive session asks customer-style questions about a product,
//! collects answers (from the user, or from a salesman agent in AI2AI
//! mode) and turns the accumulated Q&A into deduplicated article ideas.
//! Progress is kept in a single JSON file that is saved in the background
//! while the session runs.
//!
//! # Modules
//!
//! - [`session`] - Session state, persistence and summaries
//! - [`dedup`] - Near-duplicate detection for idea titles
//! - [`autosave`] - Background periodic save
//! - [`planner`] - The interactive loop
//! - [`agents`] - Question, idea and answer generators
//! - [`llm`] - LLM client trait and OpenAI-compatible implementation
//! - [`prompts`] - Prompt templates
//! - [`ui`] - UI boundary and console front end
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod agents;
pub mod autosave;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use agents::{AnswerGenerator, ContentStrategist, CustomerAgent, IdeaGenerator, QuestionGenerator, SalesmanAgent};
pub use autosave::{AutosaveScheduler, SaveFn};
pub use config::{Config, LlmConfig, SessionConfig};
pub use dedup::is_duplicate;
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use planner::{ContentPlanner, Generators, RunOutcome};
pub use prompts::{PromptContext, PromptLoader};
pub use session::{ContentIdea, QaRecord, SessionError, SessionStore, SessionSummary};
pub use ui::{ConsoleUi, MenuChoice, Notice, ResumeChoice, Ui};
