//! LLM-backed generators
//!
//! The interaction loop only sees the traits below. Every generator treats
//! an unavailable or failing LLM as "nothing produced": errors are logged
//! here and never reach the caller.

use async_trait::async_trait;

use crate::session::{ContentIdea, QaRecord};

mod ai2ai;
mod customer;
mod salesman;
mod strategist;

pub use ai2ai::{Ai2AiEvent, Ai2AiFailure, Ai2AiRound, run_ai2ai_round};
pub use customer::{CustomerAgent, parse_questions};
pub use salesman::{NO_PRODUCT_CONTEXT, SalesmanAgent};
pub use strategist::{ContentStrategist, IdeaParser};

/// Produces customer questions about a product
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Generate the next batch of questions
    ///
    /// `context` is `None` (or empty) on the first round. An empty result
    /// means no questions could be produced.
    async fn generate_questions(&self, topic: &str, context: Option<&[QaRecord]>) -> Vec<String>;

    /// Model name shown while waiting
    fn model(&self) -> &str;
}

/// Produces content ideas from the Q&A gathered so far
#[async_trait]
pub trait IdeaGenerator: Send + Sync {
    /// Generate ideas, steering away from `existing`
    async fn generate_ideas(&self, topic: &str, context: &[QaRecord], existing: &[ContentIdea]) -> Vec<ContentIdea>;

    fn model(&self) -> &str;
}

/// Answers customer questions on behalf of the seller
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Answer one question; `None` when no answer could be produced
    async fn answer(&self, question: &str, topic: &str) -> Option<String>;

    fn model(&self) -> &str;

    /// Why this generator cannot be used right now, if it cannot
    fn unavailable_reason(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
pub mod mock {
    //! Scripted generators for interaction loop tests

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Returns queued batches in order, then empty
    #[derive(Default)]
    pub struct ScriptedQuestions {
        batches: Mutex<VecDeque<Vec<String>>>,
        contexts: Mutex<Vec<Option<usize>>>,
    }

    impl ScriptedQuestions {
        pub fn new(batches: Vec<Vec<&str>>) -> Self {
            Self {
                batches: Mutex::new(
                    batches
                        .into_iter()
                        .map(|b| b.into_iter().map(String::from).collect())
                        .collect(),
                ),
                contexts: Mutex::new(Vec::new()),
            }
        }

        /// History length seen by each call (`None` for first-round calls)
        pub fn contexts(&self) -> Vec<Option<usize>> {
            self.contexts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QuestionGenerator for ScriptedQuestions {
        async fn generate_questions(&self, _topic: &str, context: Option<&[QaRecord]>) -> Vec<String> {
            self.contexts.lock().unwrap().push(context.map(<[QaRecord]>::len));
            self.batches.lock().unwrap().pop_front().unwrap_or_default()
        }

        fn model(&self) -> &str {
            "scripted-questions"
        }
    }

    /// Returns queued idea batches in order, then empty
    #[derive(Default)]
    pub struct ScriptedIdeas {
        batches: Mutex<VecDeque<Vec<ContentIdea>>>,
    }

    impl ScriptedIdeas {
        pub fn new(batches: Vec<Vec<(&str, &str)>>) -> Self {
            Self {
                batches: Mutex::new(
                    batches
                        .into_iter()
                        .map(|b| b.into_iter().map(|(t, s)| ContentIdea::new(t, s)).collect())
                        .collect(),
                ),
            }
        }
    }

    #[async_trait]
    impl IdeaGenerator for ScriptedIdeas {
        async fn generate_ideas(&self, _topic: &str, _context: &[QaRecord], _existing: &[ContentIdea]) -> Vec<ContentIdea> {
            self.batches.lock().unwrap().pop_front().unwrap_or_default()
        }

        fn model(&self) -> &str {
            "scripted-ideas"
        }
    }

    /// Answers every question it has a canned reply for
    #[derive(Default)]
    pub struct ScriptedAnswers {
        pub replies: Vec<(String, String)>,
        pub unavailable: Option<String>,
    }

    impl ScriptedAnswers {
        pub fn new(replies: Vec<(&str, &str)>) -> Self {
            Self {
                replies: replies.into_iter().map(|(q, a)| (q.to_string(), a.to_string())).collect(),
                unavailable: None,
            }
        }
    }

    #[async_trait]
    impl AnswerGenerator for ScriptedAnswers {
        async fn answer(&self, question: &str, _topic: &str) -> Option<String> {
            self.replies.iter().find(|(q, _)| q == question).map(|(_, a)| a.clone())
        }

        fn model(&self) -> &str {
            "scripted-answers"
        }

        fn unavailable_reason(&self) -> Option<String> {
            self.unavailable.clone()
        }
    }
}
