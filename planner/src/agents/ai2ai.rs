//! AI2AI round: the customer agent asks, the salesman agent answers

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{AnswerGenerator, QuestionGenerator};
use crate::session::QaRecord;

/// Why an AI2AI round produced nothing to store
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Ai2AiFailure {
    #[error("Salesman agent is not ready: {0}")]
    SalesmanUnavailable(String),

    #[error("Customer agent could not generate questions")]
    NoQuestions,

    #[error("Salesman agent could not answer any question")]
    NoAnswers,
}

/// Progress reported while a round runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ai2AiEvent<'a> {
    /// An agent is waiting on the model
    Thinking { agent: &'static str, model: &'a str },
    /// One question and its answer (if any)
    Exchange {
        index: usize,
        total: usize,
        question: &'a str,
        answer: Option<&'a str>,
    },
}

/// Questions and answers from one completed round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ai2AiRound {
    pub questions: Vec<String>,
    pub answers: Vec<String>,
    /// Questions the salesman could not answer
    pub unanswered: usize,
}

/// Run one round and collect the answered pairs
///
/// Unanswered questions are dropped from the result. The caller stores the
/// pairs; nothing here touches the session.
pub async fn run_ai2ai_round<F>(
    customer: &dyn QuestionGenerator,
    salesman: &dyn AnswerGenerator,
    topic: &str,
    context: &[QaRecord],
    mut on_event: F,
) -> Result<Ai2AiRound, Ai2AiFailure>
where
    F: FnMut(Ai2AiEvent<'_>),
{
    debug!(%topic, context_len = context.len(), "run_ai2ai_round: called");
    if let Some(reason) = salesman.unavailable_reason() {
        warn!(%reason, "AI2AI round refused");
        return Err(Ai2AiFailure::SalesmanUnavailable(reason));
    }

    on_event(Ai2AiEvent::Thinking {
        agent: "Customer",
        model: customer.model(),
    });
    let context = (!context.is_empty()).then_some(context);
    let questions = customer.generate_questions(topic, context).await;
    if questions.is_empty() {
        return Err(Ai2AiFailure::NoQuestions);
    }
    info!(count = questions.len(), "AI2AI customer asked questions");

    let total = questions.len();
    let mut round = Ai2AiRound::default();
    for (i, question) in questions.into_iter().enumerate() {
        on_event(Ai2AiEvent::Thinking {
            agent: "Salesman",
            model: salesman.model(),
        });
        let answer = salesman.answer(&question, topic).await;
        on_event(Ai2AiEvent::Exchange {
            index: i + 1,
            total,
            question: &question,
            answer: answer.as_deref(),
        });

        match answer {
            Some(answer) => {
                round.questions.push(question);
                round.answers.push(answer);
            }
            None => round.unanswered += 1,
        }
    }

    if round.questions.is_empty() {
        return Err(Ai2AiFailure::NoAnswers);
    }
    info!(
        answered = round.questions.len(),
        unanswered = round.unanswered,
        "AI2AI round complete"
    );
    Ok(round)
}
