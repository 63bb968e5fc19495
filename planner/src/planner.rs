//! Interaction loop
//!
//! Drives one planning run: pick or resume a session, then loop over the
//! main menu, feeding generator output into the session store. Autosave
//! runs for the whole loop and a final save always follows it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::agents::{Ai2AiEvent, AnswerGenerator, IdeaGenerator, QuestionGenerator, run_ai2ai_round};
use crate::autosave::AutosaveScheduler;
use crate::session::SessionStore;
use crate::ui::{MenuChoice, Notice, ResumeChoice, Ui};

/// Bounded wait for the autosave task on exit
const AUTOSAVE_STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Whether the loop keeps going after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The user left before a session was chosen; nothing was written
    Abandoned,
    /// The loop ran; `saved` reports the final save
    Finished { saved: bool },
}

/// The generators a planner run uses
pub struct Generators {
    pub questions: Arc<dyn QuestionGenerator>,
    pub ideas: Arc<dyn IdeaGenerator>,
    pub answers: Arc<dyn AnswerGenerator>,
}

/// Orchestrates a planning run over an injected UI and generators
pub struct ContentPlanner<U: Ui> {
    store: Arc<SessionStore>,
    generators: Generators,
    ui: U,
    autosave_interval: Duration,
    llm_ready: bool,
}

impl<U: Ui> ContentPlanner<U> {
    pub fn new(store: Arc<SessionStore>, generators: Generators, ui: U, autosave_interval: Duration) -> Self {
        Self {
            store,
            generators,
            ui,
            autosave_interval,
            llm_ready: true,
        }
    }

    /// Record that no API key is configured so the user is told up front
    pub fn with_llm_ready(mut self, ready: bool) -> Self {
        self.llm_ready = ready;
        self
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Run the session until the user quits
    pub async fn run(&mut self) -> RunOutcome {
        info!("Starting content planner session");

        if !self.llm_ready {
            warn!("LLM API is not configured");
            self.ui.notice(
                Notice::Error,
                "LLM API is not configured. Set OLLAMA_API_KEY (or add it to .env) to generate questions and ideas.",
            );
            self.ui.show_help();
        }

        if !self.choose_session() {
            return RunOutcome::Abandoned;
        }

        let mut autosave = AutosaveScheduler::new();
        let store = Arc::clone(&self.store);
        autosave.start(self.autosave_interval, Arc::new(move || store.save()));

        self.interaction_loop().await;

        info!("Stopping autosave and saving final state");
        autosave.stop(AUTOSAVE_STOP_TIMEOUT).await;
        let saved = self.store.save();
        let path = self.store.path().display().to_string();
        if saved {
            info!(%path, "Session saved");
            self.ui.notice(Notice::Success, &format!("Session saved to {}", path));
        } else {
            warn!(%path, "Final save failed");
            self.ui.notice(Notice::Error, "Failed to save session");
        }
        RunOutcome::Finished { saved }
    }

    /// Resume the session on disk or start a new one; false if the user left
    fn choose_session(&mut self) -> bool {
        debug!("choose_session: called");
        let summary = self.store.session_summary().filter(|s| s.is_resumable());

        let Some(summary) = summary else {
            info!("No existing session found, starting new session");
            return self.start_new_session();
        };

        self.ui.show_session_summary(&summary);
        match self.ui.resume_choice(&summary.product_name) {
            ResumeChoice::Quit => {
                info!("User chose to quit");
                self.ui.notice(Notice::Info, "Goodbye!");
                false
            }
            ResumeChoice::Resume => {
                if self.store.load() {
                    let product = self.store.product_name();
                    info!(%product, "Session loaded");
                    self.ui.notice(Notice::Success, &format!("Session loaded: {}", product));
                    self.ui
                        .notice(Notice::Info, &format!("Continuing from Round {}", self.store.round_count()));
                    true
                } else {
                    warn!("Failed to load existing session");
                    self.ui.notice(Notice::Error, "Failed to load session. Starting new session.");
                    self.start_new_session()
                }
            }
            ResumeChoice::New => {
                info!("User chose to start new session");
                self.start_new_session()
            }
        }
    }

    fn start_new_session(&mut self) -> bool {
        let Some(name) = self.ui.product_name() else {
            return false;
        };
        info!(product = %name, "Started new session");
        self.store.reset(name);
        true
    }

    async fn interaction_loop(&mut self) {
        loop {
            let choice = self.ui.main_menu();
            info!(?choice, "User selected menu option");
            let flow = match choice {
                MenuChoice::Quit => Flow::Quit,
                MenuChoice::Save => {
                    self.save_now();
                    Flow::Continue
                }
                MenuChoice::Help => {
                    self.ui.show_help();
                    Flow::Continue
                }
                MenuChoice::User2Ai => self.user2ai_round().await,
                MenuChoice::Ai2Ai => self.ai2ai_round().await,
            };
            if flow == Flow::Quit {
                break;
            }
        }
    }

    fn save_now(&mut self) {
        if self.store.save() {
            let path = self.store.path().display().to_string();
            self.ui.notice(Notice::Success, &format!("Progress saved! ({})", path));
        } else {
            self.ui.notice(Notice::Error, "Failed to save progress");
        }
    }

    async fn user2ai_round(&mut self) -> Flow {
        debug!("user2ai_round: called");
        let product = self.store.product_name();
        let context = self.store.qa_context();
        let context = (!context.is_empty()).then_some(context.as_slice());

        self.ui
            .thinking("AI is generating questions", self.generators.questions.model());
        let Some(questions) = interruptible(self.generators.questions.generate_questions(&product, context)).await
        else {
            return Flow::Quit;
        };

        if questions.is_empty() {
            warn!("Failed to generate questions");
            self.ui.notice(
                Notice::Error,
                "Could not generate questions. Please check API configuration.",
            );
            self.ui.show_help();
            return Flow::Continue;
        }
        info!(count = questions.len(), "Generated questions");

        let Some(answers) = self.ui.collect_answers(&questions) else {
            return Flow::Quit;
        };

        let (asked, answered): (Vec<&str>, Vec<&str>) = questions
            .iter()
            .zip(&answers)
            .map(|(q, a)| (q.as_str(), a.trim()))
            .filter(|(_, a)| !a.is_empty())
            .unzip();

        if asked.is_empty() {
            warn!("All questions were skipped");
            self.ui.notice(
                Notice::Warning,
                "All questions were skipped. Please answer at least one question.",
            );
            return Flow::Continue;
        }
        info!(answered = asked.len(), asked = questions.len(), "User answered questions");

        if let Err(e) = self.store.add_qa_round(&asked, &answered) {
            warn!(error = %e, "Failed to record round");
            self.ui.notice(Notice::Error, &format!("Could not record answers: {}", e));
            return Flow::Continue;
        }

        self.generate_ideas().await
    }

    async fn ai2ai_round(&mut self) -> Flow {
        debug!("ai2ai_round: called");
        let product = self.store.product_name();
        let context = self.store.qa_context();
        self.ui
            .section(&format!("AI2AI Round {}", self.store.round_count() + 1));

        let ui = &mut self.ui;
        let round = run_ai2ai_round(
            self.generators.questions.as_ref(),
            self.generators.answers.as_ref(),
            &product,
            &context,
            |event| match event {
                Ai2AiEvent::Thinking { agent, model } => ui.thinking(&format!("{} AI is thinking", agent), model),
                Ai2AiEvent::Exchange {
                    index,
                    total,
                    question,
                    answer,
                } => ui.show_exchange(index, total, question, answer),
            },
        );
        let Some(round) = interruptible(round).await else {
            return Flow::Quit;
        };

        let round = match round {
            Ok(round) => round,
            Err(failure) => {
                warn!(%failure, "AI2AI round failed");
                self.ui.notice(Notice::Error, &failure.to_string());
                self.ui
                    .notice(Notice::Error, "AI2AI round failed. Please check configuration.");
                return Flow::Continue;
            }
        };

        if let Err(e) = self.store.add_qa_round(&round.questions, &round.answers) {
            warn!(error = %e, "Failed to record AI2AI round");
            self.ui.notice(Notice::Error, &format!("Could not record answers: {}", e));
            return Flow::Continue;
        }
        info!(pairs = round.questions.len(), "Stored AI2AI Q&A pairs");

        self.generate_ideas().await
    }

    async fn generate_ideas(&mut self) -> Flow {
        debug!("generate_ideas: called");
        let product = self.store.product_name();
        let context = self.store.qa_context();
        let existing = self.store.content_ideas();

        self.ui
            .thinking("AI is generating content ideas", self.generators.ideas.model());
        let Some(generated) =
            interruptible(self.generators.ideas.generate_ideas(&product, &context, &existing)).await
        else {
            return Flow::Quit;
        };

        if generated.is_empty() {
            warn!("Failed to generate content ideas");
            self.ui.notice(Notice::Warning, "Could not generate content ideas.");
            return Flow::Continue;
        }

        let offered = generated.len();
        let accepted = self.store.add_content_ideas(generated);
        info!(offered, accepted = accepted.len(), "Generated content ideas");
        self.ui.show_ideas(&accepted, self.store.round_count());
        if accepted.len() < offered {
            self.ui.notice(
                Notice::Info,
                &format!("Skipped {} duplicate idea(s)", offered - accepted.len()),
            );
        }
        Flow::Continue
    }
}

/// Await `fut` unless Ctrl-C arrives first
async fn interruptible<F: Future>(fut: F) -> Option<F::Output> {
    tokio::select! {
        output = fut => Some(output),
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted while waiting on the model");
            None
        }
    }
}
