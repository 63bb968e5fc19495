//! SessionStore - single owner of session state
//!
//! All mutations go through the store. State sits behind one mutex so the
//! autosave task can snapshot it while the interaction loop keeps working;
//! file I/O happens outside that lock. A second lock orders writers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use super::error::SessionError;
use super::types::{ContentIdea, QaRecord, SessionDocument, SessionSummary, now_timestamp};
use crate::dedup;

#[derive(Debug, Default)]
struct SessionState {
    product_name: String,
    round_count: u32,
    qa_history: Vec<QaRecord>,
    content_ideas: Vec<ContentIdea>,
    last_saved: Option<DateTime<Local>>,
}

impl SessionState {
    fn to_document(&self) -> SessionDocument {
        SessionDocument {
            product_name: self.product_name.clone(),
            rounds: self.round_count,
            qa_history: self.qa_history.clone(),
            content_ideas: self.content_ideas.clone(),
            last_updated: Some(now_timestamp()),
        }
    }
}

/// Holds the session for one planning run and persists it to a JSON file
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    state: Mutex<SessionState>,
    /// Serializes writers of the session file
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Create an empty session persisted at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!(path = %path.display(), "SessionStore::new: called");
        Self {
            path,
            state: Mutex::new(SessionState::default()),
            write_lock: Mutex::new(()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Path of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn product_name(&self) -> String {
        self.state().product_name.clone()
    }

    pub fn round_count(&self) -> u32 {
        self.state().round_count
    }

    /// Time of the last successful save, if any
    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.state().last_saved
    }

    /// Set the product name
    pub fn set_product(&self, name: impl Into<String>) {
        let name = name.into();
        debug!(%name, "set_product: called");
        self.state().product_name = name;
    }

    /// Discard all history and ideas and start over for `name`
    pub fn reset(&self, name: impl Into<String>) {
        let name = name.into();
        info!(%name, "Resetting session");
        let mut state = self.state();
        let last_saved = state.last_saved;
        *state = SessionState {
            product_name: name,
            last_saved,
            ..Default::default()
        };
    }

    /// Record one round of answered questions
    ///
    /// Every pair in the batch gets the same, newly incremented round number,
    /// which is returned. Mismatched or empty batches are rejected and leave
    /// the session unchanged.
    pub fn add_qa_round<Q, A>(&self, questions: &[Q], answers: &[A]) -> Result<u32, SessionError>
    where
        Q: AsRef<str>,
        A: AsRef<str>,
    {
        debug!(questions = questions.len(), answers = answers.len(), "add_qa_round: called");
        if questions.len() != answers.len() || questions.is_empty() {
            debug!("add_qa_round: rejecting batch");
            return Err(SessionError::InputShape {
                questions: questions.len(),
                answers: answers.len(),
            });
        }

        let mut state = self.state();
        state.round_count += 1;
        let round = state.round_count;
        for (question, answer) in questions.iter().zip(answers) {
            state
                .qa_history
                .push(QaRecord::new(round, question.as_ref(), answer.as_ref()));
        }

        info!(round, pairs = questions.len(), "Recorded Q&A round");
        Ok(round)
    }

    /// Add content ideas, skipping blanks and duplicates
    ///
    /// Each candidate is checked against the collection as it grows, so two
    /// similar ideas in the same batch are also collapsed. Returns the ideas
    /// that were accepted, in input order.
    pub fn add_content_ideas<I>(&self, ideas: I) -> Vec<ContentIdea>
    where
        I: IntoIterator<Item = ContentIdea>,
    {
        debug!("add_content_ideas: called");
        let mut state = self.state();
        let mut accepted = Vec::new();

        for idea in ideas {
            let title = idea.title.trim();
            if title.is_empty() {
                debug!("add_content_ideas: skipping empty title");
                continue;
            }

            if dedup::is_duplicate(title, state.content_ideas.iter().map(|i| i.title.as_str())) {
                debug!(%title, "add_content_ideas: skipping duplicate");
                continue;
            }

            let idea = ContentIdea::new(title, idea.summary.trim());
            state.content_ideas.push(idea.clone());
            accepted.push(idea);
        }

        info!(
            accepted = accepted.len(),
            total = state.content_ideas.len(),
            "Added content ideas"
        );
        accepted
    }

    /// Full Q&A history in chronological order
    pub fn qa_context(&self) -> Vec<QaRecord> {
        self.state().qa_history.clone()
    }

    /// Content ideas in insertion order
    pub fn content_ideas(&self) -> Vec<ContentIdea> {
        self.state().content_ideas.clone()
    }

    /// Write the session to disk, reporting the cause on failure
    pub fn try_save(&self) -> Result<(), SessionError> {
        debug!(path = %self.path.display(), "try_save: called");
        // Snapshot under the write lock so files land in snapshot order
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let document = self.state().to_document();
        let content = serde_json::to_string_pretty(&document)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = temp_path(&self.path);
        fs::write(&tmp_path, content)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        self.state().last_saved = Some(Local::now());
        debug!("try_save: complete");
        Ok(())
    }

    /// Write the session to disk; failures are logged and reported as `false`
    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to save session");
                false
            }
        }
    }

    /// Replace in-memory state with the session file
    ///
    /// Returns `Ok(false)` when there is no file. On error the in-memory
    /// state is left as it was.
    pub fn try_load(&self) -> Result<bool, SessionError> {
        debug!(path = %self.path.display(), "try_load: called");
        if !self.path.exists() {
            debug!("try_load: no session file");
            return Ok(false);
        }

        let content = fs::read_to_string(&self.path)?;
        let document: SessionDocument = serde_json::from_str(&content)?;

        let mut state = self.state();
        state.product_name = document.product_name;
        state.round_count = document.rounds;
        state.qa_history = document.qa_history;
        state.content_ideas = document.content_ideas;

        info!(
            product = %state.product_name,
            rounds = state.round_count,
            "Loaded session"
        );
        Ok(true)
    }

    /// Load the session file; a missing or unreadable file yields `false`
    pub fn load(&self) -> bool {
        match self.try_load() {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to load session");
                false
            }
        }
    }

    /// Summarize the persisted session without touching in-memory state
    pub fn session_summary(&self) -> Option<SessionSummary> {
        debug!(path = %self.path.display(), "session_summary: called");
        if !self.path.exists() {
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "Failed to read session file");
                return None;
            }
        };

        match SessionSummary::from_json(&content) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(error = %e, "Failed to parse session summary");
                None
            }
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
