//! User interface boundary
//!
//! The interaction loop talks to the terminal only through [`Ui`]. Input
//! methods return `None` (or a quit choice) when the user interrupts with
//! Ctrl-C or closes stdin.

mod console;

pub use console::ConsoleUi;

use crate::session::{ContentIdea, SessionSummary};

/// What to do with a session found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeChoice {
    Resume,
    New,
    Quit,
}

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Answer AI-generated questions yourself
    User2Ai,
    /// Let the customer and salesman agents talk
    Ai2Ai,
    Save,
    Help,
    Quit,
}

impl MenuChoice {
    /// Parse a menu key (case-insensitive)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "u" => Some(Self::User2Ai),
            "a" => Some(Self::Ai2Ai),
            "s" => Some(Self::Save),
            "h" | "?" => Some(Self::Help),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

impl ResumeChoice {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "r" => Some(Self::Resume),
            "n" => Some(Self::New),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Severity of a one-line message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Success,
    Warning,
    Error,
}

/// Everything the interaction loop needs from a front end
pub trait Ui {
    /// Ask for a non-empty product name; `None` if interrupted
    fn product_name(&mut self) -> Option<String>;

    fn show_session_summary(&mut self, summary: &SessionSummary);

    fn resume_choice(&mut self, product_name: &str) -> ResumeChoice;

    fn main_menu(&mut self) -> MenuChoice;

    /// Ask each question in turn; an empty answer means skipped
    ///
    /// Returns one answer per question, or `None` if interrupted.
    fn collect_answers(&mut self, questions: &[String]) -> Option<Vec<String>>;

    fn show_ideas(&mut self, ideas: &[ContentIdea], round: u32);

    fn show_exchange(&mut self, index: usize, total: usize, question: &str, answer: Option<&str>);

    fn section(&mut self, title: &str);

    fn notice(&mut self, level: Notice, message: &str);

    /// Shown before a slow model call
    fn thinking(&mut self, activity: &str, model: &str);

    fn show_help(&mut self);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choice_from_key() {
        assert_eq!(MenuChoice::from_key("u"), Some(MenuChoice::User2Ai));
        assert_eq!(MenuChoice::from_key(" A "), Some(MenuChoice::Ai2Ai));
        assert_eq!(MenuChoice::from_key("s"), Some(MenuChoice::Save));
        assert_eq!(MenuChoice::from_key("?"), Some(MenuChoice::Help));
        assert_eq!(MenuChoice::from_key("Q"), Some(MenuChoice::Quit));
        assert_eq!(MenuChoice::from_key("x"), None);
        assert_eq!(MenuChoice::from_key(""), None);
    }

    #[test]
    fn test_resume_choice_from_key() {
        assert_eq!(ResumeChoice::from_key("r"), Some(ResumeChoice::Resume));
        assert_eq!(ResumeChoice::from_key("N"), Some(ResumeChoice::New));
        assert_eq!(ResumeChoice::from_key("q"), Some(ResumeChoice::Quit));
        assert_eq!(ResumeChoice::from_key("u"), None);
    }
}
