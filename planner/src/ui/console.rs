//! Terminal front end built on rustyline and colored

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use super::{MenuChoice, Notice, ResumeChoice, Ui};
use crate::session::{ContentIdea, SessionSummary};

const RULE_WIDTH: usize = 70;

/// Interactive console UI
pub struct ConsoleUi {
    editor: DefaultEditor,
    autosave_secs: u64,
    max_questions: usize,
}

impl ConsoleUi {
    pub fn new(autosave_secs: u64, max_questions: usize) -> eyre::Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self {
            editor,
            autosave_secs,
            max_questions,
        })
    }

    /// Read one line; `None` on Ctrl-C, Ctrl-D or a terminal error
    fn read_line(&mut self, prompt: &str, allow_empty: bool) -> Option<String> {
        let prompt = format!("{}: ", prompt);
        loop {
            // rustyline blocks the thread; let the runtime move other tasks off it
            let readline = tokio::task::block_in_place(|| self.editor.readline(&prompt));
            match readline {
                Ok(line) => {
                    let input = line.trim().to_string();
                    if !input.is_empty() {
                        let _ = self.editor.add_history_entry(&input);
                    }
                    if !input.is_empty() || allow_empty {
                        return Some(input);
                    }
                    println!("{}", "Input cannot be empty. Please try again.".dimmed());
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    debug!("ConsoleUi::read_line: interrupted");
                    println!();
                    return None;
                }
                Err(err) => {
                    warn!(error = %err, "Readline error");
                    return None;
                }
            }
        }
    }

    fn header(&self, text: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        println!("\n{}", rule.cyan().bold());
        println!("  {}", text.cyan().bold());
        println!("{}\n", rule.cyan().bold());
    }

    fn menu_option(&self, key: &str, description: &str) {
        println!("  {} {}", format!("[{}]", key).cyan().bold(), description);
    }
}

impl Ui for ConsoleUi {
    fn product_name(&mut self) -> Option<String> {
        self.header("Content Planner - Product Input");
        self.read_line("Enter product name", false)
    }

    fn show_session_summary(&mut self, summary: &SessionSummary) {
        self.section("Existing Session Found");
        println!("{} {}", "Product/Topic:".bold(), summary.product_name.cyan());
        println!("{} {}", "Rounds Completed:".bold(), summary.rounds);
        println!("{} {}", "Q&A Pairs:".bold(), summary.qa_count);
        println!("{} {}", "Content Ideas:".bold(), summary.ideas_count);
        println!("{} {}", "Last Updated:".bold(), summary.last_updated.dimmed());
        println!();
    }

    fn resume_choice(&mut self, product_name: &str) -> ResumeChoice {
        self.menu_option("r", &format!("Resume session for '{}'", product_name));
        self.menu_option("n", "Start a new session");
        self.menu_option("q", "Quit");
        loop {
            let Some(input) = self.read_line("Your choice (r/n/q)", true) else {
                return ResumeChoice::Quit;
            };
            if let Some(choice) = ResumeChoice::from_key(&input) {
                return choice;
            }
            if !input.is_empty() {
                self.notice(Notice::Error, "Invalid choice. Please enter 'r', 'n', or 'q'.");
            }
        }
    }

    fn main_menu(&mut self) -> MenuChoice {
        let rule = "=".repeat(RULE_WIDTH);
        println!("\n{}", rule.cyan().bold());
        println!(
            "{}",
            "Options: [u] User2AI Mode, [a] AI2AI Mode, [s] Save, [h] Help, [q] Quit"
                .cyan()
                .bold()
        );
        println!("{}", rule.cyan().bold());
        loop {
            let Some(input) = self.read_line("Your choice (u/a/s/h/q)", true) else {
                return MenuChoice::Quit;
            };
            if let Some(choice) = MenuChoice::from_key(&input) {
                return choice;
            }
            if !input.is_empty() {
                self.notice(Notice::Error, "Invalid choice. Please enter 'u', 'a', 's', 'h', or 'q'.");
            }
        }
    }

    fn collect_answers(&mut self, questions: &[String]) -> Option<Vec<String>> {
        self.section("Questions & Answers");
        println!("{}\n", "Tip: Press Enter without typing to skip a question".dimmed());

        let mut answers = Vec::with_capacity(questions.len());
        for (i, question) in questions.iter().enumerate() {
            println!("\n{}", format!("[{}/{}] {}", i + 1, questions.len(), question).yellow().bold());
            let answer = self.read_line("Your answer", true)?;
            if answer.is_empty() {
                println!("{}", "  Skipped".dimmed());
            }
            answers.push(answer);
        }
        Some(answers)
    }

    fn show_ideas(&mut self, ideas: &[ContentIdea], round: u32) {
        self.section(&format!("Content Ideas (Round {})", round));
        if ideas.is_empty() {
            self.notice(Notice::Warning, "No content ideas generated.");
            return;
        }
        for (i, idea) in ideas.iter().enumerate() {
            println!("\n  {}", format!("{}. {}", i + 1, idea.title).bright_white().bold());
            if !idea.summary.is_empty() {
                println!("     {}", format!("-> {}", idea.summary).dimmed());
            }
        }
    }

    fn show_exchange(&mut self, index: usize, total: usize, question: &str, answer: Option<&str>) {
        println!("\n{}", format!("[{}/{}] {}", index, total, question).yellow().bold());
        match answer {
            Some(answer) => self.notice(Notice::Info, &format!("Salesman: {}\n", answer)),
            None => self.notice(Notice::Warning, "Salesman could not answer this question."),
        }
    }

    fn section(&mut self, title: &str) {
        let rule = "-".repeat(RULE_WIDTH);
        println!("\n{}", rule.blue().bold());
        println!("  {}", title.blue().bold());
        println!("{}\n", rule.blue().bold());
    }

    fn notice(&mut self, level: Notice, message: &str) {
        match level {
            Notice::Info => println!("{}", format!("i  {}", message).bright_blue()),
            Notice::Success => println!("{}", format!("✓ {}", message).bright_green().bold()),
            Notice::Warning => println!("{}", format!("!  {}", message).bright_yellow()),
            Notice::Error => println!("{}", format!("✗ {}", message).bright_red().bold()),
        }
    }

    fn thinking(&mut self, activity: &str, model: &str) {
        println!("{}", format!("{} (model: {})...", activity, model).bright_magenta());
    }

    fn show_help(&mut self) {
        self.header("Help Menu");
        println!("{}", "Available Commands:".bright_white());
        self.menu_option("u", "User2AI Mode - Answer the next round of AI questions yourself");
        self.menu_option("a", "AI2AI Mode - Let the customer and salesman agents talk");
        self.menu_option("s", "Save current progress without quitting");
        self.menu_option("h", "Show this help");
        self.menu_option("q", "Quit and save all data");
        println!("\n{}", "Features:".bright_white());
        println!("  {}", format!("Auto-save every {} seconds (silent background)", self.autosave_secs).dimmed());
        println!("  {}", format!("Up to {} questions per round", self.max_questions).dimmed());
        println!("\n{}", "Configuration:".bright_white());
        println!("  {}", "Set OLLAMA_API_KEY in the environment or a .env file".dimmed());
        println!("  {}", "Set OLLAMA_MODEL to choose the model".dimmed());
        println!("\n{}\n", "=".repeat(RULE_WIDTH).cyan());
    }
}
