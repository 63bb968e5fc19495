//! CLI command definitions and output formatting

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::debug;

use crate::session::{ContentIdea, SessionSummary};

/// Content Planner - AI-guided Q&A for product content ideas
#[derive(Parser)]
#[command(
    name = "content-planner",
    about = "Interactive AI-guided Q&A that turns product questions into content ideas",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Session file (overrides session.output-file)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Subcommand to execute; runs the interactive session when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the saved session without opening it
    Summary {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the saved content ideas
    Ideas {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("contentplanner")
        .join("logs")
        .join("content-planner.log")
}

/// Generate the after_help text
pub fn generate_after_help() -> String {
    format!(
        "Interactive keys: [u] User2AI  [a] AI2AI  [s] Save  [h] Help  [q] Quit\n\
         Set OLLAMA_API_KEY (environment or .env) to enable generation.\n\
         Logs are written to: {}\n",
        get_log_path().display()
    )
}

/// Output format for summary/ideas commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text, json, or markdown", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}

/// Render a session summary
pub fn format_summary(summary: &SessionSummary, format: &OutputFormat) -> eyre::Result<String> {
    debug!(?format, "format_summary: called");
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(summary)?,
        OutputFormat::Text => format!(
            "Product/Topic:    {}\nRounds Completed: {}\nQ&A Pairs:        {}\nContent Ideas:    {}\nLast Updated:     {}",
            summary.product_name, summary.rounds, summary.qa_count, summary.ideas_count, summary.last_updated
        ),
        OutputFormat::Markdown => format!(
            "## {}\n\n- Rounds completed: {}\n- Q&A pairs: {}\n- Content ideas: {}\n- Last updated: {}",
            summary.product_name, summary.rounds, summary.qa_count, summary.ideas_count, summary.last_updated
        ),
    };
    Ok(out)
}

/// Render a list of content ideas
pub fn format_ideas(product_name: &str, ideas: &[ContentIdea], format: &OutputFormat) -> eyre::Result<String> {
    debug!(?format, count = ideas.len(), "format_ideas: called");
    let mut out = String::new();
    match format {
        OutputFormat::Json => out = serde_json::to_string_pretty(ideas)?,
        OutputFormat::Text => {
            for (i, idea) in ideas.iter().enumerate() {
                writeln!(out, "{}. {}", i + 1, idea.title)?;
                if !idea.summary.is_empty() {
                    writeln!(out, "   -> {}", idea.summary)?;
                }
            }
        }
        OutputFormat::Markdown => {
            writeln!(out, "# Content ideas: {}\n", product_name)?;
            for (i, idea) in ideas.iter().enumerate() {
                if idea.summary.is_empty() {
                    writeln!(out, "{}. **{}**", i + 1, idea.title)?;
                } else {
                    writeln!(out, "{}. **{}** - {}", i + 1, idea.title, idea.summary)?;
                }
            }
        }
    }
    Ok(out.trim_end().to_string())
}
