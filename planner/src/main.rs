//! Content Planner - AI-guided Q&A for product content ideas
//!
//! CLI entry point: interactive session by default, plus read-only views of
//! the saved session.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, info};

use contentplanner::agents::{ContentStrategist, CustomerAgent, SalesmanAgent};
use contentplanner::cli::{Cli, Command, OutputFormat, format_ideas, format_summary, generate_after_help, get_log_path};
use contentplanner::config::Config;
use contentplanner::llm::{self, create_client};
use contentplanner::planner::{ContentPlanner, Generators, RunOutcome};
use contentplanner::prompts::PromptLoader;
use contentplanner::session::SessionStore;
use contentplanner::ui::ConsoleUi;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log here since logging isn't initialized yet
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // API keys may live in .env
    let dotenv = dotenvy::dotenv().ok();

    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;
    if let Some(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let output = cli.output.clone().unwrap_or_else(|| config.session.output_file.clone());
    info!(model = %config.llm.model, output = %output.display(), "Content planner loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => cmd_interactive(&config, output).await,
        Some(Command::Summary { format }) => cmd_summary(output, &format),
        Some(Command::Ideas { format }) => cmd_ideas(output, &format),
    }
}

async fn cmd_interactive(config: &Config, output: PathBuf) -> Result<()> {
    debug!("cmd_interactive: called");
    let llm = create_client(&config.llm);
    let salesman_llm = create_client(&config.salesman_llm());
    let base = std::env::current_dir().context("Failed to read current directory")?;
    let prompts = Arc::new(PromptLoader::new(base));
    let session = &config.session;

    let generators = Generators {
        questions: Arc::new(CustomerAgent::new(
            llm.clone(),
            prompts.clone(),
            session.max_questions_per_round,
        )),
        ideas: Arc::new(
            ContentStrategist::new(llm, prompts.clone(), session.ideas_per_round)
                .context("Failed to build content strategist")?,
        ),
        answers: Arc::new(SalesmanAgent::new(salesman_llm, prompts, &session.context_file)),
    };

    let ui = ConsoleUi::new(session.autosave_interval_secs, session.max_questions_per_round)?;
    let store = Arc::new(SessionStore::new(output));
    let mut planner = ContentPlanner::new(store, generators, ui, session.autosave_interval())
        .with_llm_ready(llm::is_configured(&config.llm));

    match planner.run().await {
        RunOutcome::Abandoned => println!("Goodbye!"),
        RunOutcome::Finished { saved } => info!(saved, "Session finished"),
    }
    Ok(())
}

fn cmd_summary(output: PathBuf, format: &OutputFormat) -> Result<()> {
    debug!(?format, "cmd_summary: called");
    let store = SessionStore::new(output);
    let Some(summary) = store.session_summary() else {
        eyre::bail!("No saved session found at {}", store.path().display());
    };
    println!("{}", format_summary(&summary, format)?);
    Ok(())
}

fn cmd_ideas(output: PathBuf, format: &OutputFormat) -> Result<()> {
    debug!(?format, "cmd_ideas: called");
    let store = SessionStore::new(output);
    let found = store
        .try_load()
        .with_context(|| format!("Failed to read session from {}", store.path().display()))?;
    if !found {
        eyre::bail!("No saved session found at {}", store.path().display());
    }

    let ideas = store.content_ideas();
    if ideas.is_empty() && *format != OutputFormat::Json {
        println!("No content ideas saved yet for '{}'.", store.product_name());
        return Ok(());
    }
    println!("{}", format_ideas(&store.product_name(), &ideas, format)?);
    Ok(())
}
