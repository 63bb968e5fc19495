//! Content planner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Value shipped in `.env.example`; treated the same as an unset key
const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// Key variable tried first for the salesman before the main one
const SALESMAN_API_KEY_ENV: &str = "OLLAMA_API_KEY_SALESMAN";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM used by the customer and strategist agents
    pub llm: LlmConfig,

    /// Separate LLM for the salesman agent (defaults to `llm`)
    pub salesman: Option<LlmConfig>,

    /// Session and generation settings
    pub session: SessionConfig,

    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file_chain(config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Read only the log level, before logging is initialised
    ///
    /// Errors are swallowed; the full `load` reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_file_chain(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_file_chain(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: ./content-planner.yml
        let local_config = PathBuf::from("content-planner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/contentplanner/content-planner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("contentplanner").join("content-planner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply the process environment on top of file values
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Unparsable numeric values are ignored with a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("apply_overrides_from: called");
        let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(model) = lookup("OLLAMA_MODEL") {
            debug!(%model, "apply_overrides_from: OLLAMA_MODEL");
            self.llm.model = model;
        }
        if let Some(model) = lookup("OLLAMA_MODEL_SALESMAN") {
            debug!(%model, "apply_overrides_from: OLLAMA_MODEL_SALESMAN");
            self.salesman.get_or_insert_with(|| self.llm.clone()).model = model;
        }

        fn parse<T: std::str::FromStr>(key: &str, value: Option<String>) -> Option<T> {
            let value = value?;
            match value.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(%key, %value, "Ignoring unparsable environment override");
                    None
                }
            }
        }

        if let Some(n) = parse("MAX_QUESTIONS_PER_ROUND", lookup("MAX_QUESTIONS_PER_ROUND")) {
            self.session.max_questions_per_round = n;
        }
        if let Some(n) = parse("CONTENT_IDEAS_PER_ROUND", lookup("CONTENT_IDEAS_PER_ROUND")) {
            self.session.ideas_per_round = n;
        }
        if let Some(n) = parse("AUTOSAVE_INTERVAL_SECONDS", lookup("AUTOSAVE_INTERVAL_SECONDS")) {
            self.session.autosave_interval_secs = n;
        }
    }

    /// LLM settings for the salesman agent
    ///
    /// Uses the `salesman` section when present, otherwise the main `llm`
    /// section. The key comes from `OLLAMA_API_KEY_SALESMAN` when that is
    /// set and falls back to the main key variable otherwise.
    pub fn salesman_llm(&self) -> LlmConfig {
        let mut llm = self.salesman.clone().unwrap_or_else(|| self.llm.clone());
        if self.salesman.is_none() && usable_key(std::env::var(SALESMAN_API_KEY_ENV).ok()).is_some() {
            llm.api_key_env = SALESMAN_API_KEY_ENV.to_string();
        }
        llm
    }
}

/// Treat missing, blank and placeholder keys alike
fn usable_key(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != PLACEHOLDER_API_KEY)
}

/// LLM endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Resolve the API key from the environment
    pub fn api_key(&self) -> Option<String> {
        usable_key(std::env::var(&self.api_key_env).ok())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "deepseek-v3.1:671b-cloud".to_string(),
            api_key_env: "OLLAMA_API_KEY".to_string(),
            base_url: "https://ollama.com".to_string(),
            max_tokens: 4096,
            timeout_ms: 120_000,
        }
    }
}

/// Session and generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session JSON file
    #[serde(rename = "output-file")]
    pub output_file: PathBuf,

    /// Product knowledge handed to the salesman agent
    #[serde(rename = "context-file")]
    pub context_file: PathBuf,

    /// Seconds between background saves
    #[serde(rename = "autosave-interval-secs")]
    pub autosave_interval_secs: u64,

    /// Upper bound on questions per round
    #[serde(rename = "max-questions-per-round")]
    pub max_questions_per_round: usize,

    /// Upper bound on ideas per generation
    #[serde(rename = "ideas-per-round")]
    pub ideas_per_round: usize,
}

impl SessionConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("out/content_ideas.json"),
            context_file: PathBuf::from("out/context.md"),
            autosave_interval_secs: 300,
            max_questions_per_round: 5,
            ideas_per_round: 10,
        }
    }
}
