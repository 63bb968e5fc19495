//! LLM client module
//!
//! Provides chat-completion requests against an OpenAI-compatible endpoint.

use std::sync::Arc;

use tracing::{debug, warn};

pub mod client;
mod error;
mod offline;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use offline::OfflineClient;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse};

use crate::config::LlmConfig;

/// Create an LLM client for the given configuration
///
/// Falls back to an [`OfflineClient`] when the API key is missing, so the
/// caller always gets something it can hand to the generators.
pub fn create_client(config: &LlmConfig) -> Arc<dyn LlmClient> {
    debug!(model = %config.model, api_key_env = %config.api_key_env, "create_client: called");
    match OpenAIClient::from_config(config) {
        Ok(client) => {
            debug!("create_client: creating OpenAI-compatible client");
            Arc::new(client)
        }
        Err(e) => {
            warn!(error = %e, "create_client: LLM unavailable, running offline");
            Arc::new(OfflineClient::new(&config.model, &config.api_key_env))
        }
    }
}

/// Whether a client produced by [`create_client`] can reach the API
pub fn is_configured(config: &LlmConfig) -> bool {
    config.api_key().is_some()
}
