//! Client used when no API key is configured

use async_trait::async_trait;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError};

/// Stand-in client that refuses every request
///
/// Lets the interactive loop run (and persisted sessions be browsed)
/// without credentials; every generator built on it comes back empty.
pub struct OfflineClient {
    model: String,
    api_key_env: String,
}

impl OfflineClient {
    pub fn new(model: impl Into<String>, api_key_env: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key_env: api_key_env.into(),
        }
    }
}

#[async_trait]
impl LlmClient for OfflineClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(model = %self.model, "OfflineClient::complete: called");
        Err(LlmError::NotConfigured(format!("set {} to enable generation", self.api_key_env)))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
