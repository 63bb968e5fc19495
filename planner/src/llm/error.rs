//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Why a completion could not be produced
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited by the model endpoint (retry after {retry_after:?})")]
    RateLimited { retry_after: Duration },

    #[error("Model endpoint returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Could not reach the model endpoint: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Model endpoint did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Could not decode the model response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response from the model endpoint: {0}")]
    InvalidResponse(String),

    #[error("LLM API is not configured: {0}")]
    NotConfigured(String),
}

impl LlmError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Network(_) | Self::Timeout(_) => true,
            Self::ApiError { status, .. } => matches!(status, 408 | 429) || *status >= 500,
            Self::Json(_) | Self::InvalidResponse(_) | Self::NotConfigured(_) => false,
        }
    }
}
