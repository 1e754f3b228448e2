//! Text generation error types

use std::time::Duration;
use thiserror::Error;

use crate::config::MAX_RETRY_WAIT;

/// Errors that can occur while generating text
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Text generation unavailable: {0}")]
    Unavailable(String),
}

impl LlmError {
    /// Check if this error is worth retrying
    ///
    /// Rate limits asking for more than `MAX_RETRY_WAIT` go back to the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimited { retry_after } => *retry_after <= MAX_RETRY_WAIT,
            LlmError::ApiError { status, .. } => matches!(status, 408 | 429 | 500 | 502 | 503 | 504 | 529),
            LlmError::Network(_) => true,
            LlmError::Timeout(_) => true,
            LlmError::InvalidResponse(_) | LlmError::Json(_) | LlmError::Unavailable(_) => false,
        }
    }

    /// Get the retry duration if this is a rate limit error
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}
