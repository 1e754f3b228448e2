//! Data provider error types

use std::time::Duration;
use thiserror::Error;

/// Errors returned by weather, lodging, attraction and flight providers
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider panicked: {0}")]
    Panicked(String),
}

impl ProviderError {
    /// True when the call ran out of time rather than failing outright
    pub fn is_timeout(&self) -> bool {
        match self {
            ProviderError::Timeout(_) => true,
            ProviderError::Network(e) => e.is_timeout(),
            _ => false,
        }
    }
}
