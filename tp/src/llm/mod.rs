//! Text generation for itineraries and alternative suggestions

use std::sync::Arc;

use tracing::{debug, warn};

mod anthropic;
pub mod client;
mod error;

pub use anthropic::AnthropicClient;
pub use client::{TextGenerator, UnavailableGenerator};
pub use error::LlmError;

use crate::config::LlmConfig;

/// Create a text generator based on the provider specified in config
///
/// A missing API key does not fail: the generator is replaced by one whose
/// calls fail, and the workflow falls back to its templates.
pub fn create_generator(config: &LlmConfig) -> Result<Arc<dyn TextGenerator>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_generator: called");
    match config.provider.as_str() {
        "anthropic" => match AnthropicClient::from_config(config) {
            Ok(client) => Ok(Arc::new(client)),
            Err(LlmError::Unavailable(reason)) => {
                warn!(%reason, "create_generator: text generation disabled");
                Ok(Arc::new(UnavailableGenerator::new(reason)))
            }
            Err(e) => Err(e),
        },
        "none" => {
            debug!("create_generator: text generation disabled by config");
            Ok(Arc::new(UnavailableGenerator::new("disabled by configuration")))
        }
        other => {
            debug!(provider = %other, "create_generator: unknown provider");
            Err(LlmError::InvalidResponse(format!(
                "Unknown LLM provider: '{}'. Supported: anthropic, none",
                other
            )))
        }
    }
}
