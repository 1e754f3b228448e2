//! TextGenerator trait definition

use async_trait::async_trait;
use tracing::debug;

use super::LlmError;

/// Stateless text generator - each call is an independent prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete a single system + user prompt and return the generated text
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

/// Generator used when no provider is configured; every call fails
///
/// The workflow treats the failure like any other generation error and
/// falls back to its templates.
#[derive(Debug, Clone)]
pub struct UnavailableGenerator {
    reason: String,
}

impl UnavailableGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
        debug!(reason = %self.reason, "UnavailableGenerator::complete: called");
        Err(LlmError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock generator for unit tests
    ///
    /// Returns the scripted responses in order, then fails. Prompts are
    /// recorded so tests can inspect what was asked.
    pub struct MockGenerator {
        responses: Vec<Result<String, String>>,
        call_count: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl MockGenerator {
        pub fn new(responses: Vec<Result<String, String>>) -> Self {
            debug!(response_count = %responses.len(), "MockGenerator::new: called");
            Self {
                responses,
                call_count: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }

        pub fn failing() -> Self {
            Self::new(vec![])
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn complete(&self, _system: &str, user: &str) -> Result<String, LlmError> {
            debug!("MockGenerator::complete: called");
            self.prompts.lock().unwrap().push(user.to_string());
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(idx) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(message)) => Err(LlmError::InvalidResponse(message.clone())),
                None => Err(LlmError::InvalidResponse("No more mock responses".to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_generator_fails() {
        let generator = UnavailableGenerator::new("ANTHROPIC_API_KEY not set");
        let err = generator.complete("system", "user").await.unwrap_err();
        assert!(matches!(err, LlmError::Unavailable(_)));
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[tokio::test]
    async fn test_mock_generator_replays_in_order() {
        let generator = mock::MockGenerator::new(vec![Ok("first".to_string()), Err("boom".to_string())]);

        assert_eq!(generator.complete("s", "a").await.unwrap(), "first");
        assert!(generator.complete("s", "b").await.is_err());
        assert!(generator.complete("s", "c").await.is_err());
        assert_eq!(generator.call_count(), 3);
        assert_eq!(generator.prompts(), vec!["a", "b", "c"]);
    }
}
