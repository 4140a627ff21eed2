//! External model capabilities
//!
//! Trait seams for the two opaque collaborators of a turn: reply
//! generation and emotion classification. Concrete implementations
//! talk to the Hugging Face Inference API; tests substitute mocks.

mod emotion;
mod error;
mod generation;

#[cfg(test)]
pub mod testing;

pub use emotion::HfEmotionClassifier;
pub use error::{CapabilityError, CapabilityErrorKind};
pub use generation::HfGeneration;

use async_trait::async_trait;
use std::sync::Arc;

/// Conversational reply generation.
///
/// Each call is independent: the utterance is the sole context, no
/// prior-turn window is passed.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate a reply for a single utterance
    async fn generate(&self, utterance: &str) -> Result<String, CapabilityError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Single-label emotion classification over a closed vocabulary.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classify an utterance, returning the top label
    async fn classify(&self, utterance: &str) -> Result<String, CapabilityError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for generation services
pub struct LoggedGeneration {
    inner: Arc<dyn GenerationService>,
    model_id: String,
}

impl LoggedGeneration {
    pub fn new(inner: Arc<dyn GenerationService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl GenerationService for LoggedGeneration {
    async fn generate(&self, utterance: &str) -> Result<String, CapabilityError> {
        let start = std::time::Instant::now();
        let result = self.inner.generate(utterance).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    reply_chars = reply.chars().count(),
                    "generation request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "generation request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Logging wrapper for emotion classifiers
pub struct LoggedClassifier {
    inner: Arc<dyn EmotionClassifier>,
    model_id: String,
}

impl LoggedClassifier {
    pub fn new(inner: Arc<dyn EmotionClassifier>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl EmotionClassifier for LoggedClassifier {
    async fn classify(&self, utterance: &str) -> Result<String, CapabilityError> {
        let start = std::time::Instant::now();
        let result = self.inner.classify(utterance).await;
        let duration = start.elapsed();

        match &result {
            Ok(label) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    label = %label,
                    "classification request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "classification request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
