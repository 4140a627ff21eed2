//! Mock capabilities for testing
//!
//! These mocks enable turn-processor and handler tests without real
//! network I/O.

use super::{CapabilityError, EmotionClassifier, GenerationService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock generation service that returns queued replies
pub struct MockGeneration {
    responses: Mutex<VecDeque<Result<String, CapabilityError>>>,
    /// Record of all utterances sent
    pub requests: Mutex<Vec<String>>,
}

impl MockGeneration {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(reply.into()));
    }

    /// Queue an error
    pub fn queue_error(&self, error: CapabilityError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded utterances
    pub fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGeneration {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockGeneration {
    async fn generate(&self, utterance: &str) -> Result<String, CapabilityError> {
        self.requests.lock().unwrap().push(utterance.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CapabilityError::network("No mock reply queued")))
    }

    fn model_id(&self) -> &str {
        "mock-generation"
    }
}

/// Mock classifier that returns queued labels
pub struct MockClassifier {
    responses: Mutex<VecDeque<Result<String, CapabilityError>>>,
    /// Record of all utterances sent
    pub requests: Mutex<Vec<String>>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful label
    pub fn queue_label(&self, label: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(label.into()));
    }

    /// Queue an error
    pub fn queue_error(&self, error: CapabilityError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded utterances
    pub fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmotionClassifier for MockClassifier {
    async fn classify(&self, utterance: &str) -> Result<String, CapabilityError> {
        self.requests.lock().unwrap().push(utterance.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CapabilityError::network("No mock label queued")))
    }

    fn model_id(&self) -> &str {
        "mock-classifier"
    }
}
