//! Hugging Face Inference API generation provider

use super::{CapabilityError, GenerationService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Decoding bound passed to the model, matching the original
/// deployment of the conversational model.
const MAX_REPLY_LENGTH: u32 = 200;

/// Conversational generation via the Hugging Face Inference API
pub struct HfGeneration {
    client: Client,
    token: Option<String>,
    model: String,
    endpoint: String,
}

impl HfGeneration {
    /// `base_url` overrides the public API host for self-hosted
    /// inference endpoints.
    pub fn new(token: Option<String>, model: impl Into<String>, base_url: Option<&str>) -> Self {
        let model = model.into();
        let endpoint = match base_url {
            Some(base) => format!("{}/{model}", base.trim_end_matches('/')),
            None => format!("{DEFAULT_BASE_URL}/{model}"),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            token,
            model,
            endpoint,
        }
    }

    fn translate_request(&self, utterance: &str) -> HfGenerationRequest {
        HfGenerationRequest {
            inputs: utterance.to_string(),
            parameters: HfGenerationParameters {
                max_length: MAX_REPLY_LENGTH,
            },
            options: HfOptions {
                wait_for_model: true,
            },
        }
    }

    fn normalize_response(
        &self,
        outputs: Vec<HfGeneratedText>,
    ) -> Result<String, CapabilityError> {
        let reply = outputs
            .into_iter()
            .next()
            .map(|o| o.generated_text)
            .unwrap_or_default();

        if reply.trim().is_empty() {
            return Err(CapabilityError::unknown(format!(
                "Model {} returned no generated text",
                self.model
            )));
        }

        Ok(reply.trim().to_string())
    }
}

#[async_trait]
impl GenerationService for HfGeneration {
    async fn generate(&self, utterance: &str) -> Result<String, CapabilityError> {
        let request = self.translate_request(utterance);

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&request);
        if let Some(token) = &self.token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let response = builder.send().await.map_err(classify_transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CapabilityError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        let outputs: Vec<HfGeneratedText> = serde_json::from_str(&body).map_err(|e| {
            CapabilityError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        self.normalize_response(outputs)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Map reqwest transport failures onto the capability taxonomy
pub(super) fn classify_transport_error(e: reqwest::Error) -> CapabilityError {
    if e.is_timeout() {
        CapabilityError::network(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        CapabilityError::network(format!("Connection failed: {e}"))
    } else {
        CapabilityError::unknown(format!("Request failed: {e}"))
    }
}

/// Classify a non-success HTTP status from the inference API
pub(super) fn classify_status(status: reqwest::StatusCode, body: &str) -> CapabilityError {
    let message = body.to_string();
    match status.as_u16() {
        401 | 403 => CapabilityError::auth(format!("Authentication failed: {message}")),
        429 => CapabilityError::rate_limit(format!("Rate limited: {message}")),
        400 => CapabilityError::invalid_request(format!("Invalid request: {message}")),
        // 503 is how the hosted API reports a model that is still
        // loading despite wait_for_model.
        500..=599 => CapabilityError::server_error(format!("Server error: {message}")),
        _ => CapabilityError::unknown(format!("HTTP {status}: {message}")),
    }
}

// Hugging Face Inference API types

#[derive(Debug, Serialize)]
struct HfGenerationRequest {
    inputs: String,
    parameters: HfGenerationParameters,
    options: HfOptions,
}

#[derive(Debug, Serialize)]
struct HfGenerationParameters {
    max_length: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct HfOptions {
    pub wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct HfGeneratedText {
    generated_text: String,
}
