//! Hugging Face Inference API emotion classification provider

use super::generation::{classify_status, classify_transport_error, HfOptions};
use super::{CapabilityError, EmotionClassifier};
use crate::config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Single-label emotion classification via the Hugging Face
/// Inference API text-classification endpoint
pub struct HfEmotionClassifier {
    client: Client,
    token: Option<String>,
    model: String,
    endpoint: String,
}

impl HfEmotionClassifier {
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

    /// The endpoint scores every label; take the top one and hold it
    /// to the closed vocabulary.
    fn normalize_response(
        &self,
        mut rows: Vec<Vec<HfLabelScore>>,
    ) -> Result<String, CapabilityError> {
        let scores = if rows.is_empty() {
            Vec::new()
        } else {
            rows.swap_remove(0)
        };

        let top = scores
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| {
                CapabilityError::unknown(format!("Model {} returned no labels", self.model))
            })?;

        let label = top.label.to_lowercase();
        if !config::EMOTION_LABELS.contains(&label.as_str()) {
            return Err(CapabilityError::unknown(format!(
                "Model {} returned label `{label}` outside the fixed vocabulary",
                self.model
            )));
        }

        Ok(label)
    }
}

#[async_trait]
impl EmotionClassifier for HfEmotionClassifier {
    async fn classify(&self, utterance: &str) -> Result<String, CapabilityError> {
        let request = HfClassificationRequest {
            inputs: utterance.to_string(),
            options: HfOptions {
                wait_for_model: true,
            },
        };

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

        let rows: Vec<Vec<HfLabelScore>> = serde_json::from_str(&body).map_err(|e| {
            CapabilityError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        self.normalize_response(rows)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// Hugging Face Inference API types

#[derive(Debug, Serialize)]
struct HfClassificationRequest {
    inputs: String,
    options: HfOptions,
}

#[derive(Debug, Deserialize)]
struct HfLabelScore {
    label: String,
    score: f64,
}
