//! Conversational turn processor
//!
//! One turn: check the utterance against the crisis keywords, produce
//! either the scripted safety message or a generated reply, classify
//! the utterance's emotion, and hand back the paired transcript
//! entries plus the two chat-log lines. The caller owns the session
//! and the log; nothing here touches either.

#[cfg(test)]
mod proptests;

use crate::capability::{CapabilityError, EmotionClassifier, GenerationService};
use crate::chatlog::format_stamp;
use crate::config;
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Turn failure. Either capability failing aborts the whole turn;
/// the caller must not append to the transcript or the log.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("reply generation failed: {0}")]
    Generation(CapabilityError),
    #[error("emotion classification failed: {0}")]
    Classification(CapabilityError),
    #[error("{capability} did not respond within {limit:?}")]
    Timeout {
        capability: &'static str,
        limit: Duration,
    },
}

/// Outcome of feeding one utterance through the processor
#[derive(Debug)]
pub enum TurnOutcome {
    /// Empty input: no transcript change, no log write
    Skipped,
    Completed(CompletedTurn),
}

/// A completed turn, ready to be appended to the session and the log
#[derive(Debug)]
pub struct CompletedTurn {
    pub utterance: String,
    /// Reply text without the emotion annotation; this is what the
    /// log records.
    pub reply: String,
    /// Display form: reply plus detected-emotion annotation; this is
    /// what the transcript records.
    pub annotated_reply: String,
    pub emotion: String,
    pub crisis: bool,
    pub timestamp: DateTime<Local>,
    pub log_lines: [String; 2],
}

/// True when the utterance contains any crisis keyword,
/// case-insensitively, anywhere in the text.
pub fn contains_crisis_keyword(utterance: &str) -> bool {
    let lowered = utterance.to_lowercase();
    config::CRISIS_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Attach the detected emotion to a reply for display
pub fn annotate_reply(reply: &str, emotion: &str) -> String {
    format!("{reply} (Detected emotion: *{emotion}*)")
}

/// Processes one utterance per call against the two capabilities
pub struct TurnProcessor {
    generation: Arc<dyn GenerationService>,
    classifier: Arc<dyn EmotionClassifier>,
    capability_timeout: Duration,
}

impl TurnProcessor {
    pub fn new(
        generation: Arc<dyn GenerationService>,
        classifier: Arc<dyn EmotionClassifier>,
        capability_timeout: Duration,
    ) -> Self {
        Self {
            generation,
            classifier,
            capability_timeout,
        }
    }

    /// Run one turn.
    ///
    /// The classifier runs for every non-empty utterance, crisis or
    /// not; the annotation on the safety reply needs the label. The
    /// generator only runs on the non-crisis branch.
    pub async fn process(
        &self,
        utterance: &str,
        now: DateTime<Local>,
    ) -> Result<TurnOutcome, TurnError> {
        if utterance.trim().is_empty() {
            tracing::debug!("empty utterance, skipping turn");
            return Ok(TurnOutcome::Skipped);
        }

        let crisis = contains_crisis_keyword(utterance);

        let emotion = match timeout(self.capability_timeout, self.classifier.classify(utterance))
            .await
        {
            Ok(Ok(label)) => label,
            Ok(Err(e)) => return Err(TurnError::Classification(e)),
            Err(_) => {
                return Err(TurnError::Timeout {
                    capability: "classification",
                    limit: self.capability_timeout,
                })
            }
        };

        let reply = if crisis {
            tracing::warn!(emotion = %emotion, "crisis keyword matched, replying with safety message");
            config::SAFETY_MESSAGE.to_string()
        } else {
            match timeout(self.capability_timeout, self.generation.generate(utterance)).await {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => return Err(TurnError::Generation(e)),
                Err(_) => {
                    return Err(TurnError::Timeout {
                        capability: "generation",
                        limit: self.capability_timeout,
                    })
                }
            }
        };

        let annotated_reply = annotate_reply(&reply, &emotion);
        let stamp = format_stamp(now);
        let log_lines = [
            format!("[{stamp}] You: {utterance}"),
            format!("[{stamp}] Bot: {reply}"),
        ];

        Ok(TurnOutcome::Completed(CompletedTurn {
            utterance: utterance.to_string(),
            reply,
            annotated_reply,
            emotion,
            crisis,
            timestamp: now,
            log_lines,
        }))
    }
}
