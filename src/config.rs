//! Fixed vocabularies and runtime configuration
//!
//! The keyword, affirmation, emotion, and mood lists are closed sets.
//! They are enumerated here and validated once at startup instead of
//! living as scattered literals.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Substrings that force the safety-intervention reply.
///
/// Matched case-insensitively against the lower-cased utterance.
pub const CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "self-harm",
    "kill myself",
    "hurt myself",
    "ending my life",
    "depressed",
];

/// Fixed reply used whenever a crisis keyword matches.
pub const SAFETY_MESSAGE: &str = "⚠️ I'm really concerned about you. Please talk to someone you trust or contact a helpline. You are not alone. ❤️";

/// Daily affirmations, one served uniformly at random.
pub const AFFIRMATIONS: &[&str] = &[
    "You are doing better than you think.",
    "Your feelings are valid.",
    "This too shall pass.",
    "You are not alone in this.",
    "Small steps count too.",
    "You deserve peace and kindness.",
];

/// Closed label vocabulary of the emotion classifier.
pub const EMOTION_LABELS: &[&str] = &[
    "anger",
    "disgust",
    "fear",
    "joy",
    "neutral",
    "sadness",
    "surprise",
];

/// Mood self-report choices. Cosmetic only; never consulted by the
/// turn processor.
pub const MOOD_CHOICES: &[&str] = &["😊 Happy", "😔 Sad", "😟 Anxious", "😌 Calm", "😤 Angry"];

/// Acknowledgment for a valid mood self-report, or `None` if the
/// choice is not one of [`MOOD_CHOICES`].
pub fn mood_acknowledgment(mood: &str) -> Option<String> {
    if !MOOD_CHOICES.contains(&mood) {
        return None;
    }
    // "😊 Happy" -> "Happy"
    let feeling = mood.split_whitespace().last()?;
    Some(format!("It's okay to feel {feeling}. Thanks for sharing."))
}

/// Vocabulary validation failure at startup
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("vocabulary `{0}` is empty")]
    Empty(&'static str),
    #[error("crisis keyword `{0}` is not lower-case")]
    KeywordNotLowercase(String),
    #[error("duplicate entry `{1}` in vocabulary `{0}`")]
    Duplicate(&'static str, String),
}

/// Check the fixed vocabularies once at startup.
///
/// Keywords must be lower-case (the matcher lower-cases the utterance,
/// not the keywords), and no list may be empty or carry duplicates.
pub fn validate_vocabularies() -> Result<(), VocabularyError> {
    for (name, list) in [
        ("crisis_keywords", CRISIS_KEYWORDS),
        ("affirmations", AFFIRMATIONS),
        ("emotion_labels", EMOTION_LABELS),
        ("mood_choices", MOOD_CHOICES),
    ] {
        if list.is_empty() {
            return Err(VocabularyError::Empty(name));
        }
        let mut seen = HashSet::new();
        for entry in list {
            if !seen.insert(*entry) {
                return Err(VocabularyError::Duplicate(name, (*entry).to_string()));
            }
        }
    }

    for keyword in CRISIS_KEYWORDS {
        if *keyword != keyword.to_lowercase() {
            return Err(VocabularyError::KeywordNotLowercase((*keyword).to_string()));
        }
    }

    Ok(())
}

/// Runtime configuration derived from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Append-only chat log path
    pub log_path: PathBuf,
    /// Hugging Face API token. Optional: anonymous requests work
    /// against the public inference API at a reduced rate limit.
    pub hf_token: Option<String>,
    /// Base URL override for self-hosted inference endpoints
    pub hf_base_url: Option<String>,
    /// Conversational model id
    pub chat_model: String,
    /// Emotion classification model id
    pub emotion_model: String,
    /// Upper bound on each capability call within a turn
    pub capability_timeout: Duration,
}

const DEFAULT_CHAT_MODEL: &str = "facebook/blenderbot-3B";
const DEFAULT_EMOTION_MODEL: &str = "j-hartmann/emotion-english-distilroberta-base";
const DEFAULT_CAPABILITY_TIMEOUT_SECS: u64 = 30;

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("SOLACE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let log_path = std::env::var("SOLACE_LOG_PATH").map_or_else(
            |_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(format!("{home}/.solace/chat_history.txt"))
            },
            PathBuf::from,
        );

        let capability_timeout = std::env::var("SOLACE_CAPABILITY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(
                Duration::from_secs(DEFAULT_CAPABILITY_TIMEOUT_SECS),
                Duration::from_secs,
            );

        Self {
            port,
            log_path,
            hf_token: std::env::var("HF_API_TOKEN").ok(),
            hf_base_url: std::env::var("HF_BASE_URL").ok(),
            chat_model: std::env::var("SOLACE_CHAT_MODEL")
                .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            emotion_model: std::env::var("SOLACE_EMOTION_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMOTION_MODEL.to_string()),
            capability_timeout,
        }
    }
}
