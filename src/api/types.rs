//! API request and response types

use crate::session::TranscriptEntry;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response for one chat turn
#[derive(Debug, Serialize)]
pub struct ChatTurnResponse {
    /// True for an empty utterance: nothing was processed or logged
    pub skipped: bool,
    pub crisis: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    /// The two entries appended this turn, newest first
    pub entries: Vec<TranscriptEntry>,
}

impl ChatTurnResponse {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            crisis: false,
            reply: None,
            emotion: None,
            entries: Vec::new(),
        }
    }
}

/// Response for session creation
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub created_at: DateTime<Local>,
}

/// Response with a session's transcript
#[derive(Debug, Serialize)]
pub struct SessionTranscriptResponse {
    pub id: String,
    pub created_at: DateTime<Local>,
    /// Reverse-chronological, the order the page displays
    pub transcript: Vec<TranscriptEntry>,
}

/// Response with one affirmation
#[derive(Debug, Serialize)]
pub struct AffirmationResponse {
    pub affirmation: String,
}

/// Request reporting a mood self-selection
#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    pub mood: String,
}

/// Response acknowledging a mood self-selection
#[derive(Debug, Serialize)]
pub struct MoodResponse {
    pub acknowledgment: String,
}

/// Response listing the fixed mood choices
#[derive(Debug, Serialize)]
pub struct MoodChoicesResponse {
    pub moods: Vec<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
