//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{
    AffirmationResponse, ChatRequest, ChatTurnResponse, ErrorResponse, MoodChoicesResponse,
    MoodRequest, MoodResponse, SessionResponse, SessionTranscriptResponse,
};
use super::AppState;
use crate::config;
use crate::session::Session;
use crate::turn::{TurnError, TurnOutcome};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use rand::seq::SliceRandom;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the page
        .route("/", get(serve_page))
        // Static assets (embedded or filesystem fallback)
        .route("/assets/*path", get(serve_static))
        // Session lifecycle
        .route("/api/sessions/new", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        // One conversational turn
        .route("/api/sessions/:id/chat", post(send_chat))
        // Page furniture
        .route("/api/affirmation", get(affirmation))
        .route("/api/moods", get(list_moods))
        .route("/api/mood", post(report_mood))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Page
// ============================================================

async fn serve_page() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = Local::now();

    state
        .sessions
        .lock()
        .await
        .insert(id.clone(), Session::new(id.clone(), created_at));

    tracing::info!(session_id = %id, "session created");
    Json(SessionResponse { id, created_at })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionTranscriptResponse>, AppError> {
    let sessions = state.sessions.lock().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No session {id}")))?;

    Ok(Json(SessionTranscriptResponse {
        id: session.id.clone(),
        created_at: session.created_at,
        transcript: session.entries_rev().cloned().collect(),
    }))
}

// ============================================================
// Chat
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatTurnResponse>, AppError> {
    // The session lock is held across the turn: one in-flight turn
    // per session, and the transcript/log pair stays consistent.
    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("No session {id}")))?;

    let now = Local::now();
    match state.processor.process(&req.text, now).await? {
        TurnOutcome::Skipped => Ok(Json(ChatTurnResponse::skipped())),
        TurnOutcome::Completed(turn) => {
            session.append_turn(
                turn.utterance.as_str(),
                turn.annotated_reply.as_str(),
                turn.timestamp,
            );

            state
                .chat_log
                .append_turn(&turn.log_lines)
                .map_err(|e| AppError::Internal(format!("Failed to write chat log: {e}")))?;

            let entries = session
                .last_turn()
                .map(|(user, bot)| vec![bot.clone(), user.clone()])
                .unwrap_or_default();

            Ok(Json(ChatTurnResponse {
                skipped: false,
                crisis: turn.crisis,
                reply: Some(turn.annotated_reply),
                emotion: Some(turn.emotion),
                entries,
            }))
        }
    }
}

// ============================================================
// Page Furniture
// ============================================================

async fn affirmation() -> Json<AffirmationResponse> {
    let mut rng = rand::thread_rng();
    let affirmation = config::AFFIRMATIONS
        .choose(&mut rng)
        .copied()
        .unwrap_or(config::AFFIRMATIONS[0]);

    Json(AffirmationResponse {
        affirmation: affirmation.to_string(),
    })
}

async fn list_moods() -> Json<MoodChoicesResponse> {
    Json(MoodChoicesResponse {
        moods: config::MOOD_CHOICES
            .iter()
            .map(|m| (*m).to_string())
            .collect(),
    })
}

async fn report_mood(Json(req): Json<MoodRequest>) -> Result<Json<MoodResponse>, AppError> {
    let acknowledgment = config::mood_acknowledgment(&req.mood)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown mood choice: {}", req.mood)))?;

    Ok(Json(MoodResponse { acknowledgment }))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("solace ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    /// A capability call failed or timed out; the turn was aborted
    Unavailable(String),
    Internal(String),
}

impl From<TurnError> for AppError {
    fn from(err: TurnError) -> Self {
        AppError::Unavailable(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::testing::{MockClassifier, MockGeneration};
    use crate::capability::CapabilityError;
    use crate::chatlog::ChatLog;
    use crate::session::Speaker;
    use crate::turn::TurnProcessor;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Harness {
        state: AppState,
        generation: Arc<MockGeneration>,
        classifier: Arc<MockClassifier>,
        // Keeps the log directory alive for the test's duration
        _dir: TempDir,
    }

    fn harness() -> Harness {
        let generation = Arc::new(MockGeneration::new());
        let classifier = Arc::new(MockClassifier::new());
        let dir = tempfile::tempdir().unwrap();

        let processor = TurnProcessor::new(
            generation.clone(),
            classifier.clone(),
            Duration::from_secs(5),
        );
        let chat_log = ChatLog::new(dir.path().join("chat_history.txt"));
        let state = AppState::new(processor, chat_log);

        Harness {
            state,
            generation,
            classifier,
            _dir: dir,
        }
    }

    async fn new_session(state: &AppState) -> String {
        let Json(resp) = create_session(State(state.clone())).await;
        resp.id
    }

    async fn chat(state: &AppState, id: &str, text: &str) -> Result<Json<ChatTurnResponse>, AppError> {
        send_chat(
            State(state.clone()),
            Path(id.to_string()),
            Json(ChatRequest {
                text: text.to_string(),
            }),
        )
        .await
    }

    fn log_contents(state: &AppState) -> String {
        std::fs::read_to_string(state.chat_log.path()).unwrap_or_default()
    }

    #[tokio::test]
    async fn chat_turn_grows_transcript_and_log_by_two() {
        let h = harness();
        let id = new_session(&h.state).await;
        h.generation.queue_reply("Glad to hear it.");
        h.classifier.queue_label("joy");

        let Json(resp) = chat(&h.state, &id, "I had a great day").await.unwrap();

        assert!(!resp.skipped);
        assert!(!resp.crisis);
        assert_eq!(
            resp.reply.as_deref(),
            Some("Glad to hear it. (Detected emotion: *joy*)")
        );
        assert_eq!(resp.emotion.as_deref(), Some("joy"));
        // Newest first: bot entry, then user entry.
        assert_eq!(resp.entries.len(), 2);
        assert_eq!(resp.entries[0].speaker, Speaker::Bot);
        assert_eq!(resp.entries[1].speaker, Speaker::You);

        let sessions = h.state.sessions.lock().await;
        assert_eq!(sessions.get(&id).unwrap().len(), 2);
        drop(sessions);

        assert_eq!(log_contents(&h.state).lines().count(), 2);
    }

    #[tokio::test]
    async fn crisis_turn_replies_with_safety_message() {
        let h = harness();
        let id = new_session(&h.state).await;
        h.classifier.queue_label("sadness");

        let Json(resp) = chat(&h.state, &id, "I feel like ending my life")
            .await
            .unwrap();

        assert!(resp.crisis);
        assert_eq!(
            resp.reply.as_deref(),
            Some(format!("{} (Detected emotion: *sadness*)", config::SAFETY_MESSAGE).as_str())
        );
        assert!(h.generation.recorded_requests().is_empty());

        // Log carries the raw safety message, no annotation.
        let log = log_contents(&h.state);
        assert!(log.contains(&format!("Bot: {}", config::SAFETY_MESSAGE)));
        assert!(!log.contains("Detected emotion"));
    }

    #[tokio::test]
    async fn empty_utterance_is_a_noop() {
        let h = harness();
        let id = new_session(&h.state).await;

        let Json(resp) = chat(&h.state, &id, "   ").await.unwrap();

        assert!(resp.skipped);
        assert!(resp.entries.is_empty());
        assert_eq!(h.state.sessions.lock().await.get(&id).unwrap().len(), 0);
        assert!(log_contents(&h.state).is_empty());
    }

    #[tokio::test]
    async fn capability_failure_leaves_no_partial_state() {
        let h = harness();
        let id = new_session(&h.state).await;
        h.classifier.queue_label("neutral");
        h.generation
            .queue_error(CapabilityError::server_error("backend down"));

        let result = chat(&h.state, &id, "hello").await;

        assert!(matches!(result, Err(AppError::Unavailable(_))));
        assert_eq!(h.state.sessions.lock().await.get(&id).unwrap().len(), 0);
        assert!(log_contents(&h.state).is_empty());
    }

    #[tokio::test]
    async fn chat_against_unknown_session_is_not_found() {
        let h = harness();
        let result = chat(&h.state, "nope", "hello").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn transcript_endpoint_returns_newest_first() {
        let h = harness();
        let id = new_session(&h.state).await;
        h.generation.queue_reply("r1");
        h.generation.queue_reply("r2");
        h.classifier.queue_label("neutral");
        h.classifier.queue_label("neutral");

        chat(&h.state, &id, "first").await.unwrap();
        chat(&h.state, &id, "second").await.unwrap();

        let Json(resp) = get_session(State(h.state.clone()), Path(id)).await.unwrap();
        let messages: Vec<&str> = resp
            .transcript
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(messages[1], "second");
        assert_eq!(messages[3], "first");
        assert_eq!(resp.transcript.len(), 4);
    }

    #[tokio::test]
    async fn affirmation_is_drawn_from_the_fixed_list() {
        for _ in 0..20 {
            let Json(resp) = affirmation().await;
            assert!(config::AFFIRMATIONS.contains(&resp.affirmation.as_str()));
        }
    }

    #[tokio::test]
    async fn mood_report_round_trip() {
        let Json(resp) = report_mood(Json(MoodRequest {
            mood: "😟 Anxious".to_string(),
        }))
        .await
        .unwrap();
        assert_eq!(
            resp.acknowledgment,
            "It's okay to feel Anxious. Thanks for sharing."
        );

        let err = report_mood(Json(MoodRequest {
            mood: "ecstatic".to_string(),
        }))
        .await;
        assert!(matches!(err, Err(AppError::BadRequest(_))));
    }
}
