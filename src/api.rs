//! HTTP API for the support chat
//!
//! One page, a handful of JSON endpoints, and the session store.

mod assets;
mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::chatlog::ChatLog;
use crate::session::Session;
use crate::turn::TurnProcessor;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Live sessions. The mutex also serializes turns: the chat
    /// handler holds it across the capability calls, so each session
    /// sees at most one in-flight turn.
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub processor: Arc<TurnProcessor>,
    pub chat_log: Arc<ChatLog>,
}

impl AppState {
    pub fn new(processor: TurnProcessor, chat_log: ChatLog) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            processor: Arc::new(processor),
            chat_log: Arc::new(chat_log),
        }
    }
}
