//! Solace - mental-health support chat
//!
//! A small web service pairing a free-text chat with emotion tagging
//! and a crisis-keyword safety intervention.

mod api;
mod capability;
mod chatlog;
mod config;
mod session;
mod turn;

use api::{create_router, AppState};
use capability::{
    EmotionClassifier, GenerationService, HfEmotionClassifier, HfGeneration, LoggedClassifier,
    LoggedGeneration,
};
use chatlog::ChatLog;
use config::Config;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use turn::TurnProcessor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solace=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // The fixed vocabularies ship with the binary; check them before
    // serving anything.
    config::validate_vocabularies()?;

    let cfg = Config::from_env();

    // Ensure the chat log directory exists
    if let Some(parent) = cfg.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if cfg.hf_token.is_none() && cfg.hf_base_url.is_none() {
        tracing::warn!(
            "No HF_API_TOKEN configured; using anonymous inference API access (rate-limited)"
        );
    }

    let generation: Arc<dyn GenerationService> = Arc::new(LoggedGeneration::new(Arc::new(
        HfGeneration::new(
            cfg.hf_token.clone(),
            cfg.chat_model.clone(),
            cfg.hf_base_url.as_deref(),
        ),
    )));
    let classifier: Arc<dyn EmotionClassifier> = Arc::new(LoggedClassifier::new(Arc::new(
        HfEmotionClassifier::new(
            cfg.hf_token.clone(),
            cfg.emotion_model.clone(),
            cfg.hf_base_url.as_deref(),
        ),
    )));

    tracing::info!(
        chat_model = %cfg.chat_model,
        emotion_model = %cfg.emotion_model,
        log_path = %cfg.log_path.display(),
        "capabilities initialized"
    );

    let processor = TurnProcessor::new(generation, classifier, cfg.capability_timeout);
    let state = AppState::new(processor, ChatLog::new(cfg.log_path.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state).layer(cors).layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("Solace listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
