//! Quick Chat - a single-page chat with a pretrained conversational model
//!
//! Renders the conversation server-side and delegates reply generation to
//! a text-generation backend.

mod api;
mod conversation;
mod llm;
mod render;
mod reply_generator;
mod runtime;
mod session;

use api::{create_router, AppState};
use llm::{GeneratorConfig, InferenceServerGenerator, LoggingGenerator, TextGenerator};
use render::Renderer;
use reply_generator::ReplyGenerator;
use runtime::SessionManager;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quick_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let port: u16 = std::env::var("QUICK_CHAT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8501);

    let session_idle = Duration::from_secs(
        std::env::var("QUICK_CHAT_SESSION_IDLE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600),
    );

    // Initialize generation backend
    let generator_config = GeneratorConfig::from_env();
    let backend: Arc<dyn TextGenerator> =
        Arc::new(InferenceServerGenerator::new(&generator_config)?);
    let generator: Arc<dyn TextGenerator> = Arc::new(LoggingGenerator::new(backend));

    let sessions = Arc::new(SessionManager::new(ReplyGenerator::new(
        generator,
        generator_config.eos_token.clone(),
    )));
    tracing::info!(
        model = %sessions.model_id(),
        backend = %generator_config.base_url,
        "Generation backend configured"
    );

    // Drop abandoned sessions in the background
    let sweeper = sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EVICTION_INTERVAL);
        loop {
            interval.tick().await;
            sweeper.evict_idle(session_idle).await;
        }
    });

    // Create application state
    let state = AppState::new(sessions, Renderer::new()?);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Quick Chat listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
