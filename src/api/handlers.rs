//! HTTP request handlers

use super::assets::serve_static;
use super::session_cookie::SessionContext;
use super::types::{
    ChatForm, ChatRequest, ChatResponse, ErrorResponse, ExportQuery, PageQuery,
    ReactionRequest, SessionResponse, SuccessResponse,
};
use super::AppState;
use crate::conversation::{Command, Emoji, ReactionError, ReactionSignal};
use crate::render::RenderError;
use crate::reply_generator::ChatError;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Chat page and its form actions
        .route("/", get(serve_page))
        .route("/chat", post(submit_form))
        .route("/clear", post(clear_form))
        .route("/export", get(export_history))
        // JSON API
        .route("/api/chat", post(send_chat))
        .route("/api/reactions", post(set_reaction))
        .route("/api/clear", post(clear_chat))
        .route("/api/session", get(get_session))
        // Static assets
        .route("/assets/*path", get(serve_static))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Page
// ============================================================

/// Render the page, or apply a reaction click and bounce back to `/`.
///
/// The redirect consumes the signal so reloading does not replay it.
async fn serve_page(
    State(state): State<AppState>,
    session: SessionContext,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    if let Some(signal) = query.reaction {
        {
            let mut guard = session.lock().await;
            let result = signal
                .parse::<ReactionSignal>()
                .and_then(|signal| guard.store_mut().apply(signal.into_command()));
            match result {
                Ok(()) => tracing::info!(
                    session = %guard.id(),
                    signal = %signal,
                    messages = guard.store().len(),
                    "Reaction applied"
                ),
                Err(e) => tracing::warn!(
                    session = %guard.id(),
                    signal = %signal,
                    error = %e,
                    "Rejected reaction signal"
                ),
            }
        }
        return Ok(session.respond(Redirect::to("/")));
    }

    let html = {
        let guard = session.lock().await;
        state.renderer.render_page(guard.store())?
    };
    Ok(session.respond(Html(html)))
}

async fn submit_form(
    State(state): State<AppState>,
    session: SessionContext,
    Form(form): Form<ChatForm>,
) -> Result<Response, AppError> {
    {
        let mut guard = session.lock().await;
        state.sessions.submit(&mut guard, &form.prompt).await?;
    }
    Ok(session.respond(Redirect::to("/")))
}

async fn clear_form(session: SessionContext) -> Response {
    session.lock().await.clear_all();
    session.respond(Redirect::to("/"))
}

async fn export_history(
    session: SessionContext,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let snapshot = session
        .lock()
        .await
        .export_snapshot(query.reactions)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let disposition = format!("attachment; filename=\"{}\"", snapshot.file_name);
    Ok(session.respond((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        snapshot.body,
    )))
}

// ============================================================
// JSON API
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    session: SessionContext,
    Json(req): Json<ChatRequest>,
) -> Result<Response, AppError> {
    let exchange = {
        let mut guard = session.lock().await;
        state.sessions.submit(&mut guard, &req.text).await?
    };
    Ok(session.respond(Json(ChatResponse {
        user: exchange.user,
        bot: exchange.bot,
    })))
}

async fn set_reaction(
    session: SessionContext,
    Json(req): Json<ReactionRequest>,
) -> Result<Response, AppError> {
    let emoji: Emoji = req.emoji.parse()?;
    {
        let mut guard = session.lock().await;
        guard.store_mut().apply(Command::SetReaction {
            index: req.index,
            emoji,
        })?;
    }
    Ok(session.respond(StatusCode::NO_CONTENT))
}

async fn clear_chat(session: SessionContext) -> Response {
    session.lock().await.clear_all();
    session.respond(Json(SuccessResponse { success: true }))
}

async fn get_session(session: SessionContext) -> Response {
    let body = {
        let guard = session.lock().await;
        SessionResponse {
            messages: guard.store().messages().to_vec(),
            reactions: guard.store().reactions().to_vec(),
        }
    };
    session.respond(Json(body))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    BadGateway(String),
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptyPrompt => AppError::BadRequest(e.to_string()),
            ChatError::Generation(_) => AppError::BadGateway(e.to_string()),
        }
    }
}

impl From<ReactionError> for AppError {
    fn from(e: ReactionError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        }

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
