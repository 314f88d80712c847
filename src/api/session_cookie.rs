//! Session resolution from the request cookie

use super::AppState;
use crate::runtime::SessionHandle;
use crate::session::Session;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue},
    response::{IntoResponse, Response},
};
use axum_extra::{headers::Cookie, TypedHeader};
use std::convert::Infallible;
use tokio::sync::MutexGuard;

pub const SESSION_COOKIE: &str = "quick_chat_session";

/// The caller's session, created on first contact
pub struct SessionContext {
    handle: SessionHandle,
    /// Set when the session was just created and the browser must learn its id
    set_cookie: Option<String>,
}

impl SessionContext {
    /// Lock the session for the rest of the request
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        let mut session = self.handle.lock().await;
        session.touch();
        session
    }

    /// Attach the session cookie to a response when needed
    pub fn respond(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if let Some(cookie) = self.set_cookie {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => tracing::warn!(error = %e, "Invalid session cookie value"),
            }
        }
        response
    }
}

fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

#[async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Option::<TypedHeader<Cookie>>::from_request_parts(parts, state)
            .await
            .unwrap_or(None);
        let known_id = cookies
            .as_ref()
            .and_then(|TypedHeader(cookie)| cookie.get(SESSION_COOKIE));

        let (id, handle, created) = state.sessions.get_or_create(known_id).await;

        Ok(Self {
            handle,
            set_cookie: created.then(|| session_cookie(&id)),
        })
    }
}
