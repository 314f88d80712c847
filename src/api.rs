//! HTTP surface for the chat page and its JSON twin

mod assets;
mod handlers;
mod session_cookie;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::render::Renderer;
use crate::runtime::SessionManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub renderer: Arc<Renderer>,
}

impl AppState {
    pub fn new(sessions: Arc<SessionManager>, renderer: Renderer) -> Self {
        Self {
            sessions,
            renderer: Arc::new(renderer),
        }
    }
}
