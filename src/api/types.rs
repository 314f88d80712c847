//! API request and response types

use crate::conversation::{Emoji, Message};
use serde::{Deserialize, Serialize};

/// Chat form posted by the page
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub prompt: String,
}

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response for chat action
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub user: Message,
    pub bot: Message,
}

/// Explicit reaction command
#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    pub index: usize,
    pub emoji: String,
}

/// Query accepted by the page route
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Reaction click encoded as `<index>-<emoji>`
    pub reaction: Option<String>,
}

/// Query accepted by the export route
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub reactions: bool,
}

/// Snapshot of a session's conversation
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub messages: Vec<Message>,
    pub reactions: Vec<Option<Emoji>>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
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
