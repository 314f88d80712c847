//! Session lifecycle
//!
//! A session owns one conversation for as long as the browser keeps its
//! cookie. It can be cleared and exported but never persisted.

use crate::conversation::{Command, ConversationStore, Emoji, Role};
use serde::Serialize;
use std::time::Instant;

/// File name offered for the history download
pub const EXPORT_FILE_NAME: &str = "chat_history.json";

/// One user's interactive session
#[derive(Debug)]
pub struct Session {
    id: String,
    store: ConversationStore,
    last_active: Instant,
}

/// Serialized history ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSnapshot {
    pub file_name: &'static str,
    pub body: String,
}

#[derive(Serialize)]
struct ExportRecord<'a> {
    role: Role,
    content: &'a str,
    timestamp: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reaction: Option<Option<Emoji>>,
}

impl Session {
    /// Start a session with an empty conversation
    pub fn initialize(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            store: ConversationStore::new(),
            last_active: Instant::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConversationStore {
        &mut self.store
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn idle_since(&self) -> Instant {
        self.last_active
    }

    /// Remove every message and reaction
    pub fn clear_all(&mut self) {
        // ClearAll cannot fail
        let _ = self.store.apply(Command::ClearAll);
        tracing::info!(session = %self.id, "Conversation cleared");
    }

    /// Serialize the current messages as a pretty JSON array.
    ///
    /// Reactions are left out unless `include_reactions` is set.
    pub fn export_snapshot(
        &self,
        include_reactions: bool,
    ) -> Result<ExportSnapshot, serde_json::Error> {
        let records: Vec<ExportRecord<'_>> = self
            .store
            .messages()
            .iter()
            .zip(self.store.reactions())
            .map(|(message, reaction)| ExportRecord {
                role: message.role,
                content: &message.content,
                timestamp: &message.timestamp,
                reaction: include_reactions.then_some(*reaction),
            })
            .collect();

        let body = serde_json::to_string_pretty(&records)?;
        tracing::info!(
            session = %self.id,
            records = records.len(),
            include_reactions,
            "Conversation exported"
        );

        Ok(ExportSnapshot {
            file_name: EXPORT_FILE_NAME,
            body,
        })
    }
}
