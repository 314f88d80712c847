//! Session registry and the submit flow
//!
//! Each session sits behind its own async mutex. A submission holds that
//! lock until the bot reply is recorded, so one session's interactions run
//! strictly in order while other sessions are unaffected.

use crate::conversation::Message;
use crate::reply_generator::{ChatError, ReplyGenerator};
use crate::session::Session;
use chrono::Local;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

pub type SessionHandle = Arc<Mutex<Session>>;

/// The two records produced by one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub user: Message,
    pub bot: Message,
}

/// Owns every live session and the shared reply generator
pub struct SessionManager {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    replies: ReplyGenerator,
}

impl SessionManager {
    pub fn new(replies: ReplyGenerator) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            replies,
        }
    }

    /// Look up a session by id, starting a fresh one when unknown.
    ///
    /// A found session is marked active before the registry lock is
    /// released, so the sweeper cannot drop it before the caller locks it.
    /// A session that is already locked is mid-submission and is refreshed
    /// when that submission ends.
    ///
    /// Returns the session's id, its handle and whether it was created.
    pub async fn get_or_create(&self, id: Option<&str>) -> (String, SessionHandle, bool) {
        if let Some(id) = id {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(id) {
                if let Ok(mut session) = handle.try_lock() {
                    session.touch();
                }
                return (id.to_string(), handle.clone(), false);
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let handle = Arc::new(Mutex::new(Session::initialize(id.clone())));
        self.sessions
            .write()
            .await
            .insert(id.clone(), handle.clone());
        tracing::info!(session = %id, "Session initialized");

        (id, handle, true)
    }

    /// Record the user's message, generate a reply and record it.
    ///
    /// Both records share the submission timestamp. When generation fails
    /// the user record stays and the error is returned.
    pub async fn submit(&self, session: &mut Session, text: &str) -> Result<Exchange, ChatError> {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        self.submit_at(session, text, &timestamp).await
    }

    async fn submit_at(
        &self,
        session: &mut Session,
        text: &str,
        timestamp: &str,
    ) -> Result<Exchange, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        session.touch();

        let user = Message::user(text, timestamp);
        session.store_mut().append(user.clone());
        tracing::info!(
            session = %session.id(),
            chars = text.chars().count(),
            "User message recorded"
        );

        let reply = self.replies.generate(text).await;
        // Generation can outlast the idle window
        session.touch();

        let bot = Message::bot(reply?, timestamp);
        session.store_mut().append(bot.clone());

        Ok(Exchange { user, bot })
    }

    /// Drop sessions idle for longer than `max_idle`.
    ///
    /// Sessions that are mid-submission are locked and therefore kept.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.idle_since().elapsed() < max_idle,
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn model_id(&self) -> &str {
        self.replies.model_id()
    }
}
