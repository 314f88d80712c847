//! Append-only message store with a parallel reaction track

use super::{Command, Emoji, Message};
use thiserror::Error;

/// Errors raised when a reaction cannot be applied
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReactionError {
    #[error("Message index {index} is out of bounds ({len} messages)")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Unsupported reaction: {0}")]
    UnknownEmoji(String),
    #[error("Malformed reaction signal: {0}")]
    MalformedSignal(String),
}

/// Ordered messages plus one optional reaction slot per message.
///
/// `reactions.len() == messages.len()` holds after every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationStore {
    messages: Vec<Message>,
    reactions: Vec<Option<Emoji>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its index
    pub fn append(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.reactions.push(None);
        self.messages.len() - 1
    }

    /// Drop every message and reaction
    pub fn reset(&mut self) {
        self.messages.clear();
        self.reactions.clear();
    }

    /// Set the reaction for a message, replacing any previous one.
    ///
    /// Selecting the emoji that is already set leaves it set.
    pub fn set_reaction(&mut self, index: usize, emoji: Emoji) -> Result<(), ReactionError> {
        let len = self.messages.len();
        let slot = self
            .reactions
            .get_mut(index)
            .ok_or(ReactionError::IndexOutOfBounds { index, len })?;
        *slot = Some(emoji);
        Ok(())
    }

    /// Apply a command to the store
    pub fn apply(&mut self, command: Command) -> Result<(), ReactionError> {
        match command {
            Command::SetReaction { index, emoji } => self.set_reaction(index, emoji)?,
            Command::ClearAll => self.reset(),
        }
        Ok(())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn reactions(&self) -> &[Option<Emoji>] {
        &self.reactions
    }

    pub fn reaction(&self, index: usize) -> Option<Emoji> {
        self.reactions.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
