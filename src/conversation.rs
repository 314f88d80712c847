//! Per-session conversation state
//!
//! Messages and their reactions live together in a [`ConversationStore`]
//! owned by exactly one session. Records are appended directly; reactions
//! and clears go through [`Command`]s.

mod command;
mod message;
mod store;

#[cfg(test)]
mod proptests;

pub use command::{Command, ReactionSignal};
pub use message::{Emoji, Message, Role};
pub use store::{ConversationStore, ReactionError};
