//! Commands that mutate a conversation

use super::{Emoji, ReactionError};
use std::str::FromStr;

/// State changes a session makes to existing records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetReaction { index: usize, emoji: Emoji },
    ClearAll,
}

/// A reaction click delivered as `<index>-<emoji>` in the page query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionSignal {
    pub index: usize,
    pub emoji: Emoji,
}

impl ReactionSignal {
    pub fn into_command(self) -> Command {
        Command::SetReaction {
            index: self.index,
            emoji: self.emoji,
        }
    }
}

impl FromStr for ReactionSignal {
    type Err = ReactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, emoji) = s
            .split_once('-')
            .ok_or_else(|| ReactionError::MalformedSignal(s.to_string()))?;
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| ReactionError::MalformedSignal(s.to_string()))?;
        let emoji = emoji.parse::<Emoji>()?;
        Ok(Self { index, emoji })
    }
}
