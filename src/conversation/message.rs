//! Message and reaction value types

use super::ReactionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }

    /// Avatar glyph shown next to the bubble
    pub fn avatar(self) -> &'static str {
        match self {
            Role::User => "🐶",
            Role::Bot => "🐱",
        }
    }
}

/// A single chat record. Immutable once appended to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Wall-clock time of the submission, `HH:MM:SS`
    pub timestamp: String,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn bot(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// The closed set of reactions a message can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Emoji {
    ThumbsUp,
    Heart,
    Laugh,
}

impl Emoji {
    /// Picker order
    pub const ALL: [Emoji; 3] = [Emoji::ThumbsUp, Emoji::Heart, Emoji::Laugh];

    pub fn symbol(self) -> &'static str {
        match self {
            Emoji::ThumbsUp => "👍",
            Emoji::Heart => "❤️",
            Emoji::Laugh => "😂",
        }
    }
}

impl fmt::Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Emoji {
    type Err = ReactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "👍" => Ok(Emoji::ThumbsUp),
            // Browsers sometimes drop the variation selector
            "❤️" | "❤" => Ok(Emoji::Heart),
            "😂" => Ok(Emoji::Laugh),
            other => Err(ReactionError::UnknownEmoji(other.to_string())),
        }
    }
}

impl TryFrom<String> for Emoji {
    type Error = ReactionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Emoji> for &'static str {
    fn from(emoji: Emoji) -> Self {
        emoji.symbol()
    }
}
