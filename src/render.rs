//! Server-side page rendering
//!
//! The page is a pure function of the conversation store: identical state
//! renders to identical bytes. Message content only ever reaches the
//! markup through auto-escaped template variables.

use crate::conversation::{ConversationStore, Emoji};
use minijinja::{context, Environment};
use serde::Serialize;
use thiserror::Error;

const SELECTED_REACTION_STYLE: &str = "font-weight:bold; font-size:1.2em;";
const REACTION_STYLE: &str = "cursor:pointer; margin-right:6px;";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

#[derive(Serialize)]
struct MessageView<'a> {
    index: usize,
    role: &'static str,
    avatar: &'static str,
    content: &'a str,
    timestamp: &'a str,
    reactions: Vec<ReactionView>,
}

#[derive(Serialize)]
struct ReactionView {
    symbol: &'static str,
    selected: bool,
    style: &'static str,
}

fn reaction_picker(selected: Option<Emoji>) -> Vec<ReactionView> {
    Emoji::ALL
        .into_iter()
        .map(|emoji| {
            let is_selected = selected == Some(emoji);
            ReactionView {
                symbol: emoji.symbol(),
                selected: is_selected,
                style: if is_selected {
                    SELECTED_REACTION_STYLE
                } else {
                    REACTION_STYLE
                },
            }
        })
        .collect()
}

/// Scroll the list to its end only when there is something to scroll to
pub fn should_autoscroll(store: &ConversationStore) -> bool {
    !store.is_empty()
}

/// Compiled page templates
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template("page.html", include_str!("../templates/page.html"))?;
        env.add_template("message.html", include_str!("../templates/message.html"))?;
        env.add_template("reactions.html", include_str!("../templates/reactions.html"))?;
        Ok(Self { env })
    }

    /// Render the full chat page for a conversation
    pub fn render_page(&self, store: &ConversationStore) -> Result<String, RenderError> {
        let messages: Vec<MessageView<'_>> = store
            .messages()
            .iter()
            .enumerate()
            .map(|(index, message)| MessageView {
                index,
                role: message.role.as_str(),
                avatar: message.role.avatar(),
                content: &message.content,
                timestamp: &message.timestamp,
                reactions: reaction_picker(store.reaction(index)),
            })
            .collect();

        let template = self.env.get_template("page.html")?;
        Ok(template.render(context! {
            messages => messages,
            autoscroll => should_autoscroll(store),
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Message;

    fn renderer() -> Renderer {
        Renderer::new().unwrap()
    }

    fn exchange() -> ConversationStore {
        let mut store = ConversationStore::new();
        store.append(Message::user("hello", "11:11:11"));
        store.append(Message::bot("hi there", "11:11:11"));
        store
    }

    #[test]
    fn test_empty_page_has_no_scroll_script() {
        let html = renderer().render_page(&ConversationStore::new()).unwrap();
        assert!(html.contains("Quick Chat!"));
        assert!(html.contains("Type your message..."));
        assert!(!html.contains("scrollTop"));
        assert!(!html.contains("chat-row"));
    }

    #[test]
    fn test_non_empty_page_scrolls() {
        let store = exchange();
        assert!(should_autoscroll(&store));
        let html = renderer().render_page(&store).unwrap();
        assert!(html.contains("scrollTop"));
    }

    #[test]
    fn test_role_layouts() {
        let html = renderer().render_page(&exchange()).unwrap();
        let user_pos = html.find("user-msg").unwrap();
        let bot_pos = html.find("bot-msg").unwrap();
        assert!(user_pos < bot_pos);
        assert!(html.contains("🐶"));
        assert!(html.contains("🐱"));
        assert!(html.contains("avatar avatar-bot"));
        assert!(html.contains("justify-content: flex-end;"));
        assert!(html.contains("11:11:11"));
    }

    #[test]
    fn test_reaction_links_encode_index() {
        let html = renderer().render_page(&exchange()).unwrap();
        assert!(html.contains("?reaction=0-"));
        assert!(html.contains("?reaction=1-"));
        assert!(!html.contains("?reaction=2-"));
        assert!(!html.contains(SELECTED_REACTION_STYLE));
    }

    #[test]
    fn test_selected_reaction_is_highlighted() {
        let mut store = exchange();
        store.set_reaction(1, Emoji::Laugh).unwrap();
        let html = renderer().render_page(&store).unwrap();
        assert_eq!(html.matches(SELECTED_REACTION_STYLE).count(), 1);
        // 2 messages x 3 emoji, one selected
        assert_eq!(html.matches(REACTION_STYLE).count(), 5);
        assert!(html.contains(&format!("style=\"{SELECTED_REACTION_STYLE}\">😂</a>")));
    }

    #[test]
    fn test_markup_in_content_is_inert() {
        let mut store = ConversationStore::new();
        store.append(Message::user("<script>alert('x')</script>", "00:00:01"));
        store.append(Message::bot("<b onmouseover=\"steal()\">hi</b>", "00:00:01"));
        let html = renderer().render_page(&store).unwrap();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert("));
        assert!(!html.contains("<b onmouseover"));
        assert!(html.contains("&lt;b onmouseover="));
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut store = exchange();
        store.set_reaction(0, Emoji::ThumbsUp).unwrap();
        let renderer = renderer();
        let first = renderer.render_page(&store).unwrap();
        let second = renderer.render_page(&store).unwrap();
        assert_eq!(first, second);
    }
}
