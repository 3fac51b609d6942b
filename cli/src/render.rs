//! Plain-text rendering of threads and conversations for the terminal.

use std::fmt::Write as _;

use threads::connect::{ConnectField, FieldErrors};
use threads::timeline::{Message, Role};
use threads::wire::ThreadSummary;
use threads::ConversationState;

pub const UNTITLED_CONVERSATION: &str = "New Conversation";
pub const PENDING_TEXT: &str = "Thinking...";

/// One line per thread; the selected one is marked with `*`.
pub fn render_thread_list(items: &[ThreadSummary], selected_id: Option<&str>) -> String {
    if items.is_empty() {
        return "No conversations yet.\n".to_owned();
    }
    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        let marker = if selected_id == Some(item.thread_id.as_str()) { '*' } else { ' ' };
        let _ = write!(out, "{marker} {:>2}. {}", index + 1, item.display_heading());
        if item.message_count > 0 {
            let _ = write!(out, "  [Messages: {}]", item.message_count);
        }
        let _ = writeln!(out, "  ({})", item.thread_id);
    }
    out
}

pub fn render_message(message: &Message) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let content = if message.pending { PENDING_TEXT } else { message.content.as_str() };
    if message.timestamp.is_empty() {
        format!("{speaker}: {content}")
    } else {
        format!("[{}] {speaker}: {content}", message.timestamp)
    }
}

/// Heading, every message, and the inline error if any.
pub fn render_conversation(state: &ConversationState) -> String {
    let title = state
        .heading
        .as_deref()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or(UNTITLED_CONVERSATION);
    let mut out = format!("== {title} ==\n");
    for message in &state.messages {
        let _ = writeln!(out, "{}", render_message(message));
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }
    out
}

pub fn render_field_errors(errors: &FieldErrors) -> String {
    ConnectField::ALL
        .into_iter()
        .filter_map(|field| errors.get(field))
        .map(|message| format!("- {message}\n"))
        .collect()
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
