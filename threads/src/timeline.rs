//! Timeline construction from paired human/assistant arrays.
//!
//! Index order is treated as chronological order: for each index the human
//! turn is emitted before the assistant turn. Nothing here sorts, dedups, or
//! pads. Synthesized timestamps are display-only.

#[cfg(test)]
#[path = "timeline_test.rs"]
mod timeline_test;

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::wire::RawThread;

/// Gap between synthesized timestamps of consecutive timeline entries.
pub const MESSAGE_SPACING_MS: i64 = 60_000;

/// Source of "now" in unix milliseconds.
pub type Clock = Rc<dyn Fn() -> i64>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One chat-timeline entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub pending: bool,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), timestamp: timestamp.into(), pending: false }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), timestamp: timestamp.into(), pending: false }
    }

    /// Placeholder shown while a reply is in flight.
    #[must_use]
    pub fn pending(timestamp: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: String::new(), timestamp: timestamp.into(), pending: true }
    }
}

/// Merge a thread's paired arrays into an ordered message sequence.
#[must_use]
pub fn build_timeline(thread: &RawThread, now_ms: i64) -> Vec<Message> {
    let len = thread.human_message.len().max(thread.ai_response.len());
    let total = (0..len)
        .map(|i| {
            usize::from(slot(&thread.human_message, i).is_some()) + usize::from(slot(&thread.ai_response, i).is_some())
        })
        .sum::<usize>();

    let mut out = Vec::with_capacity(total);
    for i in 0..len {
        if let Some(text) = slot(&thread.human_message, i) {
            let timestamp = entry_timestamp(&thread.human_timestamps, i, out.len(), total, now_ms);
            out.push(Message::user(text, timestamp));
        }
        if let Some(text) = slot(&thread.ai_response, i) {
            let timestamp = entry_timestamp(&thread.ai_timestamps, i, out.len(), total, now_ms);
            out.push(Message::assistant(text, timestamp));
        }
    }
    out
}

fn slot(entries: &[Option<String>], index: usize) -> Option<&str> {
    entries.get(index).and_then(Option::as_deref)
}

fn entry_timestamp(supplied: &[Option<String>], index: usize, position: usize, total: usize, now_ms: i64) -> String {
    if let Some(stamp) = slot(supplied, index) {
        return stamp.to_owned();
    }
    format_timestamp(synthesized_ms(position, total, now_ms))
}

/// Unix millis for the entry at `position` of `total`, the last one at `now_ms`.
#[must_use]
pub fn synthesized_ms(position: usize, total: usize, now_ms: i64) -> i64 {
    let steps_back = total.saturating_sub(position + 1);
    let steps_back = i64::try_from(steps_back).unwrap_or(i64::MAX / MESSAGE_SPACING_MS);
    now_ms.saturating_sub(steps_back.saturating_mul(MESSAGE_SPACING_MS))
}

/// `HH:MM` (UTC) for a unix-millisecond instant; empty when out of range.
#[must_use]
pub fn format_timestamp(ms: i64) -> String {
    let format = format_description!("[hour]:[minute]");
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
        .ok()
        .and_then(|dt| dt.format(&format).ok())
        .unwrap_or_default()
}

/// Wall clock backed by `SystemTime`. Browser builds supply their own.
#[must_use]
pub fn system_clock() -> Clock {
    Rc::new(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    })
}

/// A clock frozen at `ms`, for deterministic callers.
#[must_use]
pub fn fixed_clock(ms: i64) -> Clock {
    Rc::new(move || ms)
}
