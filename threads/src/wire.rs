//! Upstream payload shapes and their normalization.
//!
//! SYSTEM CONTEXT
//! ==============
//! The assistant service is loose about its JSON: the assistant array is
//! spelled `ai_response` or `Ai_response`, thread ids sometimes arrive as
//! numbers, and older thread payloads carry a flat `messages` list instead of
//! the paired arrays. Every transport parses through this module so the rest
//! of the crate only ever sees [`RawThread`], [`ThreadSummary`] and
//! [`PostReply`].

#[cfg(test)]
#[path = "wire_test.rs"]
mod wire_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::connect::DbKind;
use crate::error::ApiError;

pub const CHAT_PATH: &str = "/chat";
pub const CONNECT_DB_PATH: &str = "/connect-db";
pub const THREAD_ID_PARAM: &str = "thread_id";

/// Sidebar label for threads the server has not titled yet.
pub const UNTITLED_THREAD: &str = "New Chat";

/// Shown when `/connect-db` succeeds without a `message`.
pub const CONNECT_SUCCESS_MESSAGE: &str = "Successfully connected!";

const AI_RESPONSE_KEYS: [&str; 2] = ["ai_response", "Ai_response"];

// =============================================================================
// CANONICAL SHAPES
// =============================================================================

/// One entry of the `GET /chat` thread listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub thread_id: String,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub message_count: usize,
}

impl ThreadSummary {
    #[must_use]
    pub fn display_heading(&self) -> &str {
        self.heading
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(UNTITLED_THREAD)
    }
}

/// One thread's history as paired arrays.
///
/// `human_message[i]` and `ai_response[i]` belong to the same exchange. A
/// `None` slot is an entry the server reported as null; it keeps its index so
/// pairing is not shifted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawThread {
    pub heading: Option<String>,
    pub human_message: Vec<Option<String>>,
    pub ai_response: Vec<Option<String>>,
    pub human_timestamps: Vec<Option<String>>,
    pub ai_timestamps: Vec<Option<String>>,
}

impl RawThread {
    /// Build a thread from plain string arrays.
    #[must_use]
    pub fn from_pairs<H, A>(human: H, ai: A) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            human_message: human.into_iter().map(|s| Some(s.into())).collect(),
            ai_response: ai.into_iter().map(|s| Some(s.into())).collect(),
            ..Self::default()
        }
    }
}

/// Result of `POST /chat`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostReply {
    /// Present when the server assigned or echoed the thread id.
    pub thread_id: Option<String>,
    pub reply: String,
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PostMessageBody<'a> {
    pub message: &'a str,
}

/// Body of `POST /connect-db`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConnectRequest {
    pub database_uri: String,
    pub db_type: DbKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Normalize the `GET /chat` listing.
///
/// # Errors
///
/// Returns [`ApiError::MalformedPayload`] when the body is neither an array
/// nor an object with a `threads` array. Individual entries without a
/// `thread_id` are skipped.
pub fn parse_thread_list(value: &Value) -> Result<Vec<ThreadSummary>, ApiError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("threads")
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::MalformedPayload("thread list has no `threads` array".to_owned()))?,
        _ => return Err(ApiError::MalformedPayload("thread list is not an array".to_owned())),
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let Some(obj) = item.as_object() else {
            tracing::warn!("skipping non-object thread summary");
            continue;
        };
        let Some(thread_id) = id_field(obj, "thread_id") else {
            tracing::warn!("skipping thread summary without thread_id");
            continue;
        };
        out.push(ThreadSummary {
            thread_id,
            heading: string_field(obj, "heading").or_else(|| string_field(obj, "title")),
            message_count: summary_message_count(obj),
        });
    }
    Ok(out)
}

fn summary_message_count(obj: &Map<String, Value>) -> usize {
    if let Some(count) = obj.get("message_count").and_then(Value::as_u64) {
        return usize::try_from(count).unwrap_or(usize::MAX);
    }
    if let Some(messages) = obj.get("messages").and_then(Value::as_array) {
        return messages.len();
    }
    let human = obj.get("human_message").and_then(Value::as_array).map_or(0, Vec::len);
    let ai = ai_array(obj).and_then(Value::as_array).map_or(0, Vec::len);
    human + ai
}

/// Normalize a `GET /chat?thread_id=` body into paired arrays.
///
/// # Errors
///
/// Returns [`ApiError::MalformedPayload`] when neither message array is
/// present, or when either is present but not an array.
pub fn parse_thread(value: &Value) -> Result<RawThread, ApiError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ApiError::MalformedPayload("thread payload is not an object".to_owned()))?;
    let heading = string_field(obj, "heading").or_else(|| string_field(obj, "title"));

    let human = obj.get("human_message").filter(|v| !v.is_null());
    let ai = ai_array(obj).filter(|v| !v.is_null());

    if human.is_none() && ai.is_none() {
        if let Some(Value::Array(messages)) = obj.get("messages") {
            let mut thread = parse_flat_messages(messages);
            thread.heading = heading;
            return Ok(thread);
        }
        return Err(ApiError::MalformedPayload("thread payload has no message arrays".to_owned()));
    }

    Ok(RawThread {
        heading,
        human_message: entries(human, "human_message")?,
        ai_response: entries(ai, "ai_response")?,
        human_timestamps: lenient_entries(obj.get("human_timestamps")),
        ai_timestamps: lenient_entries(obj.get("ai_timestamps")),
    })
}

/// Older payloads list `{type, content}` objects in order. Pair them up the
/// same way the arrays would be: a user entry opens a slot, an assistant
/// entry fills the open slot or opens its own.
fn parse_flat_messages(messages: &[Value]) -> RawThread {
    let mut thread = RawThread::default();
    for message in messages {
        let Some(obj) = message.as_object() else { continue };
        let role = string_field(obj, "type").or_else(|| string_field(obj, "role"));
        let content = obj.get("content").and_then(entry_text);
        let stamp = string_field(obj, "updateTime").or_else(|| string_field(obj, "createTime"));
        match role.as_deref() {
            Some("user" | "human") => {
                thread.human_message.push(content);
                thread.human_timestamps.push(stamp);
                thread.ai_response.push(None);
                thread.ai_timestamps.push(None);
            }
            Some("assistant" | "ai") => {
                let open = thread.ai_response.last().is_some_and(Option::is_none)
                    && thread.human_message.last().is_some_and(Option::is_some);
                if open {
                    if let Some(slot) = thread.ai_response.last_mut() {
                        *slot = content;
                    }
                    if let Some(slot) = thread.ai_timestamps.last_mut() {
                        *slot = stamp;
                    }
                } else {
                    thread.human_message.push(None);
                    thread.human_timestamps.push(None);
                    thread.ai_response.push(content);
                    thread.ai_timestamps.push(stamp);
                }
            }
            _ => {}
        }
    }
    // A trailing unanswered turn should not leave a padded `None`.
    if thread.ai_response.last().is_some_and(Option::is_none) {
        thread.ai_response.pop();
        thread.ai_timestamps.pop();
    }
    thread
}

/// Normalize the `POST /chat` body.
///
/// # Errors
///
/// Returns [`ApiError::MalformedPayload`] when the body carries no reply text.
pub fn parse_post_reply(value: &Value) -> Result<PostReply, ApiError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ApiError::MalformedPayload("reply payload is not an object".to_owned()))?;

    // The newest reply is the last element; an earlier one is never reused.
    let reply = match ai_array(obj).and_then(Value::as_array) {
        Some(items) => items.last().and_then(entry_text),
        None => string_field(obj, "response"),
    };
    let reply = reply
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ApiError::MalformedPayload("reply payload has no assistant response".to_owned()))?;

    Ok(PostReply {
        thread_id: id_field(obj, "thread_id"),
        reply,
        timestamp: string_field(obj, "timestamp"),
    })
}

/// Message from a successful `POST /connect-db`.
#[must_use]
pub fn parse_connect_reply(value: &Value) -> String {
    value
        .get("message")
        .and_then(entry_text)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| CONNECT_SUCCESS_MESSAGE.to_owned())
}

/// Turn a non-success response body into [`ApiError::Server`].
///
/// `detail` wins over `message`; a structured `detail` (validation lists) is
/// kept as its JSON text. Anything unparseable falls back to the raw body.
#[must_use]
pub fn parse_error_detail(status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| {
            v.get("detail")
                .filter(|d| !d.is_null())
                .or_else(|| v.get("message"))
        })
        .and_then(entry_text)
        .unwrap_or_else(|| body.trim().to_owned());
    ApiError::Server { status, message }
}

/// Decode one HTTP exchange: non-2xx goes through [`parse_error_detail`], an
/// unparseable 2xx body is [`ApiError::MalformedPayload`].
///
/// # Errors
///
/// See above.
pub fn decode_response(status: u16, body: &str) -> Result<Value, ApiError> {
    if !(200..300).contains(&status) {
        return Err(parse_error_detail(status, body));
    }
    serde_json::from_str(body).map_err(|e| ApiError::MalformedPayload(e.to_string()))
}

// =============================================================================
// FIELD HELPERS
// =============================================================================

fn ai_array(obj: &Map<String, Value>) -> Option<&Value> {
    AI_RESPONSE_KEYS.iter().find_map(|key| obj.get(*key))
}

fn entries(value: Option<&Value>, field: &str) -> Result<Vec<Option<String>>, ApiError> {
    match value {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().map(entry_text).collect()),
        Some(_) => Err(ApiError::MalformedPayload(format!("`{field}` is not an array"))),
    }
}

fn lenient_entries(value: Option<&Value>) -> Vec<Option<String>> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(entry_text).collect())
        .unwrap_or_default()
}

fn entry_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn id_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
