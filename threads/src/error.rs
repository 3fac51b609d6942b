//! Error taxonomy for remote chat calls.
//!
//! Stores never hand an `ApiError` to presentation code directly; they map it
//! through [`ApiError::user_message`] or one of the fixed strings below.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Replaces the pending assistant entry when a send fails.
pub const SEND_FAILED_MESSAGE: &str = "Failed to get a response. Please try again.";

/// Inline indicator shown when a thread cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load conversation.";

/// Sidebar indicator shown when the thread list cannot be fetched.
pub const LIST_FAILED_MESSAGE: &str = "Failed to load conversations.";

/// Errors produced by [`crate::service::ChatService`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (network, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl ApiError {
    /// Text suitable for an inline error banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Unable to reach the assistant service.".to_owned(),
            Self::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Server { status, .. } => format!("Request failed with status {status}."),
            Self::MalformedPayload(_) => "The assistant service returned an unexpected response.".to_owned(),
        }
    }

    /// Short machine-friendly label used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::MalformedPayload(_) => "malformed_payload",
        }
    }
}
