//! Conversation synchronization core for the data-reporting chat client.
//!
//! This crate is UI-framework agnostic. The Leptos `client` and the terminal
//! `cli` both drive the same stores; each supplies its own HTTP transport by
//! implementing [`service::ChatService`] and its own shared cell by
//! implementing [`cell::StateCell`].
//!
//! LAYERS
//! ======
//! - `wire`: upstream payload shapes, normalized into one canonical form.
//! - `timeline`: merges paired human/assistant arrays into typed messages.
//! - `conversation`: active thread state, optimistic sends, last-request-wins loads.
//! - `thread_list`: sidebar inventory and selection.
//! - `session`: both stores wired together with thread-created notifications.
//! - `connect`: database-connection form validation and submission.

pub mod cell;
pub mod connect;
pub mod conversation;
pub mod error;
pub mod permissions;
pub mod service;
pub mod session;
pub mod thread_list;
pub mod timeline;
pub mod wire;

#[cfg(test)]
mod test_support;

pub use cell::StateCell;
pub use conversation::{ConversationState, ConversationStore, SendOutcome};
pub use error::ApiError;
pub use service::ChatService;
pub use session::{ChatSession, SessionEvent};
pub use thread_list::{ThreadListState, ThreadListStore};
pub use timeline::{Message, Role};
pub use wire::{PostReply, RawThread, ThreadSummary};
