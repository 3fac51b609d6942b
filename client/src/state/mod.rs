//! Reactive state modules for the client application.
//!
//! ARCHITECTURE
//! ============
//! Domain state (`ConversationState`, `ThreadListState`, `ConnectState`) is
//! defined in the `threads` crate and held here in `RwSignal` contexts.
//! `session` adapts those signals to the stores; `access` tracks the role.

pub mod access;
pub mod session;
