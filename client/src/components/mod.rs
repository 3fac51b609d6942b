//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the sidebar, the conversation, and the connection modal
//! while reading shared state from Leptos context providers. All mutations go
//! through the session stores or `ConnectState` transitions.

pub mod chat_panel;
pub mod connect_modal;
pub mod sidebar;
