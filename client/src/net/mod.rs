//! Networking modules for the assistant service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` implements the `threads::ChatService` transport over same-origin
//! HTTP; the server proxies those paths to the upstream assistant.

pub mod api;
