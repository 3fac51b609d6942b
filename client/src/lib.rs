//! # client
//!
//! Leptos + WASM frontend for the data-reporting assistant.
//!
//! This crate contains the page, components, reactive state wiring, and the
//! browser HTTP transport. Conversation synchronization itself lives in the
//! `threads` crate; here its stores are backed by `RwSignal`s so every store
//! transition is a single reactive update.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
