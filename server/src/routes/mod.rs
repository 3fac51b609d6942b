//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the same-origin API used by the browser and stitches it
//! with Leptos SSR rendering under a single Axum router. The assistant
//! endpoints are proxied upstream so the browser never talks to the
//! assistant service directly.

pub mod proxy;
pub mod session;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use client::net::api::API_PREFIX;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use threads::permissions::SESSION_PATH;
use threads::wire::{CHAT_PATH, CONNECT_DB_PATH};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Browser-facing API routes.
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route(&format!("{API_PREFIX}{CHAT_PATH}"), get(proxy::get_chat).post(proxy::post_chat))
        .route(&format!("{API_PREFIX}{CONNECT_DB_PATH}"), post(proxy::connect_db))
        .route(SESSION_PATH, get(session::session_info))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes + Leptos SSR for `/` and `/chat/{id}` + static `/pkg` assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[package.metadata.leptos]` section or `LEPTOS_*` variables).
pub fn app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    // WASM, CSS, and JS bundles from the site root /pkg directory.
    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .layer(CompressionLayer::new()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
