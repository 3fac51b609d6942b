//! Same-origin proxy to the assistant service.
//!
//! DESIGN
//! ======
//! Upstream status codes and bodies are relayed unchanged so the browser's
//! own error mapping (`detail` first, then `message`, then the raw body)
//! applies to real upstream failures. Only failures to reach the upstream at
//! all are answered here, as a gateway error with a JSON `detail`.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use threads::wire::{CHAT_PATH, CONNECT_DB_PATH, DbConnectRequest, PostMessageBody, THREAD_ID_PARAM};

use crate::state::AppState;

/// Failures to complete the upstream exchange.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("assistant service unreachable: {0}")]
    Unreachable(String),

    #[error("assistant service timed out")]
    Timeout,

    #[error("assistant service response unreadable: {0}")]
    Body(String),
}

impl ProxyError {
    fn from_send(e: &reqwest::Error) -> Self {
        if e.is_timeout() { Self::Timeout } else { Self::Unreachable(e.to_string()) }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Unreachable(_) | Self::Body(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "upstream call failed");
        (self.status(), Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ThreadQuery {
    pub thread_id: Option<String>,
}

impl ThreadQuery {
    fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageIn {
    pub message: String,
}

/// `GET /api/chat[?thread_id=]`: thread listing or one thread's history.
pub async fn get_chat(State(state): State<AppState>, Query(query): Query<ThreadQuery>) -> Result<Response, ProxyError> {
    let mut request = state.http.get(upstream_url(&state.config.chat_api_url, CHAT_PATH));
    if let Some(thread_id) = query.thread_id() {
        request = request.query(&[(THREAD_ID_PARAM, thread_id)]);
    }
    forward(request, "GET /chat").await
}

/// `POST /api/chat[?thread_id=]`: send one user message.
pub async fn post_chat(
    State(state): State<AppState>,
    Query(query): Query<ThreadQuery>,
    Json(body): Json<MessageIn>,
) -> Result<Response, ProxyError> {
    let mut request = state.http.post(upstream_url(&state.config.chat_api_url, CHAT_PATH));
    if let Some(thread_id) = query.thread_id() {
        request = request.query(&[(THREAD_ID_PARAM, thread_id)]);
    }
    forward(request.json(&PostMessageBody { message: &body.message }), "POST /chat").await
}

/// `POST /api/connect-db`: configure the reporting database.
pub async fn connect_db(
    State(state): State<AppState>,
    Json(body): Json<DbConnectRequest>,
) -> Result<Response, ProxyError> {
    tracing::info!(db_type = body.db_type.wire_name(), "forwarding database connection");
    let request = state
        .http
        .post(upstream_url(&state.config.connect_api_url, CONNECT_DB_PATH))
        .json(&body);
    forward(request, "POST /connect-db").await
}

fn upstream_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Send `request` and relay the upstream status, content type, and body.
async fn forward(request: reqwest::RequestBuilder, route: &'static str) -> Result<Response, ProxyError> {
    let started = Instant::now();
    let upstream = request.send().await.map_err(|e| ProxyError::from_send(&e))?;
    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok());
    let body = upstream.bytes().await.map_err(|e| ProxyError::Body(e.to_string()))?;

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if status.is_success() {
        tracing::info!(route, status = status.as_u16(), elapsed_ms, "proxied upstream call");
    } else {
        tracing::warn!(route, status = status.as_u16(), elapsed_ms, "upstream returned error status");
    }

    let mut response = (status, body).into_response();
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    Ok(response)
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod proxy_test;
