//! HTTP transport for the assistant service.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning a transport error since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is folded into `threads::ApiError` so the stores decide what
//! the user sees. Non-2xx bodies go through `parse_error_detail`, which keeps
//! the upstream `detail` text when there is one.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use threads::permissions::AccessRole;
use threads::wire::{DbConnectRequest, PostReply, RawThread, ThreadSummary};
use threads::{ApiError, ChatService};

#[cfg(feature = "hydrate")]
use threads::wire::{self, PostMessageBody};

/// Prefix the host mounts the assistant proxy under.
pub const API_PREFIX: &str = "/api";

#[cfg(any(test, feature = "hydrate"))]
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

#[cfg(any(test, feature = "hydrate"))]
fn transport_error(e: impl std::fmt::Display) -> ApiError {
    ApiError::Transport(e.to_string())
}

#[cfg(not(feature = "hydrate"))]
fn unavailable() -> ApiError {
    ApiError::Transport("not available on server".to_owned())
}

#[cfg(feature = "hydrate")]
async fn read_json(resp: gloo_net::http::Response) -> Result<serde_json::Value, ApiError> {
    let status = resp.status();
    let body = resp.text().await.map_err(transport_error)?;
    let decoded = wire::decode_response(status, &body);
    if let Err(e) = &decoded {
        log::warn!("assistant request failed: status={status} kind={} error={e}", e.kind());
    }
    decoded
}

/// `ChatService` over same-origin HTTP.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpChatService {
    base_url: String,
}

impl HttpChatService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    /// Talk to the proxy mounted by the host that served the page.
    pub fn same_origin() -> Self {
        Self::new(API_PREFIX)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ChatService for HttpChatService {
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = endpoint(&self.base_url, wire::CHAT_PATH);
            let resp = gloo_net::http::Request::get(&url)
                .send()
                .await
                .map_err(transport_error)?;
            let value = read_json(resp).await?;
            wire::parse_thread_list(&value)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(unavailable())
        }
    }

    async fn get_thread(&self, thread_id: &str) -> Result<RawThread, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = endpoint(&self.base_url, wire::CHAT_PATH);
            let resp = gloo_net::http::Request::get(&url)
                .query([(wire::THREAD_ID_PARAM, thread_id)])
                .send()
                .await
                .map_err(transport_error)?;
            let value = read_json(resp).await?;
            wire::parse_thread(&value)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = thread_id;
            Err(unavailable())
        }
    }

    async fn post_message(&self, thread_id: Option<&str>, text: &str) -> Result<PostReply, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = endpoint(&self.base_url, wire::CHAT_PATH);
            let mut builder = gloo_net::http::Request::post(&url);
            if let Some(thread_id) = thread_id {
                builder = builder.query([(wire::THREAD_ID_PARAM, thread_id)]);
            }
            let resp = builder
                .json(&PostMessageBody { message: text })
                .map_err(transport_error)?
                .send()
                .await
                .map_err(transport_error)?;
            let value = read_json(resp).await?;
            wire::parse_post_reply(&value)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (thread_id, text);
            Err(unavailable())
        }
    }

    async fn configure_database(&self, request: &DbConnectRequest) -> Result<String, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = endpoint(&self.base_url, wire::CONNECT_DB_PATH);
            let resp = gloo_net::http::Request::post(&url)
                .json(request)
                .map_err(transport_error)?
                .send()
                .await
                .map_err(transport_error)?;
            let value = read_json(resp).await?;
            Ok(wire::parse_connect_reply(&value))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(unavailable())
        }
    }
}

/// Fetch the deployment's access role from the host.
/// Falls back to the unprivileged role on any failure or on the server.
pub async fn fetch_access_role() -> AccessRole {
    #[cfg(feature = "hydrate")]
    {
        let Ok(resp) = gloo_net::http::Request::get(threads::permissions::SESSION_PATH)
            .send()
            .await
        else {
            return AccessRole::default();
        };
        if !resp.ok() {
            return AccessRole::default();
        }
        resp.json::<threads::permissions::SessionInfo>()
            .await
            .map(|info| info.role)
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        AccessRole::default()
    }
}
