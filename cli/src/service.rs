//! `ChatService` over `reqwest`, talking to the assistant service directly
//! (or to the web host's `/api` proxy, which speaks the same protocol).

use std::time::Duration;

use serde_json::Value;
use threads::wire::{self, DbConnectRequest, PostMessageBody, PostReply, RawThread, ThreadSummary};
use threads::{ApiError, ChatService};

#[derive(Clone, Debug)]
pub struct ReqwestChatService {
    base_url: String,
    http: reqwest::Client,
}

impl ReqwestChatService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: base_url.trim_end_matches('/').to_owned(), http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn transport_error(e: &reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Transport("request timed out".to_owned())
    } else {
        ApiError::Transport(e.to_string())
    }
}

async fn send_json(request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
    let response = request.send().await.map_err(|e| transport_error(&e))?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| transport_error(&e))?;
    let decoded = wire::decode_response(status, &body);
    if let Err(e) = &decoded {
        tracing::debug!(status, kind = e.kind(), error = %e, "assistant request failed");
    }
    decoded
}

impl ChatService for ReqwestChatService {
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, ApiError> {
        let value = send_json(self.http.get(self.url(wire::CHAT_PATH))).await?;
        wire::parse_thread_list(&value)
    }

    async fn get_thread(&self, thread_id: &str) -> Result<RawThread, ApiError> {
        let request = self
            .http
            .get(self.url(wire::CHAT_PATH))
            .query(&[(wire::THREAD_ID_PARAM, thread_id)]);
        let value = send_json(request).await?;
        wire::parse_thread(&value)
    }

    async fn post_message(&self, thread_id: Option<&str>, text: &str) -> Result<PostReply, ApiError> {
        let mut request = self.http.post(self.url(wire::CHAT_PATH));
        if let Some(thread_id) = thread_id {
            request = request.query(&[(wire::THREAD_ID_PARAM, thread_id)]);
        }
        let value = send_json(request.json(&PostMessageBody { message: text })).await?;
        wire::parse_post_reply(&value)
    }

    async fn configure_database(&self, request: &DbConnectRequest) -> Result<String, ApiError> {
        let value = send_json(self.http.post(self.url(wire::CONNECT_DB_PATH)).json(request)).await?;
        Ok(wire::parse_connect_reply(&value))
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;
