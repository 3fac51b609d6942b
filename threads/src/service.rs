//! Transport seam for the remote chat service.
//!
//! Implementations perform exactly one request per call and no retries. They
//! normalize response bodies through [`crate::wire`] before returning, so
//! callers never see upstream key-spelling differences.

#![allow(async_fn_in_trait)]

use crate::error::ApiError;
use crate::wire::{DbConnectRequest, PostReply, RawThread, ThreadSummary};

pub trait ChatService {
    /// `GET /chat`
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, ApiError>;

    /// `GET /chat?thread_id=<id>`
    async fn get_thread(&self, thread_id: &str) -> Result<RawThread, ApiError>;

    /// `POST /chat[?thread_id=<id>]` with `{ "message": text }`
    async fn post_message(&self, thread_id: Option<&str>, text: &str) -> Result<PostReply, ApiError>;

    /// `POST /connect-db`; the success message on `Ok`.
    async fn configure_database(&self, request: &DbConnectRequest) -> Result<String, ApiError>;
}

impl<S: ChatService> ChatService for std::rc::Rc<S> {
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, ApiError> {
        (**self).list_threads().await
    }

    async fn get_thread(&self, thread_id: &str) -> Result<RawThread, ApiError> {
        (**self).get_thread(thread_id).await
    }

    async fn post_message(&self, thread_id: Option<&str>, text: &str) -> Result<PostReply, ApiError> {
        (**self).post_message(thread_id, text).await
    }

    async fn configure_database(&self, request: &DbConnectRequest) -> Result<String, ApiError> {
        (**self).configure_database(request).await
    }
}
