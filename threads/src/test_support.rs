//! In-memory `ChatService` for store tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use futures::channel::oneshot;

use crate::error::ApiError;
use crate::service::ChatService;
use crate::wire::{DbConnectRequest, PostReply, RawThread, ThreadSummary};

type Gate<T> = oneshot::Receiver<Result<T, ApiError>>;

#[derive(Default)]
pub struct MockService {
    threads: RefCell<HashMap<String, Result<RawThread, ApiError>>>,
    thread_gates: RefCell<HashMap<String, Gate<RawThread>>>,
    lists: RefCell<VecDeque<Result<Vec<ThreadSummary>, ApiError>>>,
    list_gates: RefCell<VecDeque<Gate<Vec<ThreadSummary>>>>,
    replies: RefCell<VecDeque<Result<PostReply, ApiError>>>,
    reply_gates: RefCell<VecDeque<Gate<PostReply>>>,
    connects: RefCell<VecDeque<Result<String, ApiError>>>,
    pub posted: RefCell<Vec<(Option<String>, String)>>,
    pub loaded: RefCell<Vec<String>>,
    pub connect_requests: RefCell<Vec<DbConnectRequest>>,
    pub list_calls: RefCell<usize>,
}

impl MockService {
    pub fn with_thread(self, thread_id: &str, result: Result<RawThread, ApiError>) -> Self {
        self.threads.borrow_mut().insert(thread_id.to_owned(), result);
        self
    }

    pub fn gate_thread(&self, thread_id: &str) -> oneshot::Sender<Result<RawThread, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.thread_gates.borrow_mut().insert(thread_id.to_owned(), rx);
        tx
    }

    pub fn push_list(&self, result: Result<Vec<ThreadSummary>, ApiError>) {
        self.lists.borrow_mut().push_back(result);
    }

    pub fn gate_list(&self) -> oneshot::Sender<Result<Vec<ThreadSummary>, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.borrow_mut().push_back(rx);
        tx
    }

    pub fn push_reply(&self, result: Result<PostReply, ApiError>) {
        self.replies.borrow_mut().push_back(result);
    }

    pub fn gate_reply(&self) -> oneshot::Sender<Result<PostReply, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.reply_gates.borrow_mut().push_back(rx);
        tx
    }

    pub fn push_connect(&self, result: Result<String, ApiError>) {
        self.connects.borrow_mut().push_back(result);
    }
}

async fn open<T>(gate: Gate<T>) -> Result<T, ApiError> {
    gate.await.unwrap_or_else(|_| Err(ApiError::Transport("gate dropped".to_owned())))
}

impl ChatService for MockService {
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, ApiError> {
        *self.list_calls.borrow_mut() += 1;
        let gate = self.list_gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            return open(gate).await;
        }
        self.lists.borrow_mut().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_thread(&self, thread_id: &str) -> Result<RawThread, ApiError> {
        self.loaded.borrow_mut().push(thread_id.to_owned());
        let gate = self.thread_gates.borrow_mut().remove(thread_id);
        if let Some(gate) = gate {
            return open(gate).await;
        }
        self.threads
            .borrow()
            .get(thread_id)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Server { status: 404, message: "thread not found".to_owned() }))
    }

    async fn post_message(&self, thread_id: Option<&str>, text: &str) -> Result<PostReply, ApiError> {
        self.posted.borrow_mut().push((thread_id.map(str::to_owned), text.to_owned()));
        let gate = self.reply_gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            return open(gate).await;
        }
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no reply scripted".to_owned())))
    }

    async fn configure_database(&self, request: &DbConnectRequest) -> Result<String, ApiError> {
        self.connect_requests.borrow_mut().push(request.clone());
        self.connects
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok("Successfully connected!".to_owned()))
    }
}

pub fn reply(thread_id: Option<&str>, text: &str) -> PostReply {
    PostReply { thread_id: thread_id.map(str::to_owned), reply: text.to_owned(), timestamp: None }
}

pub fn summary(thread_id: &str, heading: Option<&str>) -> ThreadSummary {
    ThreadSummary { thread_id: thread_id.to_owned(), heading: heading.map(str::to_owned), message_count: 0 }
}
