//! The conversation and thread-list stores wired together.
//!
//! SYSTEM CONTEXT
//! ==============
//! Created once at application start and torn down with the view tree (or
//! the terminal session). It is the only place where a send that creates a
//! thread is turned into a thread-list refresh and a route change.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::cell::StateCell;
use crate::conversation::{ConversationState, ConversationStore, SendOutcome};
use crate::error::ApiError;
use crate::service::ChatService;
use crate::thread_list::{ThreadListState, ThreadListStore};
use crate::timeline::Clock;

pub const ROOT_ROUTE: &str = "/";

/// Browser path for a persisted conversation.
#[must_use]
pub fn thread_route(thread_id: &str) -> String {
    format!("/chat/{thread_id}")
}

/// What happened to a user send, from the session's point of view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Replied,
    /// Replied, and the server assigned this id to the new thread. The
    /// thread list has been refreshed and the thread is still the one on
    /// screen; the caller should update the route.
    ThreadCreated(String),
    Failed(ApiError),
    /// The user switched away before the reply arrived, or before the
    /// list refresh for a newly created thread finished.
    Superseded,
}

pub struct ChatSession<S, CC, LC> {
    conversation: ConversationStore<S, CC>,
    threads: ThreadListStore<S, LC>,
}

impl<S, CC, LC> ChatSession<S, CC, LC>
where
    S: ChatService + Clone,
    CC: StateCell<ConversationState>,
    LC: StateCell<ThreadListState>,
{
    pub fn new(service: S, conversation: CC, threads: LC, clock: Clock) -> Self {
        Self {
            conversation: ConversationStore::new(service.clone(), conversation, clock),
            threads: ThreadListStore::new(service, threads),
        }
    }

    pub fn conversation(&self) -> &ConversationStore<S, CC> {
        &self.conversation
    }

    pub fn threads(&self) -> &ThreadListStore<S, LC> {
        &self.threads
    }

    /// Initial page load. With a routed thread id that thread is opened;
    /// otherwise the most recent thread is, if any exists.
    ///
    /// A routed thread starts loading together with the list, so the
    /// conversation is marked loading (and refuses sends) from the first poll.
    pub async fn start(&self, route_thread: Option<&str>) {
        if let Some(thread_id) = route_thread {
            self.threads.select_thread(thread_id);
            futures::join!(self.threads.refresh(), self.conversation.load(thread_id));
            return;
        }
        self.threads.refresh().await;
        let untouched = self
            .conversation
            .state()
            .with(|s| s.thread_id.is_none() && s.messages.is_empty())
            .unwrap_or(false);
        if untouched {
            self.select_index(0).await;
        }
    }

    /// Highlight and load the thread at `index`. `None` when out of range.
    pub async fn select_index(&self, index: usize) -> Option<String> {
        let thread_id = self.threads.select_index(index)?;
        self.conversation.load(&thread_id).await;
        Some(thread_id)
    }

    /// Highlight and load a thread by id (route entry).
    pub async fn open_thread(&self, thread_id: &str) -> bool {
        self.threads.select_thread(thread_id);
        self.conversation.load(thread_id).await
    }

    /// Start an unpersisted conversation without contacting the server.
    pub fn select_new(&self) {
        self.threads.select_new();
        self.conversation.reset();
    }

    /// Send `text` in the active conversation. `None` when rejected.
    pub async fn send(&self, text: &str) -> Option<SessionEvent> {
        let outcome = self.conversation.send_user_message(text).await?;
        let event = match outcome {
            SendOutcome::Replied { created_thread: Some(thread_id) } => {
                self.threads.select_thread(&thread_id);
                self.threads.refresh().await;
                if self.is_showing(&thread_id) {
                    SessionEvent::ThreadCreated(thread_id)
                } else {
                    SessionEvent::Superseded
                }
            }
            SendOutcome::Replied { created_thread: None } => SessionEvent::Replied,
            SendOutcome::Failed(e) => SessionEvent::Failed(e),
            SendOutcome::Superseded { created_thread } => {
                if created_thread.is_some() {
                    self.threads.refresh().await;
                }
                SessionEvent::Superseded
            }
        };
        Some(event)
    }

    /// Rename the active conversation locally. The heading is not sent to
    /// the server and the next load of the thread restores the server's.
    /// `false` for a blank title.
    pub fn rename(&self, title: &str) -> bool {
        let Some(title) = self.conversation.rename(title) else {
            return false;
        };
        if let Some(thread_id) = self.conversation.state().with(|s| s.thread_id.clone()).flatten() {
            self.threads.rename_thread(&thread_id, &title);
        }
        true
    }

    fn is_showing(&self, thread_id: &str) -> bool {
        self.conversation
            .state()
            .with(|s| s.thread_id.as_deref() == Some(thread_id))
            .unwrap_or(false)
    }
}
