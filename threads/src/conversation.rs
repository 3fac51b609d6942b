//! Active-conversation state and its synchronization with the remote store.
//!
//! DESIGN
//! ======
//! Every remote round trip is split into a synchronous `begin_*` transition
//! that hands out a ticket and a synchronous `finish_*` transition that
//! consumes it. The ticket carries the state generation at the time of the
//! request; any `begin_load` or `reset` bumps the generation, so a late
//! response is recognized as superseded and dropped. This is the
//! last-request-wins rule for rapid thread switching. Nothing is cancelled
//! at the transport level.
//!
//! INVARIANTS
//! ==========
//! - At most one pending message, always last, always assistant.
//! - `sending` is true exactly when a pending message exists.
//! - The timeline is append-only while a thread is active: a failed turn is
//!   rewritten in place, never removed.

#[cfg(test)]
#[path = "conversation_test.rs"]
mod conversation_test;

use crate::cell::StateCell;
use crate::error::{ApiError, LOAD_FAILED_MESSAGE, SEND_FAILED_MESSAGE};
use crate::service::ChatService;
use crate::timeline::{Clock, Message, build_timeline, format_timestamp};
use crate::wire::{PostReply, RawThread};

/// Identifies one `load` request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Identifies one in-flight send and the thread it was posted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendTicket {
    generation: u64,
    thread_id: Option<String>,
}

impl SendTicket {
    #[must_use]
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }
}

/// What the caller needs to issue the POST after `begin_send`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendRequest {
    pub ticket: SendTicket,
    pub text: String,
}

/// Result of reconciling a send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The pending entry now holds the reply.
    Replied { created_thread: Option<String> },
    /// The pending entry now holds [`SEND_FAILED_MESSAGE`].
    Failed(ApiError),
    /// The user moved to another thread before the reply arrived. The
    /// timeline was not touched, but a thread the server created is still
    /// reported so the thread list can pick it up.
    Superseded { created_thread: Option<String> },
}

impl SendOutcome {
    #[must_use]
    pub fn created_thread(&self) -> Option<&str> {
        match self {
            Self::Replied { created_thread } | Self::Superseded { created_thread } => created_thread.as_deref(),
            Self::Failed(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationState {
    /// `None` until the server assigns an id on the first reply.
    pub thread_id: Option<String>,
    pub heading: Option<String>,
    pub messages: Vec<Message>,
    pub sending: bool,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl ConversationState {
    /// Start loading `thread_id`, superseding any outstanding request.
    pub fn begin_load(&mut self, thread_id: &str) -> LoadTicket {
        self.generation += 1;
        self.thread_id = Some(thread_id.to_owned());
        self.heading = None;
        self.messages.clear();
        self.sending = false;
        self.loading = true;
        self.error = None;
        LoadTicket { generation: self.generation }
    }

    /// Apply a load result. Returns `false` when the ticket was superseded.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<RawThread, ApiError>, now_ms: i64) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(thread_id = ?self.thread_id, "dropping superseded thread load");
            return false;
        }
        self.loading = false;
        match result {
            Ok(thread) => {
                self.messages = build_timeline(&thread, now_ms);
                self.heading = thread.heading;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(thread_id = ?self.thread_id, kind = e.kind(), error = %e, "thread load failed");
                self.messages.clear();
                self.error = Some(LOAD_FAILED_MESSAGE.to_owned());
            }
        }
        true
    }

    /// Clear to a fresh, unpersisted conversation.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self { generation, ..Self::default() };
    }

    /// Optimistically append the user turn and a pending reply.
    ///
    /// `None` (state untouched) for blank text, while a send is in flight,
    /// or while a thread is still loading.
    pub fn begin_send(&mut self, text: &str, now_ms: i64) -> Option<SendRequest> {
        let text = text.trim();
        if text.is_empty() || self.sending || self.loading {
            return None;
        }
        let stamp = format_timestamp(now_ms);
        self.messages.push(Message::user(text, stamp.clone()));
        self.messages.push(Message::pending(stamp));
        self.sending = true;
        self.error = None;
        Some(SendRequest {
            ticket: SendTicket { generation: self.generation, thread_id: self.thread_id.clone() },
            text: text.to_owned(),
        })
    }

    /// Replace the pending entry with the reply or the failure text.
    pub fn finish_send(&mut self, ticket: SendTicket, result: Result<PostReply, ApiError>, now_ms: i64) -> SendOutcome {
        if ticket.generation != self.generation {
            let created_thread = result
                .ok()
                .and_then(|reply| reply.thread_id)
                .filter(|id| ticket.thread_id.as_deref() != Some(id.as_str()));
            tracing::debug!(?created_thread, "dropping superseded reply");
            return SendOutcome::Superseded { created_thread };
        }

        let outcome = match result {
            Ok(reply) => {
                let timestamp = reply.timestamp.unwrap_or_else(|| format_timestamp(now_ms));
                self.settle_pending(Message::assistant(reply.reply, timestamp));
                let created_thread = reply.thread_id.filter(|id| self.thread_id.as_deref() != Some(id.as_str()));
                if let Some(id) = &created_thread {
                    tracing::info!(thread_id = %id, "adopting server-assigned thread id");
                    self.thread_id = Some(id.clone());
                }
                SendOutcome::Replied { created_thread }
            }
            Err(e) => {
                tracing::warn!(thread_id = ?self.thread_id, kind = e.kind(), error = %e, "send failed");
                self.settle_pending(Message::assistant(SEND_FAILED_MESSAGE, format_timestamp(now_ms)));
                SendOutcome::Failed(e)
            }
        };
        self.sending = false;
        outcome
    }

    fn settle_pending(&mut self, message: Message) {
        match self.messages.last_mut() {
            Some(last) if last.pending => *last = message,
            _ => self.messages.push(message),
        }
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.pending).count()
    }

    /// `true` when the pending-message invariants hold.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let pending = self.pending_count();
        let last_pending = self.messages.last().is_some_and(|m| m.pending);
        pending <= 1 && (pending == 0 || last_pending) && self.sending == (pending == 1)
    }

    /// Override the heading locally. Returns the trimmed title, or `None`
    /// (state untouched) when it is blank.
    pub fn rename(&mut self, title: &str) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        self.heading = Some(title.to_owned());
        Some(title.to_owned())
    }

    /// Empty, settled conversation: the welcome panel.
    #[must_use]
    pub fn show_welcome(&self) -> bool {
        self.messages.is_empty() && !self.loading && self.error.is_none()
    }
}

/// Drives [`ConversationState`] transitions over a [`ChatService`].
pub struct ConversationStore<S, C> {
    service: S,
    state: C,
    clock: Clock,
}

impl<S, C> ConversationStore<S, C>
where
    S: ChatService,
    C: StateCell<ConversationState>,
{
    pub fn new(service: S, state: C, clock: Clock) -> Self {
        Self { service, state, clock }
    }

    pub fn state(&self) -> &C {
        &self.state
    }

    /// Fetch and show `thread_id`. Returns `false` when a newer request
    /// superseded this one before it resolved.
    pub async fn load(&self, thread_id: &str) -> bool {
        let Some(ticket) = self.state.update(|s| s.begin_load(thread_id)) else {
            return false;
        };
        tracing::debug!(thread_id, "loading thread");
        let result = self.service.get_thread(thread_id).await;
        let now = (self.clock)();
        self.state.update(|s| s.finish_load(ticket, result, now)).unwrap_or(false)
    }

    /// Optimistic send. `None` when the text was rejected.
    pub async fn send_user_message(&self, text: &str) -> Option<SendOutcome> {
        let now = (self.clock)();
        let request = self.state.update(|s| s.begin_send(text, now)).flatten()?;
        let result = self.service.post_message(request.ticket.thread_id(), &request.text).await;
        let now = (self.clock)();
        self.state.update(|s| s.finish_send(request.ticket, result, now))
    }

    pub fn reset(&self) {
        self.state.update(ConversationState::reset);
    }

    pub fn rename(&self, title: &str) -> Option<String> {
        self.state.update(|s| s.rename(title)).flatten()
    }
}
