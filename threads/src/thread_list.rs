//! Sidebar thread inventory and selection.
//!
//! Selection is remembered by thread id rather than position, so a refresh
//! that reorders or extends the list keeps the same conversation highlighted.
//! A selected id that is missing from the current list (a thread created a
//! moment ago, before the refresh lands) is kept and simply has no index.

#[cfg(test)]
#[path = "thread_list_test.rs"]
mod thread_list_test;

use crate::cell::StateCell;
use crate::error::{ApiError, LIST_FAILED_MESSAGE};
use crate::service::ChatService;
use crate::wire::ThreadSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThreadListState {
    pub items: Vec<ThreadSummary>,
    /// `None` is the "new conversation" selection.
    pub selected_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl ThreadListState {
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.loading = true;
        RefreshTicket { generation: self.generation }
    }

    /// Apply a listing. Returns `false` for a superseded refresh.
    pub fn finish_refresh(&mut self, ticket: RefreshTicket, result: Result<Vec<ThreadSummary>, ApiError>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.apply_threads(items);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "thread list refresh failed");
                self.error = Some(LIST_FAILED_MESSAGE.to_owned());
            }
        }
        true
    }

    pub fn apply_threads(&mut self, items: Vec<ThreadSummary>) {
        self.items = items;
    }

    /// Select by position. Out-of-range indexes are ignored so a click that
    /// races a refresh cannot select the wrong thread.
    pub fn select_index(&mut self, index: usize) -> Option<String> {
        let thread_id = self.items.get(index)?.thread_id.clone();
        self.selected_id = Some(thread_id.clone());
        Some(thread_id)
    }

    pub fn select_thread(&mut self, thread_id: &str) {
        self.selected_id = Some(thread_id.to_owned());
    }

    pub fn select_new(&mut self) {
        self.selected_id = None;
    }

    /// Show `heading` for `thread_id` until the next refresh replaces it.
    pub fn rename_thread(&mut self, thread_id: &str, heading: &str) {
        if let Some(item) = self.items.iter_mut().find(|item| item.thread_id == thread_id) {
            item.heading = Some(heading.to_owned());
        }
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected_id.as_deref()?;
        self.items.iter().position(|item| item.thread_id == selected)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&ThreadSummary> {
        self.selected_index().and_then(|i| self.items.get(i))
    }
}

pub struct ThreadListStore<S, C> {
    service: S,
    state: C,
}

impl<S, C> ThreadListStore<S, C>
where
    S: ChatService,
    C: StateCell<ThreadListState>,
{
    pub fn new(service: S, state: C) -> Self {
        Self { service, state }
    }

    pub fn state(&self) -> &C {
        &self.state
    }

    /// Replace the list from `GET /chat`. Later refreshes win.
    pub async fn refresh(&self) -> bool {
        let Some(ticket) = self.state.update(ThreadListState::begin_refresh) else {
            return false;
        };
        let result = self.service.list_threads().await;
        if let Ok(items) = &result {
            tracing::debug!(count = items.len(), "thread list fetched");
        }
        self.state.update(|s| s.finish_refresh(ticket, result)).unwrap_or(false)
    }

    pub fn select_index(&self, index: usize) -> Option<String> {
        self.state.update(|s| s.select_index(index)).flatten()
    }

    pub fn select_thread(&self, thread_id: &str) {
        self.state.update(|s| s.select_thread(thread_id));
    }

    pub fn select_new(&self) {
        self.state.update(ThreadListState::select_new);
    }

    pub fn rename_thread(&self, thread_id: &str, heading: &str) {
        self.state.update(|s| s.rename_thread(thread_id, heading));
    }
}
