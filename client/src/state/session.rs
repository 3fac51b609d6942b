//! Signal-backed session wiring.
//!
//! DESIGN
//! ======
//! The stores in `threads` mutate state through `StateCell`. `SignalCell`
//! implements it over an `RwSignal`, so every store transition is exactly one
//! reactive notification and views never observe a half-applied send.
//! The session itself holds `Rc`s and async futures that are not `Send`, so
//! it lives in a local `StoredValue` rather than a plain context value.

use std::rc::Rc;

use leptos::prelude::*;
use threads::timeline::Clock;
use threads::{ChatSession, ConversationState, StateCell, ThreadListState};

use crate::net::api::HttpChatService;

/// `StateCell` over a Leptos signal.
pub struct SignalCell<T: 'static>(pub RwSignal<T>);

impl<T: 'static> Clone for SignalCell<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for SignalCell<T> {}

impl<T: Send + Sync + 'static> StateCell<T> for SignalCell<T> {
    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.0.try_update(f)
    }

    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.0.try_with_untracked(f)
    }
}

pub type ClientSession = ChatSession<HttpChatService, SignalCell<ConversationState>, SignalCell<ThreadListState>>;

/// Context handle for the page-lifetime session.
pub type SessionHandle = StoredValue<Rc<ClientSession>, LocalStorage>;

/// Build the session over the given signals and store it for the view tree.
pub fn create_session(
    service: HttpChatService,
    conversation: RwSignal<ConversationState>,
    threads: RwSignal<ThreadListState>,
) -> SessionHandle {
    let session = ChatSession::new(service, SignalCell(conversation), SignalCell(threads), client_clock());
    StoredValue::new_local(Rc::new(session))
}

/// Wall clock in epoch milliseconds.
pub fn client_clock() -> Clock {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let clock: Clock = Rc::new(|| js_sys::Date::now() as i64);
        clock
    }
    #[cfg(not(feature = "hydrate"))]
    {
        threads::timeline::system_clock()
    }
}
