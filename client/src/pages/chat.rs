//! Chat page for `/` and `/chat/:id`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Starts the session once per mount: the thread list is refreshed and the
//! routed thread (or the most recent one) is opened. Later address changes
//! made by the session itself use `pushState` and never reach the router;
//! back/forward navigation within the page does, and is replayed here.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::chat_panel::ChatPanel;
use crate::components::connect_modal::ConnectModal;
use crate::components::sidebar::Sidebar;
use crate::state::session::SessionHandle;

#[component]
pub fn ChatPage() -> impl IntoView {
    let handle = expect_context::<SessionHandle>();
    let params = use_params_map();
    let route_thread = move || params.with(|p| p.get("id"));

    #[cfg(feature = "hydrate")]
    {
        let initial = params.with_untracked(|p| p.get("id"));
        let session = handle.get_value();
        leptos::task::spawn_local(async move {
            session.start(initial.as_deref()).await;
        });
    }

    Effect::new(move |previous: Option<Option<String>>| {
        let current = route_thread();
        if let Some(previous) = previous {
            if previous != current {
                replay_route(handle, current.clone());
            }
        }
        current
    });

    view! {
        <div class="chat-page">
            <Sidebar />
            <ChatPanel />
            <ConnectModal />
        </div>
    }
}

/// Open the thread a history navigation landed on.
fn replay_route(handle: SessionHandle, thread_id: Option<String>) {
    match thread_id {
        Some(thread_id) => {
            #[cfg(feature = "hydrate")]
            {
                let session = handle.get_value();
                leptos::task::spawn_local(async move {
                    session.open_thread(&thread_id).await;
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = thread_id;
            }
        }
        None => handle.with_value(|session| session.select_new()),
    }
}
