//! Application shell and root component.
//!
//! SYSTEM CONTEXT
//! ==============
//! `shell` is rendered by the server for every page request; `App` provides
//! the shared state contexts and the session, then routes both `/` and
//! `/chat/:id` to the chat page.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::{ParamSegment, StaticSegment};
use threads::connect::ConnectState;
use threads::{ConversationState, ThreadListState};

use crate::net::api::HttpChatService;
use crate::pages::chat::ChatPage;
use crate::state::access::AccessState;
use crate::state::session::create_session;

pub const APP_TITLE: &str = "AI Data Reporting";

/// HTML document wrapper used for server-side rendering.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let conversation = RwSignal::new(ConversationState::default());
    let thread_list = RwSignal::new(ThreadListState::default());
    let connect = RwSignal::new(ConnectState::default());
    let access = RwSignal::new(AccessState::default());

    let service = HttpChatService::same_origin();
    let session = create_session(service.clone(), conversation, thread_list);

    provide_context(conversation);
    provide_context(thread_list);
    provide_context(connect);
    provide_context(access);
    provide_context(service);
    provide_context(session);

    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(async move {
            let role = crate::net::api::fetch_access_role().await;
            log::debug!("access role resolved: {}", role.as_str());
            access.update(|a| a.apply(role));
        });
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/client.css" />
        <Title text=APP_TITLE />
        <Router>
            <main class="app">
                <Routes fallback=|| "Page not found.">
                    <Route path=StaticSegment("") view=ChatPage />
                    <Route path=(StaticSegment("chat"), ParamSegment("id")) view=ChatPage />
                </Routes>
            </main>
        </Router>
    }
}
