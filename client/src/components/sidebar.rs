//! Thread list sidebar with the new-conversation and admin controls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Lists `ThreadListState` items, highlights the selected thread, and routes
//! clicks through the session so the list highlight and the loaded
//! conversation always change together.

#[cfg(test)]
#[path = "sidebar_test.rs"]
mod sidebar_test;

use leptos::prelude::*;
use threads::connect::ConnectState;
use threads::ThreadListState;

use crate::state::access::AccessState;
use crate::state::session::SessionHandle;

/// Secondary label for a thread row. Empty threads show nothing.
pub fn message_count_label(count: usize) -> Option<String> {
    (count > 0).then(|| format!("Messages: {count}"))
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let thread_list = expect_context::<RwSignal<ThreadListState>>();
    let access = expect_context::<RwSignal<AccessState>>();
    let connect = expect_context::<RwSignal<ConnectState>>();
    let handle = expect_context::<SessionHandle>();

    let open_thread = move |thread_id: String| {
        #[cfg(feature = "hydrate")]
        {
            crate::util::history::push_route(&threads::session::thread_route(&thread_id));
            let session = handle.get_value();
            leptos::task::spawn_local(async move {
                session.open_thread(&thread_id).await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (handle, thread_id);
        }
    };

    let on_new = move |_| {
        handle.with_value(|session| session.select_new());
        crate::util::history::push_route(threads::session::ROOT_ROUTE);
    };

    let on_connect = move |_| {
        if access.get_untracked().connect_db_enabled() {
            connect.update(|c| {
                c.open = true;
                c.outcome = None;
            });
        }
    };

    view! {
        <aside class="sidebar">
            <div class="sidebar__header">
                <div class="sidebar__title">"AI Data Reporting"</div>
                <div class="sidebar__tagline">"Ask questions about your data in plain language."</div>
            </div>

            <Show when=move || thread_list.with(|s| s.error.is_some())>
                <p class="sidebar__error">{move || thread_list.with(|s| s.error.clone().unwrap_or_default())}</p>
            </Show>

            <Show
                when=move || !thread_list.with(|s| s.loading && s.items.is_empty())
                fallback=move || view! { <div class="sidebar__spinner" aria-label="Loading conversations"></div> }
            >
                <ul class="sidebar__threads">
                    {move || {
                        let state = thread_list.get();
                        let selected = state.selected_id.clone();
                        state
                            .items
                            .into_iter()
                            .map(|item| {
                                let active = selected.as_deref() == Some(item.thread_id.as_str());
                                let heading = item.display_heading().to_owned();
                                let count = message_count_label(item.message_count);
                                let thread_id = item.thread_id;
                                view! {
                                    <li
                                        class="sidebar__thread"
                                        class:sidebar__thread--active=active
                                        on:click=move |_| open_thread(thread_id.clone())
                                    >
                                        <span class="sidebar__thread-heading">{heading}</span>
                                        {count.map(|label| view! { <span class="sidebar__thread-count">{label}</span> })}
                                    </li>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </ul>
            </Show>

            <footer class="sidebar__footer">
                <button
                    class="btn btn--ghost sidebar__connect"
                    title="Connect DB"
                    on:click=on_connect
                    disabled=move || !access.get().connect_db_enabled()
                >
                    "Connect DB"
                </button>
                <button
                    class="btn btn--ghost sidebar__settings"
                    title="Coming soon"
                    disabled=move || !access.get().settings_enabled()
                >
                    "Settings"
                </button>
                <button class="btn btn--primary sidebar__new" title="New conversation" on:click=on_new>
                    "+ New"
                </button>
            </footer>
        </aside>
    }
}
