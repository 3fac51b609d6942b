//! Conversation panel: header, timeline, and the prompt input.
//!
//! SYSTEM CONTEXT
//! ==============
//! Renders `ConversationState` and hands user sends to the session. The
//! optimistic user entry and the pending placeholder are inserted by the
//! store, so this component only renders what the state already holds.

#[cfg(test)]
#[path = "chat_panel_test.rs"]
mod chat_panel_test;

use leptos::prelude::*;
use threads::timeline::{Message, Role};
use threads::ConversationState;

use crate::state::session::SessionHandle;
use crate::util::markdown::render_markdown_html;

pub const UNTITLED_CONVERSATION: &str = "New Conversation";
pub const INPUT_PLACEHOLDER: &str = "What insights are you looking for today?";
pub const RENAME_PROMPT: &str = "Enter name: ";

/// Header title for the active conversation.
pub fn conversation_title(heading: Option<&str>) -> &str {
    heading.filter(|h| !h.trim().is_empty()).unwrap_or(UNTITLED_CONVERSATION)
}

pub fn message_count_subtitle(count: usize) -> String {
    if count == 1 { "1 message".to_owned() } else { format!("{count} messages") }
}

/// Ctrl+Enter (or Cmd+Enter) submits; plain Enter inserts a newline.
pub fn should_submit(key: &str, ctrl: bool, meta: bool, composing: bool) -> bool {
    key == "Enter" && !composing && (ctrl || meta)
}

/// Mirror of the store's own acceptance check, used to clear the input only
/// for sends that will actually go out.
pub fn can_submit(text: &str, sending: bool, loading: bool) -> bool {
    !text.trim().is_empty() && !sending && !loading
}

/// Conversation column with header, messages, and input.
#[component]
pub fn ChatPanel() -> impl IntoView {
    let conversation = expect_context::<RwSignal<ConversationState>>();
    let handle = expect_context::<SessionHandle>();

    let input = RwSignal::new(String::new());
    let messages_ref = NodeRef::<leptos::html::Div>::new();

    Effect::new(move || {
        let state = conversation.get();
        let _ = state.messages.len();

        #[cfg(feature = "hydrate")]
        {
            if let Some(el) = messages_ref.get() {
                let scroll_height = el.scroll_height();
                el.set_scroll_top(scroll_height);
            }
        }
    });

    let do_send = move || {
        let text = input.get_untracked();
        let ready = conversation.with_untracked(|s| can_submit(&text, s.sending, s.loading));
        if !ready {
            return;
        }
        input.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let session = handle.get_value();
            leptos::task::spawn_local(async move {
                if let Some(threads::SessionEvent::ThreadCreated(thread_id)) = session.send(&text).await {
                    crate::util::history::push_route(&threads::session::thread_route(&thread_id));
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (handle, text);
        }
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if should_submit(&ev.key(), ev.ctrl_key(), ev.meta_key(), ev.is_composing()) {
            ev.prevent_default();
            do_send();
        }
    };

    // Local only; the server keeps its own heading.
    let on_rename = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Ok(Some(title)) = window.prompt_with_message(RENAME_PROMPT) {
                handle.with_value(|session| session.rename(&title));
            }
        }
    };

    let can_send = move || {
        let text = input.get();
        conversation.with(|s| can_submit(&text, s.sending, s.loading))
    };

    view! {
        <section class="chat-panel">
            <header class="chat-panel__header">
                <div>
                    <div class="chat-panel__title">
                        {move || conversation.with(|s| conversation_title(s.heading.as_deref()).to_owned())}
                    </div>
                    <div class="chat-panel__subtitle">
                        {move || message_count_subtitle(conversation.with(|s| s.messages.len()))}
                    </div>
                </div>
                <button
                    class="btn btn--ghost chat-panel__rename"
                    title="Rename conversation"
                    on:click=on_rename
                    disabled=move || conversation.with(|s| s.loading)
                >
                    "Rename"
                </button>
            </header>

            <Show when=move || conversation.with(|s| s.error.is_some())>
                <div class="chat-panel__error" role="alert">
                    {move || conversation.with(|s| s.error.clone().unwrap_or_default())}
                </div>
            </Show>

            <div class="chat-panel__messages" node_ref=messages_ref>
                {move || {
                    let state = conversation.get();
                    if state.loading {
                        return view! { <div class="chat-panel__loading">"Loading conversation..."</div> }
                            .into_any();
                    }
                    if state.show_welcome() {
                        return view! { <WelcomePanel /> }.into_any();
                    }
                    state
                        .messages
                        .into_iter()
                        .map(|message| view! { <MessageBubble message=message /> })
                        .collect::<Vec<_>>()
                        .into_any()
                }}
            </div>

            <div class="chat-panel__input-row">
                <textarea
                    class="chat-panel__input"
                    placeholder=INPUT_PLACEHOLDER
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                ></textarea>
                <button
                    class="btn btn--primary chat-panel__send"
                    title="Send (Ctrl+Enter)"
                    on:click=move |_| do_send()
                    disabled=move || !can_send()
                >
                    "Send"
                </button>
            </div>
        </section>
    }
}

/// Greeting shown for an empty, settled conversation.
#[component]
fn WelcomePanel() -> impl IntoView {
    view! {
        <div class="welcome">
            <span class="welcome__badge">"Welcome to AI Data Reporting"</span>
            <h1 class="welcome__title">"What would you like to know?"</h1>
            <p class="welcome__body">
                "Simply ask your question in everyday language and uncover insights instantly."
            </p>
        </div>
    }
}

#[component]
fn MessageBubble(message: Message) -> impl IntoView {
    let is_assistant = message.role == Role::Assistant;
    let is_pending = message.pending;
    let body = if is_pending {
        view! { <div class="message__loading">"Thinking..."</div> }.into_any()
    } else if is_assistant {
        let rendered = render_markdown_html(&message.content);
        view! { <div class="message__markdown" inner_html=rendered></div> }.into_any()
    } else {
        view! { <div class="message__text">{message.content}</div> }.into_any()
    };

    view! {
        <div
            class="message"
            class:message--assistant=is_assistant
            class:message--user=!is_assistant
            class:message--pending=is_pending
        >
            <time class="message__time">{message.timestamp}</time>
            <div class="message__bubble">{body}</div>
        </div>
    }
}
