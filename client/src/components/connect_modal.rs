//! Database configuration modal.
//!
//! SYSTEM CONTEXT
//! ==============
//! Edits the `ConnectForm` held in `RwSignal<ConnectState>`. Field errors come
//! from `ConnectForm::visible_error`, so a field only shows its error after it
//! was touched or a submit was attempted.

#[cfg(test)]
#[path = "connect_modal_test.rs"]
mod connect_modal_test;

use leptos::prelude::*;
use threads::connect::{ConnectField, ConnectOutcome, ConnectState, DbKind};

use crate::net::api::HttpChatService;

/// `<select>` value for the chosen database type.
pub fn db_type_option_value(db_type: Option<DbKind>) -> &'static str {
    db_type.map_or("", DbKind::label)
}

#[component]
pub fn ConnectModal() -> impl IntoView {
    let connect = expect_context::<RwSignal<ConnectState>>();
    let service = expect_context::<HttpChatService>();

    let close = move || connect.update(ConnectState::close);
    let on_backdrop = move |_| close();
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            ev.prevent_default();
            close();
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        #[cfg(feature = "hydrate")]
        {
            let service = service.clone();
            leptos::task::spawn_local(async move {
                let cell = crate::state::session::SignalCell(connect);
                threads::connect::submit_connect(&service, &cell).await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = &service;
        }
    };

    let show_names = move || connect.with(|c| c.form.db_type.is_some_and(DbKind::needs_names));
    let submitting = move || connect.with(|c| c.submitting);

    view! {
        <Show when=move || connect.with(|c| c.open)>
            <div class="dialog-backdrop" on:click=on_backdrop>
                <form
                    class="dialog dialog--connect"
                    on:click=move |ev| ev.stop_propagation()
                    on:keydown=on_keydown
                    on:submit=on_submit.clone()
                    tabindex="0"
                >
                    <h2>"Database Configuration"</h2>
                    <p class="dialog__hint">"Please provide the details to connect to your database."</p>

                    <label class="dialog__label">
                        "Select Database Type:"
                        <select
                            class="dialog__select"
                            class:dialog__input--invalid=move || connect.with(|c| c.form.visible_error(ConnectField::DbType).is_some())
                            prop:value=move || connect.with(|c| db_type_option_value(c.form.db_type))
                            on:change=move |ev| {
                                let value = event_target_value(&ev);
                                connect.update(|c| c.form.set_db_type(DbKind::parse(&value)));
                            }
                            on:blur=move |_| connect.update(|c| c.form.touch(ConnectField::DbType))
                        >
                            <option value="">"Select..."</option>
                            {DbKind::ALL
                                .into_iter()
                                .map(|kind| view! { <option value=kind.label()>{kind.label()}</option> })
                                .collect::<Vec<_>>()}
                        </select>
                    </label>
                    <FieldError connect=connect field=ConnectField::DbType />

                    <label class="dialog__label">
                        "Connection URL:"
                        <input
                            class="dialog__input"
                            type="text"
                            placeholder="Enter your database connection URI"
                            title=move || format!("Example: {}", connect.with(|c| c.form.example_uri()))
                            class:dialog__input--invalid=move || connect.with(|c| c.form.visible_error(ConnectField::ConnectionUri).is_some())
                            prop:value=move || connect.with(|c| c.form.connection_uri.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                connect.update(|c| c.form.set_connection_uri(value));
                            }
                            on:blur=move |_| connect.update(|c| c.form.touch(ConnectField::ConnectionUri))
                        />
                    </label>
                    <p class="dialog__example">
                        "Example: " {move || connect.with(|c| c.form.example_uri())}
                    </p>
                    <FieldError connect=connect field=ConnectField::ConnectionUri />

                    <Show when=show_names>
                        <label class="dialog__label">
                            "Database Name:"
                            <input
                                class="dialog__input"
                                type="text"
                                placeholder="Enter database name"
                                prop:value=move || connect.with(|c| c.form.database_name.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    connect.update(|c| c.form.set_database_name(value));
                                }
                                on:blur=move |_| connect.update(|c| c.form.touch(ConnectField::DatabaseName))
                            />
                        </label>
                        <FieldError connect=connect field=ConnectField::DatabaseName />

                        <label class="dialog__label">
                            "Collection Name:"
                            <input
                                class="dialog__input"
                                type="text"
                                placeholder="Enter collection name"
                                prop:value=move || connect.with(|c| c.form.collection_name.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    connect.update(|c| c.form.set_collection_name(value));
                                }
                                on:blur=move |_| connect.update(|c| c.form.touch(ConnectField::CollectionName))
                            />
                        </label>
                        <FieldError connect=connect field=ConnectField::CollectionName />
                    </Show>

                    {move || {
                        connect.with(|c| c.outcome.clone()).map(|outcome| match outcome {
                            ConnectOutcome::Connected(message) => {
                                view! { <div class="dialog__banner dialog__banner--success">{message}</div> }.into_any()
                            }
                            ConnectOutcome::Rejected(message) => {
                                view! { <div class="dialog__banner dialog__banner--error" role="alert">{message}</div> }
                                    .into_any()
                            }
                        })
                    }}

                    <div class="dialog__actions">
                        <button class="btn" type="button" on:click=move |_| close() disabled=submitting>
                            "Cancel"
                        </button>
                        <button class="btn btn--primary" type="submit" disabled=submitting>
                            {move || if submitting() { "Connecting..." } else { "Connect" }}
                        </button>
                    </div>
                </form>
            </div>
        </Show>
    }
}

/// Inline error under one form field, hidden until the field is touched.
#[component]
fn FieldError(connect: RwSignal<ConnectState>, field: ConnectField) -> impl IntoView {
    move || {
        connect
            .with(|c| c.form.visible_error(field))
            .map(|message| view! { <p class="dialog__field-error">{message}</p> })
    }
}
