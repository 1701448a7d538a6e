//! Practice Pages
//!
//! Session list and the chat itself. A sent message is shown right away as
//! pending and replaced by the server's copy once the tutor answers.

use leptos::*;
use leptos_router::*;

use kioku::{Conversation, ConversationEntry, PracticeSession, Role};

use crate::api;
use crate::components::{InlineLoading, ListSkeleton, Loading, Panel};
use crate::state::GlobalState;

#[component]
pub fn Practice() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let (sessions, set_sessions) = create_signal(None::<Vec<PracticeSession>>);
    let context = create_rw_signal(String::new());
    let (creating, set_creating) = create_signal(false);

    create_effect(move |_| {
        spawn_local(async move {
            match api::fetch_practice_sessions().await {
                Ok(list) => set_sessions.set(Some(list)),
                Err(e) => {
                    state.show_error(&e);
                    set_sessions.set(Some(Vec::new()));
                }
            }
        });
    });

    let start = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let topic = context.get_untracked().trim().to_string();
        set_creating.set(true);

        let navigate = navigate.clone();
        spawn_local(async move {
            let topic = (!topic.is_empty()).then_some(topic);
            match api::create_practice_session(topic).await {
                Ok(session) => navigate(&format!("/practice/{}", session.id), Default::default()),
                Err(e) => state.show_error(&e),
            }
            set_creating.set(false);
        });
    };

    let remove = move |id: i64| {
        spawn_local(async move {
            match api::delete_practice_session(id).await {
                Ok(()) => {
                    set_sessions.update(|list| {
                        if let Some(list) = list {
                            list.retain(|s| s.id != id);
                        }
                    });
                    state.show_success("Session deleted");
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    view! {
        <div class="max-w-3xl mx-auto space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Practice"</h1>
                <p class="text-gray-500 mt-1">"Chat in Japanese with your tutor"</p>
            </div>

            <Panel title="New conversation">
                <form on:submit=start class="flex space-x-2">
                    <input
                        type="text"
                        placeholder="Topic, e.g. ordering at a restaurant"
                        prop:value=move || context.get()
                        on:input=move |ev| context.set(event_target_value(&ev))
                        class="flex-1 bg-gray-50 dark:bg-gray-700 rounded-lg px-4 py-3 border border-gray-300 dark:border-gray-600"
                    />
                    <button
                        type="submit"
                        disabled=move || creating.get()
                        class="px-6 py-3 bg-primary-600 text-white rounded-lg disabled:opacity-50"
                    >
                        "Start"
                    </button>
                </form>
            </Panel>

            <Panel title="Previous sessions">
                {move || match sessions.get() {
                    None => view! { <ListSkeleton /> }.into_view(),
                    Some(list) if list.is_empty() => view! {
                        <p class="text-gray-500 text-sm">"No conversations yet"</p>
                    }.into_view(),
                    Some(list) => list.into_iter().map(|session| {
                        let id = session.id;
                        let title = session
                            .title
                            .clone()
                            .or(session.context.clone())
                            .unwrap_or_else(|| format!("Session #{}", id));
                        let when = session
                            .created_at
                            .map(|t| t.format("%b %d, %H:%M").to_string())
                            .unwrap_or_default();
                        view! {
                            <div class="flex items-center justify-between py-3 border-b border-gray-200 dark:border-gray-700 last:border-0">
                                <A href=format!("/practice/{}", id) class="flex-1">
                                    <div class="font-medium">{title}</div>
                                    <div class="text-sm text-gray-500">{when}</div>
                                </A>
                                <button on:click=move |_| remove(id) class="text-sm text-red-500">"Delete"</button>
                            </div>
                        }
                    }).collect_view(),
                }}
            </Panel>
        </div>
    }
}

#[component]
pub fn PracticeChat() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let params = use_params_map();
    let session_id = move || params.with(|p| p.get("id").and_then(|id| id.parse::<i64>().ok()));

    let (session, set_session) = create_signal(None::<PracticeSession>);
    let conversation = create_rw_signal(None::<Conversation>);
    let draft = create_rw_signal(String::new());

    create_effect(move |_| {
        let Some(id) = session_id() else {
            state.show_error("Unknown practice session");
            return;
        };
        spawn_local(async move {
            match api::fetch_practice_session(id).await {
                Ok(loaded) => {
                    conversation.set(Some(Conversation::from_session(&loaded)));
                    set_session.set(Some(loaded));
                }
                Err(e) => state.show_error(&e),
            }
        });
    });

    let awaiting = move || {
        conversation.with(|c| c.as_ref().map(|c| c.is_awaiting_reply()).unwrap_or(false))
    };

    let send = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let text = draft.get_untracked();

        let sent = conversation.try_update(|c| c.as_mut().map(|c| (c.session_id(), c.send(&text))));
        let (id, pending) = match sent.flatten() {
            Some((id, Ok(pending))) => (id, pending),
            Some((_, Err(e))) => {
                state.show_error(&e.to_string());
                return;
            }
            None => return,
        };
        draft.set(String::new());

        spawn_local(async move {
            match api::send_practice_message(id, text.trim()).await {
                Ok(reply) => conversation.update(|c| {
                    if let Some(c) = c {
                        if let Err(e) = c.confirm(pending, reply) {
                            web_sys::console::error_1(&e.to_string().into());
                        }
                    }
                }),
                Err(e) => {
                    let restored = conversation
                        .try_update(|c| c.as_mut().and_then(|c| c.rollback(pending).ok()))
                        .flatten();
                    if let Some(text) = restored {
                        draft.set(text);
                    }
                    state.show_error(&format!("Message not sent: {}", e));
                }
            }
        });
    };

    view! {
        <div class="max-w-3xl mx-auto space-y-6">
            <A href="/practice" class="text-sm text-primary-600">"← All sessions"</A>

            {move || session.get().map(|s| view! {
                <div>
                    <h1 class="text-2xl font-bold">
                        {s.title.clone().unwrap_or_else(|| format!("Session #{}", s.id))}
                    </h1>
                    {s.context.clone().map(|c| view! { <p class="text-gray-500">{c}</p> })}
                    {s.reading_reference.clone().map(|r| view! {
                        <details class="mt-3 bg-white dark:bg-gray-800 rounded-lg p-3">
                            <summary class="cursor-pointer text-sm font-medium">"Reading reference"</summary>
                            <p class="mt-2 whitespace-pre-line">{r}</p>
                        </details>
                    })}
                </div>
            })}

            <Panel>
                <div class="space-y-3 min-h-[40vh]">
                    {move || match conversation.get() {
                        None => view! { <Loading /> }.into_view(),
                        Some(c) if c.entries().is_empty() => view! {
                            <p class="text-gray-500 text-sm text-center">"Say hello to start: こんにちは!"</p>
                        }.into_view(),
                        Some(c) => c.entries().iter().cloned().map(|entry| view! {
                            <Bubble entry=entry />
                        }).collect_view(),
                    }}
                    {move || awaiting().then(|| view! {
                        <div class="flex items-center space-x-2 text-sm text-gray-500">
                            <InlineLoading />
                            <span>"先生 is typing..."</span>
                        </div>
                    })}
                </div>

                <form on:submit=send class="flex space-x-2 mt-4">
                    <input
                        type="text"
                        placeholder="日本語で書いてください"
                        prop:value=move || draft.get()
                        on:input=move |ev| draft.set(event_target_value(&ev))
                        class="flex-1 bg-gray-50 dark:bg-gray-700 rounded-lg px-4 py-3 border border-gray-300 dark:border-gray-600"
                    />
                    <button
                        type="submit"
                        disabled=awaiting
                        class="px-6 py-3 bg-primary-600 text-white rounded-lg disabled:opacity-50"
                    >
                        "Send"
                    </button>
                </form>
            </Panel>
        </div>
    }
}

#[component]
fn Bubble(entry: ConversationEntry) -> impl IntoView {
    let from_user = entry.role() == Role::User;
    let row = if from_user { "flex justify-end" } else { "flex justify-start" };
    let bubble = match (from_user, entry.is_pending()) {
        (true, true) => "bg-primary-400 text-white opacity-70",
        (true, false) => "bg-primary-600 text-white",
        (false, _) => "bg-gray-100 dark:bg-gray-700",
    };

    view! {
        <div class=row>
            <div class=format!("max-w-[80%] px-4 py-2 rounded-2xl whitespace-pre-line {}", bubble)>
                {entry.content().to_string()}
            </div>
        </div>
    }
}
