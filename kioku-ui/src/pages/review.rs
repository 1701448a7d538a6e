//! Review Page
//!
//! Drives a [`ReviewSession`] over the due queue. Grades are applied
//! locally first and rolled back if the server rejects them.

use leptos::*;
use leptos_router::*;

use kioku::review::{AnswerMatch, Phase, ReviewError, ReviewSession};
use kioku::{Card, Grade, SessionStats};

use crate::api;
use crate::components::{CardSkeleton, Loading, Panel};
use crate::state::{GlobalState, HeaderContent, HeaderContext};

const BATCH_SIZE: u32 = 20;

#[derive(Clone, Copy, PartialEq)]
enum Fetch {
    Start,
    Continue,
    Restart,
}

/// Review page component
#[component]
pub fn Review() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let header = use_context::<HeaderContext>().expect("HeaderContext not found");
    let query = use_query_map();
    let deck = move || query.with_untracked(|q| q.get("deck").cloned());

    let session = create_rw_signal(ReviewSession::new());
    let answer = create_rw_signal(String::new());
    let (busy, set_busy) = create_signal(false);

    // Apply a local transition, reporting invalid ones as a toast
    let apply = move |f: &dyn Fn(&mut ReviewSession) -> Result<(), ReviewError>| {
        if let Some(Err(e)) = session.try_update(|s| f(s)) {
            state.show_error(&e.to_string());
        }
    };

    let fetch = move |mode: Fetch| {
        session.update(|s| s.begin_loading());
        spawn_local(async move {
            match api::fetch_review_queue(deck().as_deref(), BATCH_SIZE).await {
                Ok(batch) => session.update(|s| match mode {
                    Fetch::Start => s.load(batch),
                    Fetch::Restart => s.restart(batch),
                    Fetch::Continue => {
                        if let Err(e) = s.continue_with(batch) {
                            state.show_error(&e.to_string());
                        }
                    }
                }),
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to fetch review queue: {}", e).into());
                    state.show_error(&e);
                    session.update(|s| s.load(Vec::new()));
                }
            }
        });
    };

    fetch(Fetch::Start);

    // Progress in the top bar
    create_effect(move |_| {
        let s = session.get();
        let stats = s.stats();
        header.set(HeaderContent {
            title: "Review".to_string(),
            progress: Some((stats.total, stats.total + s.remaining() as u32)),
        });
    });
    on_cleanup(move || header.clear());

    let check = move || {
        let input = answer.get_untracked();
        if input.trim().is_empty() {
            apply(&|s| s.reveal());
        } else {
            apply(&|s| s.check_answer(&input).map(|_| ()));
        }
    };

    let grade = move |grade: Grade| {
        if busy.get_untracked() {
            return;
        }
        let command = match session.try_update(|s| s.grade(grade)) {
            Some(Ok(command)) => command,
            Some(Err(e)) => {
                state.show_error(&e.to_string());
                return;
            }
            None => return,
        };
        answer.set(String::new());
        set_busy.set(true);

        spawn_local(async move {
            if let Err(e) = api::submit_grade(command.card.id, command.grade, command.elapsed_ms).await {
                web_sys::console::error_1(&format!("Failed to submit grade: {}", e).into());
                session.update(|s| {
                    if let Err(e) = s.rollback(&command) {
                        web_sys::console::warn_1(&format!("Rollback skipped: {}", e).into());
                    }
                });
                state.show_error(&format!("Grade not saved: {}", e));
            }
            set_busy.set(false);
        });
    };

    let undo = move || match session.try_update(|s| s.undo()) {
        Some(Ok(command)) => {
            web_sys::console::warn_1(
                &format!("Undid card {} locally; the server keeps the grade", command.card.id).into(),
            );
            state.show_success("Undone here. The earlier grade is still recorded on the server.");
        }
        Some(Err(e)) => state.show_error(&e.to_string()),
        None => {}
    };

    let skip = move || apply(&|s| s.skip().map(|_| ()));

    let mnemonic = move || {
        let existing = match session.try_update(|s| s.reveal_mnemonic().map(|m| m.map(str::to_string))) {
            Some(Ok(existing)) => existing,
            Some(Err(e)) => {
                state.show_error(&e.to_string());
                return;
            }
            None => return,
        };
        if existing.is_some() {
            return;
        }
        let Some(card_id) = session.with_untracked(|s| s.current().map(|c| c.id)) else {
            return;
        };
        set_busy.set(true);
        spawn_local(async move {
            match api::generate_mnemonic(card_id).await {
                Ok(text) => apply(&|s| s.attach_mnemonic(text.clone())),
                Err(e) => state.show_error(&e),
            }
            set_busy.set(false);
        });
    };

    let sentence = move || {
        let Some(card_id) = session.with_untracked(|s| s.current().map(|c| c.id)) else {
            return;
        };
        set_busy.set(true);
        spawn_local(async move {
            match api::generate_sentence(card_id).await {
                Ok(text) => apply(&|s| s.attach_sentence(text.clone())),
                Err(e) => state.show_error(&e),
            }
            set_busy.set(false);
        });
    };

    // Keyboard shortcuts once the answer side is up
    let handle = window_event_listener(ev::keydown, move |ev| {
        let phase = session.with_untracked(|s| s.phase().clone());
        if matches!(phase, Phase::Question | Phase::Loading) {
            return;
        }
        match ev.key().as_str() {
            "1" | "2" | "3" | "4" if !matches!(phase, Phase::Finished) => {
                if let Ok(g) = ev.key().parse::<Grade>() {
                    grade(g);
                }
            }
            " " | "Enter" if matches!(phase, Phase::Checked(_)) => {
                ev.prevent_default();
                apply(&|s| s.reveal());
            }
            "u" => undo(),
            "s" if !matches!(phase, Phase::Finished) => skip(),
            _ => {}
        }
    });
    on_cleanup(move || handle.remove());

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            {move || {
                let phase = session.with(|s| s.phase().clone());
                match phase {
                    Phase::Loading => view! { <CardSkeleton /> }.into_view(),
                    Phase::Finished => {
                        let stats = session.with(|s| s.stats());
                        let can_undo = session.with(|s| s.can_undo());
                        view! {
                            <Summary
                                stats=stats
                                can_undo=can_undo
                                on_continue=Callback::new(move |_| fetch(Fetch::Continue))
                                on_restart=Callback::new(move |_| fetch(Fetch::Restart))
                                on_undo=Callback::new(move |_| undo())
                            />
                        }.into_view()
                    }
                    phase => {
                        let Some(card) = session.with(|s| s.current().cloned()) else {
                            return view! { <Loading /> }.into_view();
                        };
                        view! {
                            <CardView
                                card=card
                                phase=phase
                                answer=answer
                                busy=busy
                                sentence=Signal::derive(move || session.with(|s| s.reveal_state().sentence.clone()))
                                show_mnemonic=Signal::derive(move || session.with(|s| s.reveal_state().mnemonic))
                                can_undo=Signal::derive(move || session.with(|s| s.can_undo()))
                                on_check=Callback::new(move |_| check())
                                on_grade=Callback::new(grade)
                                on_undo=Callback::new(move |_| undo())
                                on_skip=Callback::new(move |_| skip())
                                on_mnemonic=Callback::new(move |_| mnemonic())
                                on_sentence=Callback::new(move |_| sentence())
                            />
                        }.into_view()
                    }
                }
            }}
        </div>
    }
}

#[component]
fn CardView(
    card: Card,
    phase: Phase,
    answer: RwSignal<String>,
    busy: ReadSignal<bool>,
    sentence: Signal<Option<String>>,
    show_mnemonic: Signal<bool>,
    can_undo: Signal<bool>,
    on_check: Callback<()>,
    on_grade: Callback<Grade>,
    on_undo: Callback<()>,
    on_skip: Callback<()>,
    on_mnemonic: Callback<()>,
    on_sentence: Callback<()>,
) -> impl IntoView {
    let revealed = matches!(phase, Phase::Answer);
    let verdict = match &phase {
        Phase::Checked(check) => Some(check.clone()),
        _ => None,
    };
    let mnemonic_text = card.mnemonic.clone();

    view! {
        <Panel>
            <div class="text-center py-8">
                <div class="text-6xl font-bold mb-4">{card.prompt().to_string()}</div>

                {verdict.map(|check| {
                    let (class, text) = match check.outcome {
                        AnswerMatch::Kana => ("text-green-600", "Correct reading"),
                        AnswerMatch::Meaning => ("text-green-600", "Correct meaning"),
                        AnswerMatch::Miss => ("text-red-500", "Not quite"),
                    };
                    view! {
                        <p class=format!("text-lg font-medium {}", class)>{text}</p>
                        <p class="text-sm text-gray-500">"Space to reveal, or grade right away"</p>
                    }
                })}

                {revealed.then(|| view! {
                    <div class="space-y-2 mt-4">
                        <div class="text-2xl">{card.kana.clone()}</div>
                        {card.meaning_id.clone().map(|m| view! { <div class="text-lg">{m}</div> })}
                        {card.meaning_en.clone().map(|m| view! { <div class="text-gray-500">{m}</div> })}
                        {card.audio_url.clone().map(|src| view! { <audio controls=true src=src class="mx-auto mt-2" /> })}
                        {card.examples.iter().take(2).map(|ex| view! {
                            <div class="mt-3 text-left bg-gray-50 dark:bg-gray-700 rounded-lg p-3">
                                <div>{ex.japanese.clone()}</div>
                                {ex.translation.clone().map(|t| view! { <div class="text-sm text-gray-500">{t}</div> })}
                            </div>
                        }).collect_view()}
                    </div>
                })}
            </div>

            {move || show_mnemonic.get().then(|| mnemonic_text.clone()).flatten().map(|m| view! {
                <div class="mb-4 p-3 rounded-lg bg-yellow-50 dark:bg-yellow-900/30 text-sm">
                    <span class="font-semibold">"Mnemonic: "</span>{m}
                </div>
            })}
            {move || sentence.get().map(|s| view! {
                <div class="mb-4 p-3 rounded-lg bg-blue-50 dark:bg-blue-900/30 text-sm">
                    <span class="font-semibold">"Sentence: "</span>{s}
                </div>
            })}

            {if matches!(phase, Phase::Question) {
                view! {
                    <form
                        on:submit=move |ev: ev::SubmitEvent| {
                            ev.prevent_default();
                            on_check.call(());
                        }
                        class="flex space-x-2"
                    >
                        <input
                            type="text"
                            autofocus=true
                            placeholder="Reading or meaning, Enter to check"
                            prop:value=move || answer.get()
                            on:input=move |ev| answer.set(event_target_value(&ev))
                            class="flex-1 bg-gray-50 dark:bg-gray-700 rounded-lg px-4 py-3 border border-gray-300 dark:border-gray-600"
                        />
                        <button type="submit" class="px-4 py-3 bg-primary-600 text-white rounded-lg">
                            "Check"
                        </button>
                    </form>
                }.into_view()
            } else {
                view! {
                    <div class="grid grid-cols-4 gap-2">
                        {Grade::ALL.into_iter().enumerate().map(|(i, grade)| {
                            let color = match grade {
                                Grade::Again => "bg-red-500",
                                Grade::Hard => "bg-orange-500",
                                Grade::Good => "bg-green-600",
                                Grade::Easy => "bg-blue-600",
                            };
                            view! {
                                <button
                                    on:click=move |_| on_grade.call(grade)
                                    disabled=move || busy.get()
                                    class=format!("py-3 rounded-lg text-white font-medium disabled:opacity-50 {}", color)
                                >
                                    {grade.label()}
                                    <span class="block text-xs opacity-75">{i + 1}</span>
                                </button>
                            }
                        }).collect_view()}
                    </div>
                }.into_view()
            }}

            <div class="flex justify-between mt-4 text-sm">
                <div class="space-x-3">
                    <button
                        on:click=move |_| on_undo.call(())
                        disabled=move || !can_undo.get()
                        class="text-gray-500 disabled:opacity-40"
                    >
                        "Undo (u)"
                    </button>
                    <button on:click=move |_| on_skip.call(()) class="text-gray-500">"Skip (s)"</button>
                </div>
                {revealed.then(|| view! {
                    <div class="space-x-3">
                        <button
                            on:click=move |_| on_mnemonic.call(())
                            disabled=move || busy.get()
                            class="text-primary-600"
                        >
                            "Mnemonic"
                        </button>
                        <button
                            on:click=move |_| on_sentence.call(())
                            disabled=move || busy.get()
                            class="text-primary-600"
                        >
                            "Example sentence"
                        </button>
                    </div>
                })}
            </div>
        </Panel>
    }
}

#[component]
fn Summary(
    stats: SessionStats,
    can_undo: bool,
    on_continue: Callback<()>,
    on_restart: Callback<()>,
    on_undo: Callback<()>,
) -> impl IntoView {
    let accuracy = stats
        .accuracy()
        .map(|a| format!("{:.0}%", a * 100.0))
        .unwrap_or_else(|| "-".to_string());
    let average = stats
        .average_ms()
        .map(|ms| format!("{:.1}s", ms as f64 / 1000.0))
        .unwrap_or_else(|| "-".to_string());

    view! {
        <Panel title="Session complete">
            {if stats.total == 0 {
                view! { <p class="text-gray-500 mb-4">"Nothing due right now. お疲れさま!"</p> }.into_view()
            } else {
                view! {
                    <div class="grid grid-cols-2 md:grid-cols-4 gap-4 mb-6 text-center">
                        <div><div class="text-3xl font-bold">{stats.total}</div><div class="text-sm text-gray-500">"Reviewed"</div></div>
                        <div><div class="text-3xl font-bold text-green-600">{stats.correct}</div><div class="text-sm text-gray-500">"Correct"</div></div>
                        <div><div class="text-3xl font-bold text-red-500">{stats.incorrect}</div><div class="text-sm text-gray-500">"Incorrect"</div></div>
                        <div><div class="text-3xl font-bold">{accuracy}</div><div class="text-sm text-gray-500">{format!("avg {}", average)}</div></div>
                    </div>
                }.into_view()
            }}
            <div class="flex flex-wrap gap-3">
                <button on:click=move |_| on_continue.call(()) class="px-6 py-3 bg-primary-600 text-white rounded-lg">
                    "Continue"
                </button>
                <button on:click=move |_| on_restart.call(()) class="px-6 py-3 bg-gray-200 dark:bg-gray-700 rounded-lg">
                    "Restart"
                </button>
                {can_undo.then(|| view! {
                    <button on:click=move |_| on_undo.call(()) class="px-6 py-3 text-gray-500">"Undo last"</button>
                })}
                <A href="/" class="px-6 py-3 text-primary-600">"Back to dashboard"</A>
            </div>
        </Panel>
    }
}
