//! Decks Pages
//!
//! Deck list grouped by level, and a single deck with its cards.

use leptos::*;
use leptos_router::*;

use kioku::models::group_by_level;
use kioku::{Card, Deck};

use crate::api;
use crate::components::{ListSkeleton, Panel};
use crate::state::GlobalState;

#[component]
pub fn Decks() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (decks, set_decks) = create_signal(None::<Vec<Deck>>);

    create_effect(move |_| {
        spawn_local(async move {
            match api::fetch_decks().await {
                Ok(list) => set_decks.set(Some(list)),
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to fetch decks: {}", e).into());
                    state.show_error(&e);
                    set_decks.set(Some(Vec::new()));
                }
            }
        });
    });

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Decks"</h1>
                <p class="text-gray-500 mt-1">"Browse vocabulary by JLPT level"</p>
            </div>

            {move || match decks.get() {
                None => view! { <ListSkeleton count=4 /> }.into_view(),
                Some(list) if list.is_empty() => view! {
                    <p class="text-gray-500">"No decks available yet"</p>
                }.into_view(),
                Some(list) => group_by_level(&list).into_iter().map(|(level, decks)| view! {
                    <Panel title=level>
                        <div class="grid md:grid-cols-2 gap-4">
                            {decks.into_iter().map(|deck| view! { <DeckTile deck=deck /> }).collect_view()}
                        </div>
                    </Panel>
                }).collect_view(),
            }}
        </div>
    }
}

#[component]
fn DeckTile(deck: Deck) -> impl IntoView {
    let href = format!("/decks/{}", deck.slug);

    view! {
        <A
            href=href
            class="block p-4 rounded-lg border border-gray-200 dark:border-gray-700 hover:border-primary-500 transition-colors"
        >
            <div class="flex items-center justify-between">
                <span class="font-semibold">{deck.name}</span>
                {deck.is_official.then(|| view! {
                    <span class="text-xs px-2 py-1 rounded bg-primary-100 text-primary-700">"Official"</span>
                })}
            </div>
            <div class="text-sm text-gray-500 mt-1">{format!("{} cards", deck.card_count)}</div>
            {deck.description.map(|d| view! { <p class="text-sm mt-2">{d}</p> })}
        </A>
    }
}

#[component]
pub fn DeckDetail() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let params = use_params_map();
    let slug = move || params.with(|p| p.get("slug").cloned().unwrap_or_default());

    let (deck, set_deck) = create_signal(None::<Deck>);
    let (cards, set_cards) = create_signal(None::<Vec<Card>>);

    create_effect(move |_| {
        let slug = slug();
        spawn_local(async move {
            match api::fetch_deck(&slug).await {
                Ok(d) => set_deck.set(Some(d)),
                Err(e) => state.show_error(&e),
            }
            match api::fetch_deck_cards(&slug).await {
                Ok(list) => set_cards.set(Some(list)),
                Err(e) => {
                    state.show_error(&e);
                    set_cards.set(Some(Vec::new()));
                }
            }
        });
    });

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <A href="/decks" class="text-sm text-primary-600">"← All decks"</A>
                    <h1 class="text-3xl font-bold">
                        {move || deck.get().map(|d| d.name).unwrap_or_else(slug)}
                    </h1>
                    {move || deck.get().and_then(|d| d.level).map(|l| view! {
                        <p class="text-gray-500 mt-1">{l}</p>
                    })}
                </div>
                <A
                    href=move || format!("/review?deck={}", slug())
                    class="px-6 py-3 bg-primary-600 hover:bg-primary-700 text-white rounded-lg font-medium"
                >
                    "Review this deck"
                </A>
            </div>

            <Panel>
                {move || match cards.get() {
                    None => view! { <ListSkeleton count=6 /> }.into_view(),
                    Some(list) if list.is_empty() => view! {
                        <p class="text-gray-500">"This deck has no cards"</p>
                    }.into_view(),
                    Some(list) => view! {
                        <table class="w-full text-left">
                            <thead class="text-sm text-gray-500">
                                <tr>
                                    <th class="py-2">"Word"</th>
                                    <th class="py-2">"Reading"</th>
                                    <th class="py-2">"Meaning"</th>
                                    <th class="py-2">"Due"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {list.into_iter().map(|card| view! { <CardRow card=card /> }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view(),
                }}
            </Panel>
        </div>
    }
}

#[component]
fn CardRow(card: Card) -> impl IntoView {
    let meanings = card.meanings().collect::<Vec<_>>().join(" / ");
    let due = card
        .progress
        .as_ref()
        .and_then(|p| p.due_date)
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_else(|| "new".to_string());

    view! {
        <tr class="border-t border-gray-200 dark:border-gray-700">
            <td class="py-2 text-lg">{card.prompt().to_string()}</td>
            <td class="py-2">{card.kana.clone()}</td>
            <td class="py-2 text-sm">{meanings}</td>
            <td class="py-2 text-sm text-gray-500">{due}</td>
        </tr>
    }
}
