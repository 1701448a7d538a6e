//! Navigation Component
//!
//! Header bar with brand, links, the page-provided header slot and the
//! theme toggle.

use leptos::*;
use leptos_router::*;

use crate::state::{GlobalState, HeaderContext, ThemeContext};

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let header = use_context::<HeaderContext>().expect("HeaderContext not found");
    let theme = use_context::<ThemeContext>().expect("ThemeContext not found");

    let authenticated = state.authenticated;
    let user = state.user;

    view! {
        <nav class="bg-white dark:bg-gray-800 border-b border-gray-200 dark:border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"記"</span>
                        <span class="text-xl font-bold">"Kioku"</span>
                    </A>

                    // Page-provided content, e.g. review progress
                    {move || header.content.get().map(|content| view! {
                        <div class="flex items-center space-x-3 text-sm">
                            <span class="font-medium">{content.title}</span>
                            {content.progress.map(|(done, total)| {
                                let percent = if total == 0 { 0 } else { done * 100 / total };
                                view! {
                                    <div class="w-32 h-2 bg-gray-200 dark:bg-gray-700 rounded-full">
                                        <div
                                            class="h-2 bg-primary-500 rounded-full transition-all"
                                            style=format!("width: {}%", percent)
                                        />
                                    </div>
                                    <span class="text-gray-500">{format!("{}/{}", done, total)}</span>
                                }
                            })}
                        </div>
                    })}

                    <div class="flex items-center space-x-1">
                        <Show when=move || authenticated.get()>
                            <NavLink href="/" label="Dashboard" />
                            <NavLink href="/review" label="Review" />
                            <NavLink href="/decks" label="Decks" />
                            <NavLink href="/practice" label="Practice" />
                        </Show>

                        <button
                            on:click=move |_| theme.toggle()
                            class="px-3 py-2 rounded-lg hover:bg-gray-100 dark:hover:bg-gray-700"
                            title="Toggle theme"
                        >
                            {move || if theme.dark.get() { "☀" } else { "☾" }}
                        </button>

                        <Show when=move || authenticated.get()>
                            <A
                                href="/profile"
                                class="w-9 h-9 rounded-full bg-primary-600 text-white flex items-center justify-center text-sm font-semibold"
                            >
                                {move || user.get().map(|u| u.initials()).unwrap_or_default()}
                            </A>
                        </Show>
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            exact=true
            class="px-4 py-2 rounded-lg text-gray-600 dark:text-gray-300 hover:bg-gray-100 dark:hover:bg-gray-700 transition-colors"
            active_class="bg-gray-100 dark:bg-gray-700"
        >
            {label}
        </A>
    }
}
