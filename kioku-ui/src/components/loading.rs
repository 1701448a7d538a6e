//! Placeholders shown while data is on its way.

use leptos::*;

/// Centered spinner with a caption
#[component]
pub fn Loading(#[prop(default = "読み込み中…")] caption: &'static str) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center gap-3 py-16 text-gray-500">
            <div class="loading-spinner w-10 h-10" />
            <span class="text-sm">{caption}</span>
        </div>
    }
}

#[component]
pub fn InlineLoading() -> impl IntoView {
    view! { <span class="inline-block loading-spinner w-4 h-4 align-middle" /> }
}

/// Rows shaped like deck or session entries: a title bar and a shorter count
#[component]
pub fn ListSkeleton(#[prop(default = 3)] count: usize) -> impl IntoView {
    view! {
        <div class="divide-y divide-gray-200 dark:divide-gray-700 animate-pulse">
            {(0..count).map(|i| view! {
                <div class="flex items-center justify-between py-3">
                    <div class=format!("h-4 rounded bg-gray-200 dark:bg-gray-700 {}", if i % 2 == 0 { "w-2/5" } else { "w-1/3" }) />
                    <div class="h-4 w-10 rounded bg-gray-200 dark:bg-gray-700" />
                </div>
            }).collect_view()}
        </div>
    }
}

/// Flashcard outline used while the review queue loads
#[component]
pub fn CardSkeleton() -> impl IntoView {
    view! {
        <div class="mx-auto max-w-xl rounded-2xl bg-white dark:bg-gray-800 shadow p-10 animate-pulse">
            <div class="mx-auto h-16 w-32 rounded bg-gray-200 dark:bg-gray-700" />
            <div class="mx-auto mt-6 h-4 w-24 rounded bg-gray-200 dark:bg-gray-700" />
            <div class="mt-10 h-11 rounded-lg bg-gray-100 dark:bg-gray-700" />
        </div>
    }
}
