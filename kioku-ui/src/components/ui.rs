//! Form primitives

use leptos::*;

use super::InlineLoading;

/// Rounded card container
#[component]
pub fn Panel(
    #[prop(optional, into)]
    title: Option<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <section class="bg-white dark:bg-gray-800 rounded-xl p-6 shadow-sm">
            {title.map(|t| view! { <h2 class="text-xl font-semibold mb-4">{t}</h2> })}
            {children()}
        </section>
    }
}

/// Labelled text input bound to a signal
#[component]
pub fn Field(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")]
    input_type: &'static str,
    #[prop(optional)]
    placeholder: &'static str,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-gray-500 dark:text-gray-400 mb-2">{label}</span>
            <input
                type=input_type
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                class="w-full bg-gray-50 dark:bg-gray-700 rounded-lg px-4 py-3
                       border border-gray-300 dark:border-gray-600 focus:border-primary-500 focus:outline-none"
            />
        </label>
    }
}

/// Submit button with a busy state
#[component]
pub fn PrimaryButton(
    label: &'static str,
    #[prop(into)]
    busy: Signal<bool>,
) -> impl IntoView {
    view! {
        <button
            type="submit"
            disabled=move || busy.get()
            class="w-full px-6 py-3 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-400
                   text-white rounded-lg font-medium transition-colors flex items-center justify-center space-x-2"
        >
            {move || busy.get().then(|| view! { <InlineLoading /> })}
            <span>{label}</span>
        </button>
    }
}

/// Inline error line under a form
#[component]
pub fn ErrorText(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    view! {
        {move || error.get().map(|e| view! {
            <p class="text-sm text-red-500">{e}</p>
        })}
    }
}
