//! PWA install prompt
//!
//! Holds on to the browser's `beforeinstallprompt` event and offers an
//! install banner, unless the user dismissed it within the last week.

use leptos::*;
use wasm_bindgen::JsCast;

use crate::storage::{now_ms, session};

#[component]
pub fn PwaPrompt() -> impl IntoView {
    let deferred = store_value(None::<web_sys::Event>);
    let (visible, set_visible) = create_signal(false);

    let handle = window_event_listener_untyped("beforeinstallprompt", move |ev| {
        ev.prevent_default();
        deferred.set_value(Some(ev));
        set_visible.set(session().should_offer_pwa_install(now_ms()));
    });
    on_cleanup(move || handle.remove());

    let install = move |_| {
        set_visible.set(false);
        let Some(event) = deferred.get_value() else {
            return;
        };
        let prompt = js_sys::Reflect::get(&event, &"prompt".into())
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
        if let Some(prompt) = prompt {
            if let Err(e) = prompt.call0(&event) {
                web_sys::console::error_1(&e);
            }
        }
        deferred.set_value(None);
    };

    let dismiss = move |_| {
        set_visible.set(false);
        if let Err(e) = session().dismiss_pwa_install(now_ms()) {
            web_sys::console::error_1(&format!("Failed to store dismissal: {}", e).into());
        }
    };

    view! {
        <Show when=move || visible.get()>
            <div class="fixed bottom-6 left-4 right-4 md:left-auto md:w-96 z-40 bg-white dark:bg-gray-800
                        rounded-xl shadow-lg p-4 flex items-center justify-between space-x-4">
                <span class="text-sm">"Install Kioku for quick reviews from your home screen."</span>
                <div class="flex space-x-2">
                    <button on:click=dismiss class="px-3 py-2 text-sm text-gray-500">"Later"</button>
                    <button
                        on:click=install
                        class="px-3 py-2 text-sm bg-primary-600 text-white rounded-lg"
                    >
                        "Install"
                    </button>
                </div>
            </div>
        </Show>
    }
}
