//! Status banner for the messages kept in [`GlobalState`]. Errors sit above
//! successes and either can be closed before it times out.

use leptos::*;

use crate::state::GlobalState;

#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="fixed top-20 inset-x-0 z-50 flex flex-col items-center space-y-2 px-4 pointer-events-none">
            {move || state.error.get().map(|msg| view! {
                <Banner message=msg tone=Tone::Problem on_close=move || state.error.set(None) />
            })}
            {move || state.success.get().map(|msg| view! {
                <Banner message=msg tone=Tone::Done on_close=move || state.success.set(None) />
            })}
        </div>
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Tone {
    Done,
    Problem,
}

impl Tone {
    /// Screen readers announce errors at once and successes politely
    fn aria_role(self) -> &'static str {
        match self {
            Tone::Done => "status",
            Tone::Problem => "alert",
        }
    }
}

#[component]
fn Banner(message: String, tone: Tone, on_close: impl Fn() + 'static) -> impl IntoView {
    let (label, style) = match tone {
        Tone::Done => ("できた", "border-emerald-500 bg-emerald-50 text-emerald-900 dark:bg-emerald-900/40 dark:text-emerald-100"),
        Tone::Problem => ("エラー", "border-rose-500 bg-rose-50 text-rose-900 dark:bg-rose-900/40 dark:text-rose-100"),
    };
    view! {
        <div
            role=tone.aria_role()
            class=format!(
                "pointer-events-auto w-full max-w-md flex items-start gap-3 border-l-4 rounded-md px-4 py-3 shadow {}",
                style
            )
        >
            <span class="text-xs font-bold tracking-widest pt-0.5">{label}</span>
            <p class="flex-1 text-sm">{message}</p>
            <button on:click=move |_| on_close() class="text-sm opacity-60 hover:opacity-100" aria-label="Close">
                "×"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn errors_are_announced_as_alerts() {
        assert_eq!(Tone::Problem.aria_role(), "alert");
        assert_eq!(Tone::Done.aria_role(), "status");
    }
}
