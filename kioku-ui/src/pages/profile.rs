//! Profile Page
//!
//! Account details, avatar, theme and sign-out.

use leptos::*;
use leptos_router::*;
use wasm_bindgen::JsCast;

use kioku::models::ProfileUpdate;

use crate::api;
use crate::components::{Field, Panel, PrimaryButton};
use crate::state::{GlobalState, ThemeContext};

#[component]
pub fn Profile() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Refresh the cached profile on mount
    create_effect(move |_| {
        spawn_local(async move {
            match api::fetch_me().await {
                Ok(user) => state.user.set(Some(user)),
                Err(e) => web_sys::console::error_1(&format!("Failed to fetch profile: {}", e).into()),
            }
        });
    });

    view! {
        <div class="max-w-2xl mx-auto space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Profile"</h1>
                <p class="text-gray-500 mt-1">"Manage your account"</p>
            </div>

            <AvatarSection />
            <DetailsSection />
            <PreferencesSection />
            <SignOutSection />
        </div>
    }
}

#[component]
fn AvatarSection() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (uploading, set_uploading) = create_signal(false);

    let on_file = move |ev: ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        set_uploading.set(true);
        spawn_local(async move {
            match api::upload_avatar(&file).await {
                Ok(user) => {
                    state.user.set(Some(user));
                    state.show_success("Avatar updated");
                }
                Err(e) => state.show_error(&e),
            }
            set_uploading.set(false);
        });
    };

    view! {
        <Panel title="Avatar">
            <div class="flex items-center space-x-6">
                {move || {
                    let user = state.user.get();
                    match user.as_ref().and_then(|u| u.settings.avatar_url.clone()) {
                        Some(url) => view! {
                            <img src=url class="w-20 h-20 rounded-full object-cover" />
                        }.into_view(),
                        None => view! {
                            <div class="w-20 h-20 rounded-full bg-primary-600 text-white text-2xl font-semibold flex items-center justify-center">
                                {user.map(|u| u.initials()).unwrap_or_default()}
                            </div>
                        }.into_view(),
                    }
                }}
                <label class="cursor-pointer px-4 py-2 bg-gray-200 dark:bg-gray-700 rounded-lg text-sm">
                    {move || if uploading.get() { "Uploading..." } else { "Change avatar" }}
                    <input type="file" accept="image/*" class="hidden" on:change=on_file />
                </label>
            </div>
        </Panel>
    }
}

#[component]
fn DetailsSection() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let whatsapp = create_rw_signal(String::new());
    let (saving, set_saving) = create_signal(false);

    // Fill the form whenever the profile changes
    create_effect(move |_| {
        if let Some(user) = state.user.get() {
            name.set(user.name.clone());
            email.set(user.email.clone());
            whatsapp.set(user.settings.whatsapp_number.clone().unwrap_or_default());
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let number = whatsapp.get_untracked().trim().to_string();
        let update = ProfileUpdate {
            name: Some(name.get_untracked().trim().to_string()),
            email: Some(email.get_untracked().trim().to_string()),
            whatsapp_number: (!number.is_empty()).then_some(number),
        };

        set_saving.set(true);
        spawn_local(async move {
            match api::update_profile(&update).await {
                Ok(user) => {
                    state.user.set(Some(user));
                    state.show_success("Profile saved");
                }
                Err(e) => state.show_error(&e),
            }
            set_saving.set(false);
        });
    };

    view! {
        <Panel title="Details">
            <form on:submit=on_submit class="space-y-4">
                <Field label="Name" value=name />
                <Field label="Email" value=email input_type="email" />
                <Field label="WhatsApp number" value=whatsapp input_type="tel" placeholder="+62..." />
                <PrimaryButton label="Save" busy=saving />
            </form>
        </Panel>
    }
}

#[component]
fn PreferencesSection() -> impl IntoView {
    let theme = use_context::<ThemeContext>().expect("ThemeContext not found");

    view! {
        <Panel title="Preferences">
            <div class="flex items-center justify-between">
                <span>"Dark mode"</span>
                <button
                    on:click=move |_| theme.toggle()
                    class=move || {
                        let base = "w-12 h-6 rounded-full transition-colors relative";
                        if theme.dark.get() {
                            format!("{} bg-primary-600", base)
                        } else {
                            format!("{} bg-gray-300", base)
                        }
                    }
                >
                    <span class=move || {
                        if theme.dark.get() {
                            "absolute top-1 left-7 w-4 h-4 bg-white rounded-full"
                        } else {
                            "absolute top-1 left-1 w-4 h-4 bg-white rounded-full"
                        }
                    } />
                </button>
            </div>
        </Panel>
    }
}

#[component]
fn SignOutSection() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let sign_out = move |_| {
        let navigate = navigate.clone();
        spawn_local(async move {
            api::logout().await;
            state.signed_out();
            navigate("/login", Default::default());
        });
    };

    view! {
        <Panel>
            <button
                on:click=sign_out
                class="w-full px-6 py-3 bg-red-600 hover:bg-red-700 text-white rounded-lg font-medium"
            >
                "Sign out"
            </button>
        </Panel>
    }
}
