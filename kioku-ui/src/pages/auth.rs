//! Auth Pages
//!
//! Login, registration and the password reset flow.

use leptos::*;
use leptos_router::*;

use kioku::models::{RegisterRequest, ResetPasswordRequest};

use crate::api;
use crate::components::{ErrorText, Field, Panel, PrimaryButton};
use crate::state::GlobalState;

/// Centered single-column layout for the auth forms
#[component]
fn AuthLayout(title: &'static str, subtitle: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="max-w-md mx-auto mt-12 space-y-6">
            <div class="text-center">
                <h1 class="text-3xl font-bold">{title}</h1>
                <p class="text-gray-500 mt-1">{subtitle}</p>
            </div>
            <Panel>{children()}</Panel>
        </div>
    }
}

#[component]
pub fn Login() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let (busy, set_busy) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if email.get().trim().is_empty() || password.get().is_empty() {
            set_error.set(Some("Email and password are required".to_string()));
            return;
        }

        set_busy.set(true);
        set_error.set(None);

        let navigate = navigate.clone();
        spawn_local(async move {
            match api::login(email.get_untracked().trim(), &password.get_untracked()).await {
                Ok(user) => {
                    state.show_success(&format!("Welcome back, {}!", user.name));
                    state.signed_in(user);
                    navigate("/", Default::default());
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_busy.set(false);
        });
    };

    view! {
        <AuthLayout title="Sign in" subtitle="Continue your reviews">
            <form on:submit=on_submit class="space-y-4">
                <Field label="Email" value=email input_type="email" />
                <Field label="Password" value=password input_type="password" />
                <ErrorText error=error />
                <PrimaryButton label="Sign in" busy=busy />
            </form>
            <div class="mt-4 flex justify-between text-sm text-primary-600">
                <A href="/forgot-password">"Forgot password?"</A>
                <A href="/register">"Create an account"</A>
            </div>
        </AuthLayout>
    }
}

#[component]
pub fn Register() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let confirmation = create_rw_signal(String::new());
    let (busy, set_busy) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if password.get() != confirmation.get() {
            set_error.set(Some("Passwords do not match".to_string()));
            return;
        }

        let request = RegisterRequest {
            name: name.get().trim().to_string(),
            email: email.get().trim().to_string(),
            password: password.get(),
            password_confirmation: confirmation.get(),
        };

        set_busy.set(true);
        set_error.set(None);

        let navigate = navigate.clone();
        spawn_local(async move {
            match api::register(&request).await {
                Ok(user) => {
                    state.show_success("Account created");
                    state.signed_in(user);
                    navigate("/", Default::default());
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_busy.set(false);
        });
    };

    view! {
        <AuthLayout title="Create an account" subtitle="Start learning Japanese vocabulary">
            <form on:submit=on_submit class="space-y-4">
                <Field label="Name" value=name />
                <Field label="Email" value=email input_type="email" />
                <Field label="Password" value=password input_type="password" />
                <Field label="Confirm password" value=confirmation input_type="password" />
                <ErrorText error=error />
                <PrimaryButton label="Register" busy=busy />
            </form>
            <p class="mt-4 text-sm text-center">
                "Already have an account? "
                <A href="/login" class="text-primary-600">"Sign in"</A>
            </p>
        </AuthLayout>
    }
}

#[component]
pub fn ForgotPassword() -> impl IntoView {
    let email = create_rw_signal(String::new());
    let (busy, set_busy) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);
    let (sent, set_sent) = create_signal(None::<String>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        set_busy.set(true);
        set_error.set(None);

        spawn_local(async move {
            match api::forgot_password(email.get_untracked().trim()).await {
                Ok(message) => set_sent.set(Some(
                    message.unwrap_or_else(|| "Check your inbox for a reset link.".to_string()),
                )),
                Err(e) => set_error.set(Some(e)),
            }
            set_busy.set(false);
        });
    };

    view! {
        <AuthLayout title="Forgot password" subtitle="We'll email you a reset link">
            {move || match sent.get() {
                Some(message) => view! {
                    <p class="text-green-600">{message}</p>
                }.into_view(),
                None => view! {
                    <form on:submit=on_submit class="space-y-4">
                        <Field label="Email" value=email input_type="email" />
                        <ErrorText error=error />
                        <PrimaryButton label="Send reset link" busy=busy />
                    </form>
                }.into_view(),
            }}
            <p class="mt-4 text-sm text-center">
                <A href="/login" class="text-primary-600">"Back to sign in"</A>
            </p>
        </AuthLayout>
    }
}

#[component]
pub fn ResetPassword() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();
    let query = use_query_map();

    let token = move || query.with(|q| q.get("token").cloned().unwrap_or_default());
    let email = create_rw_signal(query.with_untracked(|q| q.get("email").cloned().unwrap_or_default()));
    let password = create_rw_signal(String::new());
    let confirmation = create_rw_signal(String::new());
    let (busy, set_busy) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let token = token();
        if token.is_empty() {
            set_error.set(Some("This reset link is missing its token".to_string()));
            return;
        }
        if password.get() != confirmation.get() {
            set_error.set(Some("Passwords do not match".to_string()));
            return;
        }

        let request = ResetPasswordRequest {
            token,
            email: email.get().trim().to_string(),
            password: password.get(),
            password_confirmation: confirmation.get(),
        };

        set_busy.set(true);
        set_error.set(None);

        let navigate = navigate.clone();
        spawn_local(async move {
            match api::reset_password(&request).await {
                Ok(message) => {
                    state.show_success(message.as_deref().unwrap_or("Password updated"));
                    navigate("/login", Default::default());
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_busy.set(false);
        });
    };

    view! {
        <AuthLayout title="Reset password" subtitle="Choose a new password">
            <form on:submit=on_submit class="space-y-4">
                <Field label="Email" value=email input_type="email" />
                <Field label="New password" value=password input_type="password" />
                <Field label="Confirm password" value=confirmation input_type="password" />
                <ErrorText error=error />
                <PrimaryButton label="Reset password" busy=busy />
            </form>
        </AuthLayout>
    }
}
