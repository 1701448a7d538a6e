//! Global Application State
//!
//! Reactive state shared by every page: the signed-in user and the toast
//! messages. The persisted side lives in the `kioku` session.

use leptos::*;

use kioku::User;

use crate::storage::session;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Cached profile of the signed-in user
    pub user: RwSignal<Option<User>>,
    /// Whether a token is stored
    pub authenticated: RwSignal<bool>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let session = session();

    let state = GlobalState {
        user: create_rw_signal(session.user()),
        authenticated: create_rw_signal(session.is_authenticated()),
        loading: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Record a fresh sign-in
    pub fn signed_in(&self, user: User) {
        self.user.set(Some(user));
        self.authenticated.set(true);
    }

    /// Forget the user after logout
    pub fn signed_out(&self) {
        self.user.set(None);
        self.authenticated.set(false);
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        }).forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        }).forget();
    }
}
