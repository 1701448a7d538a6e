//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use leptos_router::*;

use crate::components::{Nav, PwaPrompt, Toast};
use crate::pages::{
    DeckDetail, Decks, Dashboard, ForgotPassword, Login, Practice, PracticeChat, Profile,
    Register, ResetPassword, Review,
};
use crate::state::{provide_global_state, provide_header, provide_theme, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();
    provide_theme();
    provide_header();

    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let authenticated = state.authenticated;
    let signed_in = move || authenticated.get();
    let signed_out = move || !authenticated.get();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-50 text-gray-900 dark:bg-gray-900 dark:text-white flex flex-col">
                <Nav />

                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        // Guest routes
                        <ProtectedRoute path="/login" redirect_path="/" condition=signed_out view=Login />
                        <ProtectedRoute path="/register" redirect_path="/" condition=signed_out view=Register />
                        <Route path="/forgot-password" view=ForgotPassword />
                        <Route path="/reset-password" view=ResetPassword />

                        // Signed-in routes
                        <ProtectedRoute path="/" redirect_path="/login" condition=signed_in view=Dashboard />
                        <ProtectedRoute path="/review" redirect_path="/login" condition=signed_in view=Review />
                        <ProtectedRoute path="/decks" redirect_path="/login" condition=signed_in view=Decks />
                        <ProtectedRoute path="/decks/:slug" redirect_path="/login" condition=signed_in view=DeckDetail />
                        <ProtectedRoute path="/practice" redirect_path="/login" condition=signed_in view=Practice />
                        <ProtectedRoute path="/practice/:id" redirect_path="/login" condition=signed_in view=PracticeChat />
                        <ProtectedRoute path="/profile" redirect_path="/login" condition=signed_in view=Profile />

                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Toast />
                <PwaPrompt />
            </div>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"迷"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-500 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 text-white rounded-lg font-medium transition-colors"
            >
                "Go to Dashboard"
            </A>
        </div>
    }
}
