//! Kioku Web
//!
//! Browser front end for the Japanese study service, built with Leptos (WASM).
//!
//! # Features
//!
//! - Dashboard with due counts, streak and weekly chart
//! - Review sessions with local answer checking and undo
//! - Deck browser
//! - Practice conversations with the tutor
//! - Profile, theme and PWA install prompt
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! Models, the review state machine, the practice conversation and the
//! session keys come from the `kioku` crate; this crate adds `localStorage`,
//! a `gloo-net` HTTP client and the pages.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;
mod storage;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
