//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod loading;
pub mod nav;
pub mod pwa_prompt;
pub mod toast;
pub mod ui;

pub use loading::{CardSkeleton, InlineLoading, ListSkeleton, Loading};
pub use nav::Nav;
pub use pwa_prompt::PwaPrompt;
pub use toast::Toast;
pub use ui::{ErrorText, Field, Panel, PrimaryButton};
