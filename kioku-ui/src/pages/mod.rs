//! Pages
//!
//! Top-level page components for each route.

pub mod auth;
pub mod dashboard;
pub mod decks;
pub mod practice;
pub mod profile;
pub mod review;

pub use auth::{ForgotPassword, Login, Register, ResetPassword};
pub use dashboard::Dashboard;
pub use decks::{DeckDetail, Decks};
pub use practice::{Practice, PracticeChat};
pub use profile::Profile;
pub use review::Review;
