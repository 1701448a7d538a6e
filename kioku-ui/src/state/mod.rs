//! State Management
//!
//! Global application state, theme and the top-bar content slot.

pub mod global;
pub mod header;
pub mod theme;

pub use global::{provide_global_state, GlobalState};
pub use header::{provide_header, HeaderContent, HeaderContext};
pub use theme::{provide_theme, ThemeContext};
