//! Theme
//!
//! Dark mode flag, persisted under the session's `darkMode` key and
//! mirrored as the `dark` class on `<html>`.

use leptos::*;

use crate::storage::session;

#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub dark: RwSignal<bool>,
}

impl ThemeContext {
    pub fn toggle(&self) {
        self.dark.update(|d| *d = !*d);
    }
}

pub fn provide_theme() {
    let dark = create_rw_signal(session().dark_mode());

    create_effect(move |_| {
        let enabled = dark.get();
        apply_class(enabled);
        if let Err(e) = session().set_dark_mode(enabled) {
            web_sys::console::error_1(&format!("Failed to save theme: {}", e).into());
        }
    });

    provide_context(ThemeContext { dark });
}

fn apply_class(enabled: bool) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let classes = root.class_list();
    let _ = if enabled {
        classes.add_1("dark")
    } else {
        classes.remove_1("dark")
    };
}
