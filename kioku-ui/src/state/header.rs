//! Header slot
//!
//! Lets a page put its own content in the top bar; the review page uses it
//! for the progress counter.

use leptos::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderContent {
    pub title: String,
    /// Done / total
    pub progress: Option<(u32, u32)>,
}

#[derive(Clone, Copy)]
pub struct HeaderContext {
    pub content: RwSignal<Option<HeaderContent>>,
}

impl HeaderContext {
    pub fn set(&self, content: HeaderContent) {
        self.content.set(Some(content));
    }

    pub fn clear(&self) {
        self.content.set(None);
    }
}

pub fn provide_header() {
    provide_context(HeaderContext {
        content: create_rw_signal(None),
    });
}
