//! Endpoint paths
//!
//! Shared by the native and browser clients so both speak the same routes.

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

pub const API_PREFIX: &str = "/api/v1";

/// Join a base URL and an endpoint path
pub fn url(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{}{}", base, endpoint)
    } else {
        format!("{}/{}", base, endpoint)
    }
}

fn v1(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

fn seg(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

pub fn login() -> String {
    v1("/auth/login")
}

pub fn register() -> String {
    v1("/auth/register")
}

pub fn logout() -> String {
    v1("/auth/logout")
}

pub fn forgot_password() -> String {
    v1("/auth/forgot-password")
}

pub fn reset_password() -> String {
    v1("/auth/reset-password")
}

pub fn me() -> String {
    v1("/me")
}

pub fn me_avatar() -> String {
    v1("/me/avatar")
}

pub fn dashboard() -> String {
    v1("/dashboard")
}

pub fn decks() -> String {
    v1("/decks")
}

pub fn deck(slug: &str) -> String {
    v1(&format!("/decks/{}", seg(slug)))
}

pub fn deck_cards(slug: &str) -> String {
    v1(&format!("/decks/{}/cards", seg(slug)))
}

pub fn card(id: i64) -> String {
    v1(&format!("/cards/{}", id))
}

pub fn card_mnemonic(id: i64) -> String {
    v1(&format!("/cards/{}/mnemonic", id))
}

pub fn card_sentence(id: i64) -> String {
    v1(&format!("/cards/{}/sentence", id))
}

pub fn review_queue(deck: Option<&str>, limit: u32) -> String {
    let mut path = v1(&format!("/review/queue?limit={}", limit));
    if let Some(deck) = deck {
        path.push_str(&format!("&deck={}", seg(deck)));
    }
    path
}

pub fn review_grade() -> String {
    v1("/review/grade")
}

pub fn practice_sessions() -> String {
    v1("/practice/sessions")
}

pub fn practice_session(id: i64) -> String {
    v1(&format!("/practice/sessions/{}", id))
}

pub fn practice_messages(id: i64) -> String {
    v1(&format!("/practice/sessions/{}/messages", id))
}

pub fn particles() -> String {
    v1("/particles")
}

pub fn particle(id: i64) -> String {
    v1(&format!("/particles/{}", id))
}

pub fn materials() -> String {
    v1("/materials")
}

pub fn material(id: i64) -> String {
    v1(&format!("/materials/{}", id))
}

pub fn notes() -> String {
    v1("/notes")
}

pub fn note(id: i64) -> String {
    v1(&format!("/notes/{}", id))
}

pub fn dictionary_lookup(word: &str) -> String {
    v1(&format!("/dictionary/lookup?word={}", seg(word)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        assert_eq!(url("http://localhost:8000/", "/api/v1/me"), "http://localhost:8000/api/v1/me");
        assert_eq!(url("http://localhost:8000", "api/v1/me"), "http://localhost:8000/api/v1/me");
    }

    #[test]
    fn test_escaped_segments() {
        assert_eq!(deck("n5 core"), "/api/v1/decks/n5%20core");
        assert_eq!(dictionary_lookup("食べる"), "/api/v1/dictionary/lookup?word=%E9%A3%9F%E3%81%B9%E3%82%8B");
    }

    #[test]
    fn test_review_queue_query() {
        assert_eq!(review_queue(None, 20), "/api/v1/review/queue?limit=20");
        assert_eq!(review_queue(Some("n5"), 10), "/api/v1/review/queue?limit=10&deck=n5");
    }
}
