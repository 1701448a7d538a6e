//! Response envelopes
//!
//! The backend is inconsistent about wrapping: some list endpoints return a
//! bare array, others `{ "data": [...] }`, and error bodies put the text in
//! `message`, `error` or `error.message`. Everything is normalized here so
//! callers only ever see `Vec<T>`, `T` or a message string.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// A list in either shape
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "items", alias = "cards", alias = "results")]
        data: Vec<T>,
    },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

/// A single item, optionally under `data`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ItemEnvelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ItemEnvelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            ItemEnvelope::Wrapped { data } => data,
            ItemEnvelope::Bare(item) => item,
        }
    }
}

/// Plain `{ "message": ... }` acknowledgement
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Decode a response body; an empty body reads as JSON `null`
pub fn decode<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))
}

pub fn decode_list<T: DeserializeOwned>(body: &str) -> ClientResult<Vec<T>> {
    decode::<ListEnvelope<T>>(body).map(ListEnvelope::into_vec)
}

pub fn decode_item<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    decode::<ItemEnvelope<T>>(body).map(ItemEnvelope::into_inner)
}

/// Pull a human-readable message out of an error body
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let text = value
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| value.get("error").and_then(|e| e.as_str()))
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
        })
        .or_else(|| value.get("detail").and_then(|d| d.as_str()))?;

    Some(text.to_string())
}

/// Map a non-2xx status and body to the client error
pub fn error_for_status(status: u16, body: &str) -> ClientError {
    ClientError::api(status, error_message(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Deck;

    #[test]
    fn test_list_both_shapes() {
        let bare = r#"[{"id": 1, "name": "N5", "slug": "n5"}]"#;
        let wrapped = r#"{"data": [{"id": 1, "name": "N5", "slug": "n5"}], "meta": {"total": 1}}"#;

        let a: Vec<Deck> = decode_list(bare).unwrap();
        let b: Vec<Deck> = decode_list(wrapped).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].slug, "n5");
    }

    #[test]
    fn test_list_cards_alias() {
        let body = r#"{"cards": [{"id": 3, "kana": "みず"}]}"#;
        let cards: Vec<crate::models::Card> = decode_list(body).unwrap();
        assert_eq!(cards[0].kana, "みず");
    }

    #[test]
    fn test_item_both_shapes() {
        let bare: Deck = decode_item(r#"{"id": 2, "name": "N4", "slug": "n4"}"#).unwrap();
        let wrapped: Deck = decode_item(r#"{"data": {"id": 2, "name": "N4", "slug": "n4"}}"#).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn test_empty_body_as_unit() {
        assert!(decode::<()>("").is_ok());
        assert!(decode::<()>("  \n").is_ok());
        assert!(decode::<Deck>("").is_err());
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(error_message(r#"{"message": "Invalid credentials"}"#).as_deref(), Some("Invalid credentials"));
        assert_eq!(error_message(r#"{"error": "Deck not found"}"#).as_deref(), Some("Deck not found"));
        assert_eq!(
            error_message(r#"{"error": {"code": "X", "message": "Nested"}}"#).as_deref(),
            Some("Nested")
        );
        assert_eq!(error_message("<html>502</html>"), None);
        assert_eq!(error_message(r#"{"ok": false}"#), None);
    }

    #[test]
    fn test_error_for_status() {
        let err = error_for_status(422, r#"{"message": "The email field is required."}"#);
        assert_eq!(
            err,
            ClientError::Api {
                status: 422,
                message: "The email field is required.".to_string()
            }
        );
    }
}
