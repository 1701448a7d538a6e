//! Request bodies
//!
//! JSON by default; multipart form data passes through untouched for
//! uploads. Both HTTP backends translate this into their own request type.

use serde::Serialize;

use crate::error::ClientResult;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<FormPart>),
}

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> ClientResult<Self> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        filename: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File {
                filename: filename.into(),
                mime: mime.into(),
                bytes,
            },
        }
    }
}

/// Guess an upload's MIME type from its file name
pub fn mime_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body() {
        #[derive(Serialize)]
        struct Grade {
            card_id: i64,
        }

        let body = RequestBody::json(&Grade { card_id: 4 }).unwrap();
        assert_eq!(body, RequestBody::Json(serde_json::json!({"card_id": 4})));
        assert!(RequestBody::Empty.is_empty());
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("me.JPG"), "image/jpeg");
        assert_eq!(mime_for("avatar.png"), "image/png");
        assert_eq!(mime_for("noext"), "application/octet-stream");
    }
}
