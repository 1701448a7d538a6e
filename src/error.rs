//! Client error types
//!
//! Every failure the API wrapper can surface. The web and terminal front ends
//! both render these as a single line of text.

use thiserror::Error;

/// Errors from talking to the study backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The server answered 401; the session has already been cleared
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// Non-2xx response, carrying the server's `message` when it sent one
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Could not reach the server
    #[error("Network error: {0}")]
    Network(String),

    /// The request took longer than the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Body could not be built or parsed
    #[error("Parse error: {0}")]
    Decode(String),

    /// Session storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Build an API error from a status code and an optional server message
    pub fn api(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        ClientError::Api { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::api(422, Some("Email already taken".to_string()));
        assert_eq!(err.to_string(), "Email already taken");

        let err = ClientError::api(500, None);
        assert_eq!(err.to_string(), "Request failed with status 500");

        let err = ClientError::api(500, Some("  ".to_string()));
        assert_eq!(err.to_string(), "Request failed with status 500");
    }

    #[test]
    fn test_status() {
        assert_eq!(ClientError::Unauthorized.status(), Some(401));
        assert_eq!(ClientError::Timeout.status(), None);
        assert!(ClientError::Unauthorized.is_unauthorized());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
