//! User and auth payloads

use serde::{Deserialize, Serialize};

/// Profile as returned by `/me` and cached in the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub settings: UserSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default, alias = "avatarUrl", alias = "avatar")]
    pub avatar_url: Option<String>,
    #[serde(default, alias = "whatsappNumber")]
    pub whatsapp_number: Option<String>,
}

impl User {
    /// Initials for the avatar placeholder
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Token + profile pair returned by login and register
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    pub user: User,
}

/// Fields accepted by `PUT /me`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        let user = User {
            id: 1,
            name: "siti nur aisyah".to_string(),
            email: "siti@example.com".to_string(),
            settings: UserSettings::default(),
        };
        assert_eq!(user.initials(), "SN");
    }

    #[test]
    fn test_auth_response_access_token_alias() {
        let resp: AuthResponse = serde_json::from_str(
            r#"{"access_token": "abc", "user": {"id": 1, "name": "A", "email": "a@b.c"}}"#,
        )
        .unwrap();
        assert_eq!(resp.token, "abc");
        assert_eq!(resp.user.settings, UserSettings::default());
    }
}
