//! Practice conversation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a practice conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeMessage {
    #[serde(default)]
    pub id: Option<i64>,
    pub role: Role,
    pub content: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A practice session with its server-side history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeSession {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    /// Reading or script the conversation is anchored to
    #[serde(default, alias = "readingReference", alias = "reading")]
    pub reading_reference: Option<String>,
    #[serde(default)]
    pub messages: Vec<PracticeMessage>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPracticeSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<i64>,
}

/// Server reply to a sent message: the stored user message and the tutor's answer
#[derive(Debug, Clone, Deserialize)]
pub struct MessageReply {
    #[serde(default, alias = "userMessage")]
    pub user_message: Option<PracticeMessage>,
    #[serde(alias = "assistantMessage", alias = "reply")]
    pub assistant_message: PracticeMessage,
}
