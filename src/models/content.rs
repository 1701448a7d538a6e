//! Reference content: particles, reading materials, notes, dictionary entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grammar particle explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: i64,
    pub particle: String,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Reading material used to anchor practice sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default, alias = "cardId")]
    pub card_id: Option<i64>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<i64>,
}

/// Dictionary lookup hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default)]
    pub reading: Option<String>,
    #[serde(default, alias = "definitions")]
    pub meanings: Vec<String>,
    #[serde(default, alias = "partOfSpeech", alias = "pos")]
    pub part_of_speech: Option<String>,
}
