//! Card types
//!
//! A card is one vocabulary item plus the caller's SRS progress on it. The
//! progress fields are owned by the server; the client only displays them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single vocabulary card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    #[serde(default)]
    pub kanji: Option<String>,
    pub kana: String,
    /// Indonesian meaning
    #[serde(default, alias = "meaningId")]
    pub meaning_id: Option<String>,
    /// English meaning
    #[serde(default, alias = "meaningEn")]
    pub meaning_en: Option<String>,
    #[serde(default)]
    pub examples: Vec<ExampleSentence>,
    #[serde(default, alias = "audioUrl")]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub mnemonic: Option<String>,
    #[serde(default)]
    pub progress: Option<CardProgress>,
}

impl Card {
    /// Minimal card, mostly useful for building fixtures
    pub fn new(id: i64, kana: impl Into<String>) -> Self {
        Self {
            id,
            kanji: None,
            kana: kana.into(),
            meaning_id: None,
            meaning_en: None,
            examples: Vec::new(),
            audio_url: None,
            mnemonic: None,
            progress: None,
        }
    }

    pub fn kanji(mut self, kanji: impl Into<String>) -> Self {
        self.kanji = Some(kanji.into());
        self
    }

    pub fn meaning_id(mut self, meaning: impl Into<String>) -> Self {
        self.meaning_id = Some(meaning.into());
        self
    }

    pub fn meaning_en(mut self, meaning: impl Into<String>) -> Self {
        self.meaning_en = Some(meaning.into());
        self
    }

    /// What the question side shows: the kanji when present, else the kana
    pub fn prompt(&self) -> &str {
        self.kanji
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or(&self.kana)
    }

    /// All stored meanings, Indonesian first
    pub fn meanings(&self) -> impl Iterator<Item = &str> {
        self.meaning_id
            .as_deref()
            .into_iter()
            .chain(self.meaning_en.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

/// Example sentence attached to a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleSentence {
    #[serde(alias = "jp")]
    pub japanese: String,
    #[serde(default)]
    pub reading: Option<String>,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default, alias = "audioUrl")]
    pub audio_url: Option<String>,
}

/// Per-user SRS progress, as reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardProgress {
    #[serde(default)]
    pub repetition: u32,
    #[serde(default = "default_ease", alias = "easeFactor")]
    pub ease_factor: f64,
    /// Interval in days
    #[serde(default)]
    pub interval: u32,
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<NaiveDate>,
}

fn default_ease() -> f64 {
    2.5
}

/// Review grade submitted per card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Whether this grade counts as a correct recall in session stats
    pub fn is_pass(self) -> bool {
        !matches!(self, Grade::Again)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Again => "Again",
            Grade::Hard => "Hard",
            Grade::Good => "Good",
            Grade::Easy => "Easy",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" | "1" => Ok(Grade::Again),
            "hard" | "2" => Ok(Grade::Hard),
            "good" | "3" => Ok(Grade::Good),
            "easy" | "4" => Ok(Grade::Easy),
            other => Err(format!("unknown grade: {}", other)),
        }
    }
}

/// Editable card fields for `PUT /cards/{id}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kanji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_deserialize_mixed_case() {
        let json = r#"{
            "id": 7,
            "kanji": "猫",
            "kana": "ねこ",
            "meaningId": "kucing",
            "meaning_en": "cat",
            "progress": {"repetition": 3, "easeFactor": 2.36, "interval": 6, "due_date": "2026-10-20"}
        }"#;

        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.meaning_id.as_deref(), Some("kucing"));
        assert_eq!(card.meaning_en.as_deref(), Some("cat"));

        let progress = card.progress.unwrap();
        assert_eq!(progress.repetition, 3);
        assert_eq!(progress.interval, 6);
        assert_eq!(progress.due_date, NaiveDate::from_ymd_opt(2026, 10, 20));
    }

    #[test]
    fn test_prompt_falls_back_to_kana() {
        assert_eq!(Card::new(1, "ねこ").kanji("猫").prompt(), "猫");
        assert_eq!(Card::new(1, "ねこ").prompt(), "ねこ");
        assert_eq!(Card::new(1, "ねこ").kanji("  ").prompt(), "ねこ");
    }

    #[test]
    fn test_grade_parse_and_serialize() {
        assert_eq!("3".parse::<Grade>(), Ok(Grade::Good));
        assert_eq!("Easy".parse::<Grade>(), Ok(Grade::Easy));
        assert!("maybe".parse::<Grade>().is_err());

        assert_eq!(serde_json::to_string(&Grade::Again).unwrap(), "\"again\"");
        assert!(!Grade::Again.is_pass());
        assert!(Grade::Hard.is_pass());
    }
}
