//! Answer checking for the question side of a review
//!
//! Purely cosmetic: the result colors the input and is never sent to the
//! server. A guess is right if it equals the card's reading (hiragana and
//! katakana fold together) or any variant of any stored meaning.

use std::sync::OnceLock;

use regex::Regex;
use wana_kana::{ConvertJapanese, IsJapaneseStr};

use crate::models::Card;

/// Which part of the card the guess matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMatch {
    Kana,
    Meaning,
    Miss,
}

/// Outcome of checking one typed guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerCheck {
    pub input: String,
    pub outcome: AnswerMatch,
}

impl AnswerCheck {
    pub fn is_correct(&self) -> bool {
        self.outcome != AnswerMatch::Miss
    }
}

fn separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[/,;()／，、（）]").expect("separator pattern is valid"))
}

/// Trim, lowercase and collapse inner whitespace
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// The whole meaning plus each piece between separators, normalized
pub fn meaning_variants(meaning: &str) -> Vec<String> {
    let mut variants = Vec::new();

    let whole = normalize(meaning);
    if !whole.is_empty() {
        variants.push(whole);
    }

    for piece in separators().split(meaning) {
        let piece = normalize(piece);
        if !piece.is_empty() && !variants.contains(&piece) {
            variants.push(piece);
        }
    }

    variants
}

/// Exact reading match, with katakana folded into hiragana. Romaji is not
/// converted, so only typed kana can match a reading.
pub fn matches_kana(input: &str, kana: &str) -> bool {
    let input = normalize(input);
    let kana = normalize(kana);
    if input.is_empty() || kana.is_empty() {
        return false;
    }
    if input == kana {
        return true;
    }
    input.as_str().is_kana() && input.as_str().to_hiragana() == kana.as_str().to_hiragana()
}

pub fn matches_meaning(input: &str, meaning: &str) -> bool {
    let input = normalize(input);
    if input.is_empty() {
        return false;
    }
    meaning_variants(meaning).iter().any(|v| *v == input)
}

/// Check a guess against a card's reading and meanings
pub fn check_answer(card: &Card, input: &str) -> AnswerCheck {
    let outcome = if matches_kana(input, &card.kana) {
        AnswerMatch::Kana
    } else if card.meanings().any(|m| matches_meaning(input, m)) {
        AnswerMatch::Meaning
    } else {
        AnswerMatch::Miss
    };

    AnswerCheck {
        input: input.to_string(),
        outcome,
    }
}
