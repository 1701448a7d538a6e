//! Deck types

use serde::{Deserialize, Serialize};

/// A named collection of cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default, alias = "isOfficial", alias = "official")]
    pub is_official: bool,
    #[serde(default, alias = "cardCount", alias = "cards_count")]
    pub card_count: u32,
    #[serde(default)]
    pub description: Option<String>,
}

/// Group decks by level, official decks first within each level
pub fn group_by_level(decks: &[Deck]) -> Vec<(String, Vec<Deck>)> {
    let mut groups: Vec<(String, Vec<Deck>)> = Vec::new();

    for deck in decks {
        let level = deck.level.clone().unwrap_or_else(|| "Other".to_string());
        match groups.iter_mut().find(|(l, _)| *l == level) {
            Some((_, list)) => list.push(deck.clone()),
            None => groups.push((level, vec![deck.clone()])),
        }
    }

    for (_, list) in groups.iter_mut() {
        list.sort_by(|a, b| b.is_official.cmp(&a.is_official).then(a.name.cmp(&b.name)));
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(name: &str, level: Option<&str>, official: bool) -> Deck {
        Deck {
            id: 0,
            name: name.to_string(),
            slug: name.to_lowercase(),
            level: level.map(str::to_string),
            is_official: official,
            card_count: 0,
            description: None,
        }
    }

    #[test]
    fn test_deck_aliases() {
        let d: Deck = serde_json::from_str(
            r#"{"id": 1, "name": "N5 Core", "slug": "n5-core", "isOfficial": true, "cardCount": 800}"#,
        )
        .unwrap();
        assert!(d.is_official);
        assert_eq!(d.card_count, 800);
    }

    #[test]
    fn test_group_by_level() {
        let decks = vec![
            deck("Mine", Some("N5"), false),
            deck("Core", Some("N5"), true),
            deck("Misc", None, false),
        ];

        let groups = group_by_level(&decks);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "N5");
        assert_eq!(groups[0].1[0].name, "Core");
        assert_eq!(groups[1].0, "Other");
    }
}
