//! Dashboard payload

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of activity in the dashboard chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default, alias = "focusMinutes")]
    pub focus_minutes: u32,
}

impl ChartDay {
    pub fn new(date: NaiveDate, reviews: u32, focus_minutes: u32) -> Self {
        Self {
            date,
            reviews,
            focus_minutes,
        }
    }

    /// A day counts toward the streak if anything happened on it
    pub fn is_active(&self) -> bool {
        self.reviews > 0 || self.focus_minutes > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default, alias = "dueCount", alias = "due")]
    pub due_count: u32,
    #[serde(default, alias = "newCount")]
    pub new_count: u32,
    #[serde(default, alias = "totalCards")]
    pub total_cards: u32,
    #[serde(default, alias = "learnedCards")]
    pub learned_cards: u32,
    #[serde(default, alias = "chartData", alias = "chart")]
    pub chart_data: Vec<ChartDay>,
}
