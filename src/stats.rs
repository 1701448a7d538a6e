//! Dashboard Statistics
//!
//! Figures derived from the dashboard's daily chart data. Nothing here is
//! persisted; it is recomputed from each fetch.

use chrono::{Duration, NaiveDate};

use crate::models::ChartDay;

/// Consecutive active days, counted backward from the most recent day.
///
/// An inactive most-recent day does not break the streak (the user may not
/// have studied yet today); counting then starts from the day before. A
/// missing date breaks the streak like an inactive one.
pub fn streak(days: &[ChartDay]) -> u32 {
    let mut sorted: Vec<&ChartDay> = days.iter().collect();
    sorted.sort_by_key(|d| d.date);

    let mut iter = sorted.iter().rev().peekable();

    if let Some(latest) = iter.peek() {
        if !latest.is_active() {
            iter.next();
        }
    }

    let mut count = 0;
    let mut expected: Option<NaiveDate> = None;

    for day in iter {
        if let Some(expected) = expected {
            if day.date != expected {
                break;
            }
        }
        if !day.is_active() {
            break;
        }
        count += 1;
        expected = Some(day.date - Duration::days(1));
    }

    count
}

/// Aggregates shown next to the chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekSummary {
    pub reviews: u32,
    pub focus_minutes: u32,
    pub active_days: u32,
    pub best_day: Option<NaiveDate>,
    pub streak: u32,
}

pub fn summarize(days: &[ChartDay]) -> WeekSummary {
    let best_day = days
        .iter()
        .filter(|d| d.reviews > 0)
        .max_by_key(|d| (d.reviews, std::cmp::Reverse(d.date)))
        .map(|d| d.date);

    WeekSummary {
        reviews: days.iter().map(|d| d.reviews).sum(),
        focus_minutes: days.iter().map(|d| d.focus_minutes).sum(),
        active_days: days.iter().filter(|d| d.is_active()).count() as u32,
        best_day,
        streak: streak(days),
    }
}

/// Bar height for a day, as a percentage of the busiest day
pub fn bar_percent(day: &ChartDay, days: &[ChartDay]) -> u32 {
    let max = days.iter().map(|d| d.reviews).max().unwrap_or(0);
    if max == 0 {
        0
    } else {
        ((day.reviews as f64 / max as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(activity: &[(u32, u32)]) -> Vec<ChartDay> {
        let start = NaiveDate::from_ymd_opt(2026, 10, 13).unwrap();
        activity
            .iter()
            .enumerate()
            .map(|(i, &(reviews, focus))| ChartDay::new(start + Duration::days(i as i64), reviews, focus))
            .collect()
    }

    #[test]
    fn test_streak_all_active() {
        let days = week(&[(5, 0), (3, 10), (1, 0), (0, 5), (2, 2), (8, 0), (4, 1)]);
        assert_eq!(streak(&days), 7);
    }

    #[test]
    fn test_streak_counts_from_last_active_day() {
        let days = week(&[(0, 0), (0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (0, 0)]);
        assert_eq!(streak(&days), 4);
    }

    #[test]
    fn test_streak_broken_by_gap_day() {
        let days = week(&[(5, 0), (5, 0), (0, 0), (2, 0), (2, 0), (2, 0), (1, 0)]);
        assert_eq!(streak(&days), 4);
    }

    #[test]
    fn test_streak_zero_when_two_trailing_idle_days() {
        let days = week(&[(5, 0), (5, 0), (5, 0), (5, 0), (5, 0), (0, 0), (0, 0)]);
        assert_eq!(streak(&days), 0);
    }

    #[test]
    fn test_streak_unsorted_and_missing_dates() {
        let mut days = week(&[(1, 0), (1, 0), (1, 0), (1, 0), (1, 0), (1, 0), (1, 0)]);
        days.remove(3);
        days.reverse();
        assert_eq!(streak(&days), 3);
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(streak(&[]), 0);
    }

    #[test]
    fn test_summarize() {
        let days = week(&[(5, 0), (9, 10), (0, 0), (9, 5), (2, 2), (8, 0), (0, 0)]);
        let summary = summarize(&days);

        assert_eq!(summary.reviews, 33);
        assert_eq!(summary.focus_minutes, 17);
        assert_eq!(summary.active_days, 5);
        assert_eq!(summary.best_day, NaiveDate::from_ymd_opt(2026, 10, 14));
        assert_eq!(summary.streak, 3);
    }

    #[test]
    fn test_bar_percent() {
        let days = week(&[(5, 0), (10, 0)]);
        assert_eq!(bar_percent(&days[0], &days), 50);
        assert_eq!(bar_percent(&days[1], &days), 100);
        assert_eq!(bar_percent(&week(&[(0, 0)])[0], &week(&[(0, 0)])), 0);
    }
}
