use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current streak as of a given day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub as_of: NaiveDate,
    pub current_streak: u32,
}

/// Tasks due on one day and how many of them are done.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyCompletion {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
}

impl DailyCompletion {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            completed: 0,
            total: 0,
        }
    }

    /// At least one task due this day was completed.
    pub fn qualifies(&self) -> bool {
        self.completed > 0
    }

    /// Every task due this day is done and there was at least one.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}
