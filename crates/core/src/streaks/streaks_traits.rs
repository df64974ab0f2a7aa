use chrono::NaiveDate;

use super::streaks_model::{DailyCompletion, StreakSummary};
use crate::errors::Result;
use crate::identity::OwnerId;

/// Read-only derivations over an owner's task history.
pub trait StreakServiceTrait: Send + Sync {
    /// Consecutive days, ending at `as_of` (today when `None`), on which at
    /// least one due task was completed.
    fn compute_streak(&self, owner: &OwnerId, as_of: Option<NaiveDate>) -> Result<u32>;

    fn streak_summary(&self, owner: &OwnerId, as_of: Option<NaiveDate>) -> Result<StreakSummary>;

    /// `days` consecutive daily summaries ending at `end` (today when `None`),
    /// oldest first.
    fn completion_history(
        &self,
        owner: &OwnerId,
        end: Option<NaiveDate>,
        days: u32,
    ) -> Result<Vec<DailyCompletion>>;
}
