use log::debug;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;

use super::streaks_calculator::{history_from_index, index_by_due_date, streak_from_index};
use super::streaks_model::{DailyCompletion, StreakSummary};
use super::streaks_traits::StreakServiceTrait;
use crate::constants::{MAX_HISTORY_DAYS, MAX_STREAK_DAYS};
use crate::errors::{Result, ValidationError};
use crate::identity::OwnerId;
use crate::tasks::TaskRepositoryTrait;
use crate::utils::time_utils::{sub_days, today_in};

/// Streak and completion-history queries.
///
/// The whole streak window is loaded with one range query and walked in
/// memory, which is equivalent to querying one day at a time.
pub struct StreakService {
    task_repository: Arc<dyn TaskRepositoryTrait>,
    timezone: Tz,
}

impl StreakService {
    pub fn new(task_repository: Arc<dyn TaskRepositoryTrait>, timezone: Tz) -> Self {
        Self {
            task_repository,
            timezone,
        }
    }

    fn resolve_day(&self, day: Option<NaiveDate>) -> NaiveDate {
        day.unwrap_or_else(|| today_in(self.timezone))
    }
}

impl StreakServiceTrait for StreakService {
    fn compute_streak(&self, owner: &OwnerId, as_of: Option<NaiveDate>) -> Result<u32> {
        let as_of = self.resolve_day(as_of);
        let window_start =
            sub_days(as_of, u64::from(MAX_STREAK_DAYS - 1)).unwrap_or(NaiveDate::MIN);

        let tasks = self
            .task_repository
            .list_by_owner_between(owner.as_str(), window_start, as_of)?;
        let index = index_by_due_date(&tasks);
        let streak = streak_from_index(as_of, &index);
        debug!("Streak for {} as of {}: {} days", owner, as_of, streak);
        Ok(streak)
    }

    fn streak_summary(&self, owner: &OwnerId, as_of: Option<NaiveDate>) -> Result<StreakSummary> {
        let as_of = self.resolve_day(as_of);
        let current_streak = self.compute_streak(owner, Some(as_of))?;
        Ok(StreakSummary {
            as_of,
            current_streak,
        })
    }

    fn completion_history(
        &self,
        owner: &OwnerId,
        end: Option<NaiveDate>,
        days: u32,
    ) -> Result<Vec<DailyCompletion>> {
        if !(1..=MAX_HISTORY_DAYS).contains(&days) {
            return Err(ValidationError::OutOfRange {
                field: "days",
                min: 1,
                max: i64::from(MAX_HISTORY_DAYS),
                value: i64::from(days),
            }
            .into());
        }
        let end = self.resolve_day(end);
        let start = sub_days(end, u64::from(days - 1)).ok_or_else(|| {
            ValidationError::InvalidInput(format!("history window before {} is out of range", end))
        })?;

        let tasks = self
            .task_repository
            .list_by_owner_between(owner.as_str(), start, end)?;
        let index = index_by_due_date(&tasks);
        Ok(history_from_index(start, end, &index))
    }
}
