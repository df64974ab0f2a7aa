//! Pure streak and history folds over task state.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::streaks_model::DailyCompletion;
use crate::constants::MAX_STREAK_DAYS;
use crate::tasks::Task;
use crate::utils::time_utils::get_days_between;

/// Buckets tasks by due date.
pub fn index_by_due_date<'a, I>(tasks: I) -> BTreeMap<NaiveDate, DailyCompletion>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut days: BTreeMap<NaiveDate, DailyCompletion> = BTreeMap::new();
    for task in tasks {
        let day = days
            .entry(task.due_date)
            .or_insert_with(|| DailyCompletion::empty(task.due_date));
        day.total += 1;
        if task.completed {
            day.completed += 1;
        }
    }
    days
}

/// Counts consecutive qualifying days walking back from `as_of`.
///
/// Stops at the first day for which `qualifies` is false, at the start of the
/// calendar, or at `MAX_STREAK_DAYS`.
pub fn current_streak<F>(as_of: NaiveDate, qualifies: F) -> u32
where
    F: Fn(NaiveDate) -> bool,
{
    let mut streak = 0;
    let mut day = as_of;
    while streak < MAX_STREAK_DAYS && qualifies(day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

/// Streak over an already-bucketed index. A day with no tasks breaks it.
pub fn streak_from_index(as_of: NaiveDate, index: &BTreeMap<NaiveDate, DailyCompletion>) -> u32 {
    current_streak(as_of, |day| index.get(&day).is_some_and(DailyCompletion::qualifies))
}

/// One entry per day in `[start, end]`, oldest first; days without tasks
/// are reported as `0/0`.
pub fn history_from_index(
    start: NaiveDate,
    end: NaiveDate,
    index: &BTreeMap<NaiveDate, DailyCompletion>,
) -> Vec<DailyCompletion> {
    get_days_between(start, end)
        .into_iter()
        .map(|day| {
            index
                .get(&day)
                .cloned()
                .unwrap_or_else(|| DailyCompletion::empty(day))
        })
        .collect()
}
