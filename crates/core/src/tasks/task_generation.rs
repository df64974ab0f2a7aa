//! Builds the daily task sequence for a goal.

use chrono::NaiveDate;

use super::tasks_model::NewTask;
use crate::constants::MAX_GOAL_STEPS;
use crate::errors::{Result, ValidationError};
use crate::utils::time_utils::add_days;

pub fn task_title(step_number: i32) -> String {
    format!("Day {} - Complete your goal step", step_number)
}

pub fn task_description(step_number: i32, total_steps: i32) -> String {
    format!("Complete step {} of {}", step_number, total_steps)
}

/// Produces exactly `total_steps` tasks for a goal.
///
/// Step numbers run `1..=total_steps` and step `n` is due on
/// `start_date + (n - 1)` calendar days. Nothing is persisted here; the
/// caller hands the batch to `GoalRepositoryTrait::create_with_tasks`.
pub fn generate_tasks(
    goal_id: &str,
    owner_id: &str,
    total_steps: i32,
    start_date: NaiveDate,
) -> Result<Vec<NewTask>> {
    if !(1..=MAX_GOAL_STEPS).contains(&total_steps) {
        return Err(ValidationError::OutOfRange {
            field: "totalSteps",
            min: 1,
            max: MAX_GOAL_STEPS as i64,
            value: total_steps as i64,
        }
        .into());
    }

    (1..=total_steps)
        .map(|step_number| {
            let due_date = add_days(start_date, (step_number - 1) as u64).ok_or_else(|| {
                ValidationError::InvalidInput(format!(
                    "due date for step {} is out of range (start {})",
                    step_number, start_date
                ))
            })?;
            Ok(NewTask {
                goal_id: goal_id.to_string(),
                owner_id: owner_id.to_string(),
                title: task_title(step_number),
                description: task_description(step_number, total_steps),
                step_number,
                due_date,
            })
        })
        .collect()
}
