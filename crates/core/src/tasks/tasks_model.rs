//! Task domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One daily unit of work generated for a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub goal_id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub step_number: i32,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input model for a generated task. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub goal_id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub step_number: i32,
    pub due_date: NaiveDate,
}

/// Result of an atomic completion write: the task after the write and the
/// completion state it held just before.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionChange {
    pub previous_completed: bool,
    pub previous_completed_at: Option<DateTime<Utc>>,
    pub task: Task,
}

impl CompletionChange {
    /// `+1` for false to true, `-1` for true to false, `0` otherwise.
    pub fn delta(&self) -> i32 {
        match (self.previous_completed, self.task.completed) {
            (false, true) => 1,
            (true, false) => -1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(previous: bool, now: bool) -> CompletionChange {
        CompletionChange {
            previous_completed: previous,
            previous_completed_at: None,
            task: Task {
                id: "t1".into(),
                goal_id: "g1".into(),
                owner_id: "u1".into(),
                title: String::new(),
                description: String::new(),
                step_number: 1,
                due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                completed: now,
                completed_at: None,
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_delta_from_transition() {
        assert_eq!(change(false, true).delta(), 1);
        assert_eq!(change(true, false).delta(), -1);
        assert_eq!(change(true, true).delta(), 0);
        assert_eq!(change(false, false).delta(), 0);
    }
}
