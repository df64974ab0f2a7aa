//! Goals domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_GOAL_STEPS;
use crate::errors::{Result, ValidationError};

/// Lifecycle status of a goal. Always derived from the step counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
}

impl GoalStatus {
    /// `Completed` iff `completed_steps >= total_steps`.
    pub fn derive(completed_steps: i32, total_steps: i32) -> Self {
        if completed_steps >= total_steps {
            GoalStatus::Completed
        } else {
            GoalStatus::Active
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(GoalStatus::Active),
            "completed" => Some(GoalStatus::Completed),
            _ => None,
        }
    }
}

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub total_steps: i32,
    pub completed_steps: i32,
    pub start_date: NaiveDate,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    /// Bumped on every counter write; used for compare-and-set.
    pub version: i32,
}

impl Goal {
    /// Applies a completion delta, clamping the counter to `[0, total_steps]`
    /// and re-deriving the status.
    pub fn apply_delta(&mut self, delta: i32) {
        self.set_completed_steps(self.completed_steps.saturating_add(delta));
    }

    /// Overwrites the counter (clamped) and re-derives the status.
    pub fn set_completed_steps(&mut self, completed_steps: i32) {
        self.completed_steps = completed_steps.clamp(0, self.total_steps.max(0));
        self.status = GoalStatus::derive(self.completed_steps, self.total_steps);
    }

    /// Completion percentage rounded to the nearest integer.
    pub fn progress_percent(&self) -> u8 {
        if self.total_steps <= 0 {
            return 0;
        }
        let pct = (self.completed_steps as f64 / self.total_steps as f64) * 100.0;
        pct.round().clamp(0.0, 100.0) as u8
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub description: Option<String>,
    pub total_steps: i32,
    pub start_date: NaiveDate,
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if !(1..=MAX_GOAL_STEPS).contains(&self.total_steps) {
            return Err(ValidationError::OutOfRange {
                field: "totalSteps",
                min: 1,
                max: MAX_GOAL_STEPS as i64,
                value: self.total_steps as i64,
            }
            .into());
        }
        Ok(())
    }
}

/// Editable goal fields. Counter, step count and start date are not editable.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub name: String,
    pub description: Option<String>,
}

impl GoalUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// Progress read model for a single goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub completed_steps: i32,
    pub total_steps: i32,
    pub percent: u8,
    pub status: GoalStatus,
}

impl From<&Goal> for GoalProgress {
    fn from(goal: &Goal) -> Self {
        Self {
            goal_id: goal.id.clone(),
            completed_steps: goal.completed_steps,
            total_steps: goal.total_steps,
            percent: goal.progress_percent(),
            status: goal.status,
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField("name".to_string()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn goal(total_steps: i32, completed_steps: i32) -> Goal {
        Goal {
            id: "g1".to_string(),
            owner_id: "u1".to_string(),
            name: "Read".to_string(),
            description: None,
            total_steps,
            completed_steps,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: GoalStatus::derive(completed_steps, total_steps),
            created_at: Utc::now(),
            version: 0,
        }
    }

    #[test]
    fn test_apply_delta_clamps_and_derives_status() {
        let mut g = goal(2, 0);
        g.apply_delta(-1);
        assert_eq!(g.completed_steps, 0);
        assert_eq!(g.status, GoalStatus::Active);

        g.apply_delta(1);
        g.apply_delta(1);
        assert_eq!(g.completed_steps, 2);
        assert_eq!(g.status, GoalStatus::Completed);

        g.apply_delta(1);
        assert_eq!(g.completed_steps, 2);

        g.apply_delta(-1);
        assert_eq!(g.status, GoalStatus::Active);
    }

    #[test]
    fn test_progress_percent_rounds() {
        assert_eq!(goal(3, 1).progress_percent(), 33);
        assert_eq!(goal(3, 2).progress_percent(), 67);
        assert_eq!(goal(3, 3).progress_percent(), 100);
        assert_eq!(goal(10, 0).progress_percent(), 0);
    }

    #[test]
    fn test_new_goal_validation() {
        let mut new_goal = NewGoal {
            name: "Run".to_string(),
            description: None,
            total_steps: 10,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        assert!(new_goal.validate().is_ok());

        new_goal.total_steps = 0;
        assert!(matches!(new_goal.validate(), Err(Error::Validation(_))));

        new_goal.total_steps = MAX_GOAL_STEPS + 1;
        assert!(matches!(new_goal.validate(), Err(Error::Validation(_))));

        new_goal.total_steps = 5;
        new_goal.name = "   ".to_string();
        assert!(matches!(
            new_goal.validate(),
            Err(Error::Validation(ValidationError::MissingField(_)))
        ));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&GoalStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
        assert_eq!(GoalStatus::parse("active"), Some(GoalStatus::Active));
        assert_eq!(GoalStatus::parse("done"), None);
    }
}
