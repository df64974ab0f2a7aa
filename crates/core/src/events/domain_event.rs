//! Domain event types.

use serde::{Deserialize, Serialize};

use crate::goals::GoalStatus;

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about domain data changes. Runtime adapters
/// translate them into platform-specific actions (logging, notifications,
/// cache invalidation). Nothing in the core consumes them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A goal and its generated tasks were created.
    GoalCreated {
        owner_id: String,
        goal_id: String,
        task_count: usize,
    },

    /// Goal name or description changed.
    GoalUpdated { owner_id: String, goal_id: String },

    /// A goal was deleted together with its tasks.
    GoalDeleted {
        owner_id: String,
        goal_id: String,
        tasks_deleted: usize,
    },

    /// A task completion toggle was applied to the goal counter.
    TaskCompletionChanged {
        owner_id: String,
        goal_id: String,
        task_id: String,
        completed: bool,
        /// Counter delta applied (-1, 0 or +1)
        delta: i32,
    },

    /// The derived goal status flipped.
    GoalStatusChanged {
        owner_id: String,
        goal_id: String,
        status: GoalStatus,
    },

    /// A goal counter was recomputed from its tasks.
    GoalReconciled {
        owner_id: String,
        goal_id: String,
        previous_completed_steps: i32,
        completed_steps: i32,
    },
}

impl DomainEvent {
    /// Creates a GoalCreated event.
    pub fn goal_created(owner_id: &str, goal_id: &str, task_count: usize) -> Self {
        Self::GoalCreated {
            owner_id: owner_id.to_string(),
            goal_id: goal_id.to_string(),
            task_count,
        }
    }

    /// Creates a GoalUpdated event.
    pub fn goal_updated(owner_id: &str, goal_id: &str) -> Self {
        Self::GoalUpdated {
            owner_id: owner_id.to_string(),
            goal_id: goal_id.to_string(),
        }
    }

    /// Creates a GoalDeleted event.
    pub fn goal_deleted(owner_id: &str, goal_id: &str, tasks_deleted: usize) -> Self {
        Self::GoalDeleted {
            owner_id: owner_id.to_string(),
            goal_id: goal_id.to_string(),
            tasks_deleted,
        }
    }

    /// Creates a TaskCompletionChanged event.
    pub fn task_completion_changed(
        owner_id: &str,
        goal_id: &str,
        task_id: &str,
        completed: bool,
        delta: i32,
    ) -> Self {
        Self::TaskCompletionChanged {
            owner_id: owner_id.to_string(),
            goal_id: goal_id.to_string(),
            task_id: task_id.to_string(),
            completed,
            delta,
        }
    }

    /// Creates a GoalStatusChanged event.
    pub fn goal_status_changed(owner_id: &str, goal_id: &str, status: GoalStatus) -> Self {
        Self::GoalStatusChanged {
            owner_id: owner_id.to_string(),
            goal_id: goal_id.to_string(),
            status,
        }
    }

    /// Creates a GoalReconciled event.
    pub fn goal_reconciled(
        owner_id: &str,
        goal_id: &str,
        previous_completed_steps: i32,
        completed_steps: i32,
    ) -> Self {
        Self::GoalReconciled {
            owner_id: owner_id.to_string(),
            goal_id: goal_id.to_string(),
            previous_completed_steps,
            completed_steps,
        }
    }

    /// Goal the event is about.
    pub fn goal_id(&self) -> &str {
        match self {
            Self::GoalCreated { goal_id, .. }
            | Self::GoalUpdated { goal_id, .. }
            | Self::GoalDeleted { goal_id, .. }
            | Self::TaskCompletionChanged { goal_id, .. }
            | Self::GoalStatusChanged { goal_id, .. }
            | Self::GoalReconciled { goal_id, .. } => goal_id,
        }
    }
}
