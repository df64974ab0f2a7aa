//! Goal repository and service traits.
//!
//! These traits define the contract for goal operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::goals_model::{Goal, GoalProgress, GoalStatus, GoalUpdate, NewGoal};
use crate::errors::Result;
use crate::identity::OwnerId;
use crate::tasks::{NewTask, Task};

/// Trait defining the contract for Goal repository operations.
///
/// Reads are synchronous, writes are async, matching the single-writer
/// storage model.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    /// Inserts a goal together with its generated tasks in one write: the goal
    /// and every task become visible, or none of them do. The goal starts with
    /// `completed_steps = 0`, `status = active` and `version = 0`.
    async fn create_with_tasks(
        &self,
        goal_id: &str,
        owner_id: &str,
        new_goal: NewGoal,
        tasks: Vec<NewTask>,
    ) -> Result<(Goal, Vec<Task>)>;

    /// Retrieves a goal by its ID. Fails with a not-found error if absent.
    fn get_by_id(&self, goal_id: &str) -> Result<Goal>;

    /// Lists every goal owned by `owner_id`, in no particular order.
    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Goal>>;

    /// Overwrites name and description only.
    async fn update_details(&self, goal_id: &str, update: GoalUpdate) -> Result<Goal>;

    /// Compare-and-set on the goal counter.
    ///
    /// Writes `completed_steps` and `status` and bumps `version` only if the
    /// stored version still equals `expected_version`. Returns `Ok(None)` when
    /// another writer got there first.
    async fn update_progress(
        &self,
        goal_id: &str,
        expected_version: i32,
        completed_steps: i32,
        status: GoalStatus,
    ) -> Result<Option<Goal>>;

    /// Deletes a goal by its ID.
    ///
    /// Returns the number of deleted records.
    async fn delete(&self, goal_id: &str) -> Result<usize>;
}

/// Trait defining the contract for Goal service operations.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    /// Goals of the owner, most recently created first.
    fn list_goals(&self, owner: &OwnerId) -> Result<Vec<Goal>>;

    fn get_goal(&self, owner: &OwnerId, goal_id: &str) -> Result<Goal>;

    fn goal_progress(&self, owner: &OwnerId, goal_id: &str) -> Result<GoalProgress>;

    /// Creates a goal and generates its daily tasks as one unit.
    async fn create_goal(&self, owner: &OwnerId, new_goal: NewGoal) -> Result<Goal>;

    async fn update_goal(&self, owner: &OwnerId, goal_id: &str, update: GoalUpdate)
        -> Result<Goal>;

    /// Deletes the goal and all of its tasks. Returns the number of tasks removed.
    async fn delete_goal(&self, owner: &OwnerId, goal_id: &str) -> Result<usize>;
}
