//! Task repository and service traits.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::tasks_model::{CompletionChange, Task};
use crate::errors::Result;
use crate::identity::OwnerId;

/// Trait defining the contract for Task repository operations.
#[async_trait]
pub trait TaskRepositoryTrait: Send + Sync {
    /// Retrieves a task by its ID. Fails with a not-found error if absent.
    fn get_by_id(&self, task_id: &str) -> Result<Task>;

    /// Tasks of a goal ordered by step number.
    fn list_by_goal(&self, goal_id: &str) -> Result<Vec<Task>>;

    fn list_by_owner_and_due_date(&self, owner_id: &str, due_date: NaiveDate)
        -> Result<Vec<Task>>;

    /// Owner's tasks due within `[start, end]`, ordered by due date.
    fn list_by_owner_between(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Task>>;

    /// Sets `completed`/`completed_at` and reports the previous `completed`
    /// value, read and written in one atomic step.
    async fn set_completion(
        &self,
        task_id: &str,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<CompletionChange>;

    fn count_completed_for_goal(&self, goal_id: &str) -> Result<i64>;

    /// Deletes all tasks of a goal. Returns the number of deleted records.
    async fn delete_by_goal(&self, goal_id: &str) -> Result<usize>;
}

/// Read-side task queries scoped to an owner.
pub trait TaskServiceTrait: Send + Sync {
    fn tasks_for_date(&self, owner: &OwnerId, date: NaiveDate) -> Result<Vec<Task>>;

    /// Inclusive range; empty when `start > end`.
    fn tasks_between(&self, owner: &OwnerId, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Task>>;

    fn tasks_for_goal(&self, owner: &OwnerId, goal_id: &str) -> Result<Vec<Task>>;
}
