use async_trait::async_trait;

use super::accounting_model::CompletionOutcome;
use crate::errors::Result;
use crate::goals::Goal;
use crate::identity::OwnerId;

/// Keeps goal counters in step with task completion.
#[async_trait]
pub trait CompletionServiceTrait: Send + Sync {
    /// Sets a task's completion state and applies the resulting delta to its
    /// goal. Repeating the current state succeeds with a zero delta.
    async fn set_task_completion(
        &self,
        owner: &OwnerId,
        task_id: &str,
        completed: bool,
    ) -> Result<CompletionOutcome>;

    /// Recomputes a goal's counter by counting its completed tasks.
    async fn reconcile_goal(&self, owner: &OwnerId, goal_id: &str) -> Result<Goal>;
}
