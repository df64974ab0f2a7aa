use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::goals_model::{Goal, GoalProgress, GoalUpdate, NewGoal};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::errors::{Error, PartialFailure, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::identity::OwnerId;
use crate::tasks::{generate_tasks, TaskRepositoryTrait};

/// Service for managing goals and the task batches they own
pub struct GoalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    task_repository: Arc<dyn TaskRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl GoalService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        task_repository: Arc<dyn TaskRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            goal_repository,
            task_repository,
            event_sink,
        }
    }

    /// Loads a goal and checks it belongs to `owner`. Goals of other owners
    /// are reported as missing.
    fn owned_goal(&self, owner: &OwnerId, goal_id: &str) -> Result<Goal> {
        let goal = self.goal_repository.get_by_id(goal_id).map_err(|e| {
            if e.is_not_found() {
                Error::goal_not_found(goal_id)
            } else {
                e
            }
        })?;
        if !owner.owns(&goal.owner_id) {
            return Err(Error::goal_not_found(goal_id));
        }
        Ok(goal)
    }

    /// Removes a goal whose task batch came back incomplete, tasks first.
    ///
    /// Returns whether both the tasks and the goal are gone. When the tasks
    /// cannot be removed the goal is kept so `delete_goal` can finish later.
    async fn roll_back_goal(&self, goal_id: &str) -> bool {
        if let Err(e) = self.task_repository.delete_by_goal(goal_id).await {
            warn!("Failed to remove tasks of goal {} after task generation error: {}", goal_id, e);
            return false;
        }
        match self.goal_repository.delete(goal_id).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Failed to roll back goal {} after task generation error: {}", goal_id, e);
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl GoalServiceTrait for GoalService {
    fn list_goals(&self, owner: &OwnerId) -> Result<Vec<Goal>> {
        let mut goals = self.goal_repository.list_by_owner(owner.as_str())?;
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(goals)
    }

    fn get_goal(&self, owner: &OwnerId, goal_id: &str) -> Result<Goal> {
        self.owned_goal(owner, goal_id)
    }

    fn goal_progress(&self, owner: &OwnerId, goal_id: &str) -> Result<GoalProgress> {
        let goal = self.owned_goal(owner, goal_id)?;
        Ok(GoalProgress::from(&goal))
    }

    async fn create_goal(&self, owner: &OwnerId, new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        debug!(
            "Creating goal '{}' for {} ({} steps from {})",
            new_goal.name, owner, new_goal.total_steps, new_goal.start_date
        );

        let total_steps = new_goal.total_steps;
        let goal_id = Uuid::new_v4().to_string();
        let batch = generate_tasks(&goal_id, owner.as_str(), total_steps, new_goal.start_date)?;

        let (goal, created) = self
            .goal_repository
            .create_with_tasks(&goal_id, owner.as_str(), new_goal, batch)
            .await?;

        if created.len() != total_steps as usize {
            // The store broke the all-or-nothing contract; undo what landed.
            let rolled_back = self.roll_back_goal(&goal.id).await;
            return Err(PartialFailure::TaskGeneration {
                goal_id: goal.id,
                expected: total_steps,
                rolled_back,
                reason: format!("store created {} of {} tasks", created.len(), total_steps),
            }
            .into());
        }

        info!("Created goal {} with {} tasks", goal.id, created.len());
        self.event_sink.emit(DomainEvent::goal_created(
            owner.as_str(),
            &goal.id,
            created.len(),
        ));
        Ok(goal)
    }

    async fn update_goal(
        &self,
        owner: &OwnerId,
        goal_id: &str,
        update: GoalUpdate,
    ) -> Result<Goal> {
        update.validate()?;
        self.owned_goal(owner, goal_id)?;
        let goal = self.goal_repository.update_details(goal_id, update).await?;
        self.event_sink
            .emit(DomainEvent::goal_updated(owner.as_str(), goal_id));
        Ok(goal)
    }

    async fn delete_goal(&self, owner: &OwnerId, goal_id: &str) -> Result<usize> {
        self.owned_goal(owner, goal_id)?;
        // Tasks first: if this fails the goal is still intact with its tasks.
        let tasks_deleted = self.task_repository.delete_by_goal(goal_id).await?;
        self.goal_repository.delete(goal_id).await?;
        info!("Deleted goal {} and {} tasks", goal_id, tasks_deleted);
        self.event_sink.emit(DomainEvent::goal_deleted(
            owner.as_str(),
            goal_id,
            tasks_deleted,
        ));
        Ok(tasks_deleted)
    }
}
