use log::{debug, info, warn};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use super::accounting_model::{AccountingConfig, CompletionOutcome};
use super::accounting_traits::CompletionServiceTrait;
use crate::errors::{Error, PartialFailure, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::{Goal, GoalRepositoryTrait};
use crate::identity::OwnerId;
use crate::tasks::{CompletionChange, Task, TaskRepositoryTrait};

/// Applies task completion toggles to goal counters.
///
/// Counter writes for one goal are serialized twice over: a per-goal async
/// mutex inside this process, and a compare-and-set on the goal's `version`
/// in the store for writers outside it.
pub struct CompletionService {
    task_repository: Arc<dyn TaskRepositoryTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    config: AccountingConfig,
    goal_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl CompletionService {
    pub fn new(
        task_repository: Arc<dyn TaskRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        config: AccountingConfig,
    ) -> Self {
        Self {
            task_repository,
            goal_repository,
            event_sink,
            config,
            goal_locks: DashMap::new(),
        }
    }

    fn goal_lock(&self, goal_id: &str) -> Arc<Mutex<()>> {
        self.goal_locks
            .entry(goal_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the goal's mutex once nobody else holds or waits on it.
    fn release_goal_lock(&self, goal_id: &str) {
        self.goal_locks
            .remove_if(goal_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    fn owned_task(&self, owner: &OwnerId, task_id: &str) -> Result<Task> {
        let task = self
            .task_repository
            .get_by_id(task_id)
            .map_err(|e| if e.is_not_found() { Error::task_not_found(task_id) } else { e })?;
        if !owner.owns(&task.owner_id) {
            return Err(Error::task_not_found(task_id));
        }
        Ok(task)
    }

    fn owned_goal(&self, owner: &OwnerId, goal_id: &str) -> Result<Goal> {
        let goal = self
            .goal_repository
            .get_by_id(goal_id)
            .map_err(|e| if e.is_not_found() { Error::goal_not_found(goal_id) } else { e })?;
        if !owner.owns(&goal.owner_id) {
            return Err(Error::goal_not_found(goal_id));
        }
        Ok(goal)
    }

    /// Read-modify-write of a goal counter with compare-and-set retries.
    ///
    /// Returns the goal as read and as stored. When `adjust` changes neither
    /// the counter nor the status nothing is written.
    async fn write_goal_counter<F>(&self, goal_id: &str, adjust: F) -> Result<(Goal, Goal)>
    where
        F: Fn(&mut Goal) + Send + Sync,
    {
        let attempts = self.config.max_attempts.max(1);
        for attempt in 1..=attempts {
            let current = self.goal_repository.get_by_id(goal_id)?;
            let mut next = current.clone();
            adjust(&mut next);

            if next.completed_steps == current.completed_steps && next.status == current.status {
                return Ok((current, next));
            }

            let saved = self
                .goal_repository
                .update_progress(goal_id, current.version, next.completed_steps, next.status)
                .await?;
            if let Some(saved) = saved {
                return Ok((current, saved));
            }
            warn!(
                "Goal {} changed during counter update (attempt {}/{})",
                goal_id, attempt, attempts
            );
        }
        Err(Error::ConflictRetryExhausted {
            goal_id: goal_id.to_string(),
            attempts,
        })
    }

    /// Body of a toggle; runs with the goal's mutex held.
    async fn toggle_locked(
        &self,
        owner: &OwnerId,
        task_id: &str,
        goal_id: &str,
        completed: bool,
    ) -> Result<CompletionOutcome> {
        let completed_at = completed.then(Utc::now);
        let change = self
            .task_repository
            .set_completion(task_id, completed, completed_at)
            .await
            .map_err(|e| if e.is_not_found() { Error::task_not_found(task_id) } else { e })?;
        let delta = change.delta();
        debug!(
            "Task {} completed={} (was {}), applying delta {} to goal {}",
            task_id, completed, change.previous_completed, delta, goal_id
        );

        match self
            .write_goal_counter(goal_id, |goal| goal.apply_delta(delta))
            .await
        {
            Ok((before, goal)) => {
                self.emit_toggle_events(owner, &change, &before, &goal, delta);
                Ok(CompletionOutcome {
                    task: change.task,
                    goal,
                    delta,
                })
            }
            Err(e) if e.is_not_found() => {
                warn!(
                    "Goal {} vanished after task {} was updated; counter not applied",
                    goal_id, task_id
                );
                Err(PartialFailure::GoalCounter {
                    task_id: task_id.to_string(),
                    goal_id: goal_id.to_string(),
                    reason: "goal no longer exists".to_string(),
                }
                .into())
            }
            Err(e) => self.revert_task(&change, goal_id, e).await,
        }
    }

    /// Puts the task back the way it was so the whole toggle can be retried.
    /// If that fails too, the goal needs reconciliation.
    async fn revert_task(
        &self,
        change: &CompletionChange,
        goal_id: &str,
        cause: Error,
    ) -> Result<CompletionOutcome> {
        let task_id = change.task.id.as_str();
        match self
            .task_repository
            .set_completion(
                task_id,
                change.previous_completed,
                change.previous_completed_at,
            )
            .await
        {
            Ok(_) => Err(cause),
            Err(revert_err) => {
                warn!(
                    "Task {} left completed={} but goal {} not updated: {}",
                    task_id, change.task.completed, goal_id, revert_err
                );
                Err(PartialFailure::GoalCounter {
                    task_id: task_id.to_string(),
                    goal_id: goal_id.to_string(),
                    reason: format!("{}; reverting the task failed: {}", cause, revert_err),
                }
                .into())
            }
        }
    }

    fn emit_toggle_events(
        &self,
        owner: &OwnerId,
        change: &CompletionChange,
        before: &Goal,
        after: &Goal,
        delta: i32,
    ) {
        let mut events = vec![DomainEvent::task_completion_changed(
            owner.as_str(),
            &after.id,
            &change.task.id,
            change.task.completed,
            delta,
        )];
        if before.status != after.status {
            info!("Goal {} is now {}", after.id, after.status.as_str());
            events.push(DomainEvent::goal_status_changed(
                owner.as_str(),
                &after.id,
                after.status,
            ));
        }
        self.event_sink.emit_batch(events);
    }
}

#[async_trait]
impl CompletionServiceTrait for CompletionService {
    async fn set_task_completion(
        &self,
        owner: &OwnerId,
        task_id: &str,
        completed: bool,
    ) -> Result<CompletionOutcome> {
        let task = self.owned_task(owner, task_id)?;
        let goal_id = task.goal_id;

        let lock = self.goal_lock(&goal_id);
        let result = {
            let _guard = lock.lock().await;
            self.toggle_locked(owner, task_id, &goal_id, completed)
                .await
        };
        drop(lock);
        self.release_goal_lock(&goal_id);
        result
    }

    async fn reconcile_goal(&self, owner: &OwnerId, goal_id: &str) -> Result<Goal> {
        self.owned_goal(owner, goal_id)?;

        let lock = self.goal_lock(goal_id);
        let result = {
            let _guard = lock.lock().await;
            match self.task_repository.count_completed_for_goal(goal_id) {
                Ok(count) => {
                    let counted = i32::try_from(count).unwrap_or(i32::MAX);
                    self.write_goal_counter(goal_id, |goal| goal.set_completed_steps(counted))
                        .await
                }
                Err(e) => Err(e),
            }
        };
        drop(lock);
        self.release_goal_lock(goal_id);

        let (before, after) =
            result.map_err(|e| if e.is_not_found() { Error::goal_not_found(goal_id) } else { e })?;
        if before.completed_steps != after.completed_steps {
            info!(
                "Reconciled goal {}: {} -> {} completed steps",
                goal_id, before.completed_steps, after.completed_steps
            );
        }

        let mut events = vec![DomainEvent::goal_reconciled(
            owner.as_str(),
            goal_id,
            before.completed_steps,
            after.completed_steps,
        )];
        if before.status != after.status {
            events.push(DomainEvent::goal_status_changed(
                owner.as_str(),
                goal_id,
                after.status,
            ));
        }
        self.event_sink.emit_batch(events);
        Ok(after)
    }
}
