//! In-memory repositories for service tests.
//!
//! Compiled for this crate's tests and behind the `test-utils` feature. Both
//! stores carry switches for injecting the failures the services must handle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::{DatabaseError, Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::{Goal, GoalRepositoryTrait, GoalStatus, GoalUpdate, NewGoal};
use crate::tasks::{CompletionChange, NewTask, Task, TaskRepositoryTrait};

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Event sink that keeps everything it receives.
#[derive(Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        guard(&self.events).clone()
    }

    pub fn is_empty(&self) -> bool {
        guard(&self.events).is_empty()
    }
}

impl DomainEventSink for RecordingEventSink {
    fn emit(&self, event: DomainEvent) {
        guard(&self.events).push(event);
    }
}

fn not_found(what: &str, id: &str) -> Error {
    Error::Database(DatabaseError::NotFound(format!("{} {}", what, id)))
}

pub struct InMemoryGoalRepository {
    goals: Mutex<HashMap<String, Goal>>,
    tasks: Arc<InMemoryTaskRepository>,
    lost_races: AtomicU32,
}

impl InMemoryGoalRepository {
    /// Goal store whose `create_with_tasks` writes into `tasks`.
    pub fn new(tasks: Arc<InMemoryTaskRepository>) -> Self {
        Self {
            goals: Mutex::new(HashMap::new()),
            tasks,
            lost_races: AtomicU32::new(0),
        }
    }

    /// Makes the next `count` compare-and-set writes lose, as if another
    /// process had bumped the version first.
    pub fn lose_next_races(&self, count: u32) {
        self.lost_races.store(count, Ordering::SeqCst);
    }

    /// Inserts a goal verbatim, without tasks.
    pub fn insert(&self, goal: Goal) {
        guard(&self.goals).insert(goal.id.clone(), goal);
    }

    /// Removes a goal without touching its tasks, simulating a concurrent delete.
    pub fn remove(&self, goal_id: &str) -> Option<Goal> {
        guard(&self.goals).remove(goal_id)
    }
}

#[async_trait]
impl GoalRepositoryTrait for InMemoryGoalRepository {
    async fn create_with_tasks(
        &self,
        goal_id: &str,
        owner_id: &str,
        new_goal: NewGoal,
        new_tasks: Vec<NewTask>,
    ) -> Result<(Goal, Vec<Task>)> {
        // Goal readers wait until the tasks are in.
        let mut goals = guard(&self.goals);
        let created = self.tasks.insert_batch(new_tasks)?;
        let goal = Goal {
            id: goal_id.to_string(),
            owner_id: owner_id.to_string(),
            name: new_goal.name,
            description: new_goal.description,
            total_steps: new_goal.total_steps,
            completed_steps: 0,
            start_date: new_goal.start_date,
            status: GoalStatus::Active,
            created_at: Utc::now(),
            version: 0,
        };
        goals.insert(goal.id.clone(), goal.clone());
        Ok((goal, created))
    }

    fn get_by_id(&self, goal_id: &str) -> Result<Goal> {
        guard(&self.goals)
            .get(goal_id)
            .cloned()
            .ok_or_else(|| not_found("goal", goal_id))
    }

    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Goal>> {
        Ok(guard(&self.goals)
            .values()
            .filter(|g| g.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_details(&self, goal_id: &str, update: GoalUpdate) -> Result<Goal> {
        let mut goals = guard(&self.goals);
        let goal = goals
            .get_mut(goal_id)
            .ok_or_else(|| not_found("goal", goal_id))?;
        goal.name = update.name;
        goal.description = update.description;
        Ok(goal.clone())
    }

    async fn update_progress(
        &self,
        goal_id: &str,
        expected_version: i32,
        completed_steps: i32,
        status: GoalStatus,
    ) -> Result<Option<Goal>> {
        let mut goals = guard(&self.goals);
        let goal = goals
            .get_mut(goal_id)
            .ok_or_else(|| not_found("goal", goal_id))?;

        let pending_losses = self.lost_races.load(Ordering::SeqCst);
        if pending_losses > 0 {
            self.lost_races.store(pending_losses - 1, Ordering::SeqCst);
            goal.version += 1;
            return Ok(None);
        }

        if goal.version != expected_version {
            return Ok(None);
        }
        goal.completed_steps = completed_steps;
        goal.status = status;
        goal.version += 1;
        Ok(Some(goal.clone()))
    }

    async fn delete(&self, goal_id: &str) -> Result<usize> {
        Ok(guard(&self.goals).remove(goal_id).map_or(0, |_| 1))
    }
}

#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<HashMap<String, Task>>,
    fail_batches: AtomicBool,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following goal creation fail without inserting anything.
    pub fn fail_batches(&self, fail: bool) {
        self.fail_batches.store(fail, Ordering::SeqCst);
    }

    /// Inserts a task verbatim.
    pub fn insert(&self, task: Task) {
        guard(&self.tasks).insert(task.id.clone(), task);
    }

    pub fn len(&self) -> usize {
        guard(&self.tasks).len()
    }

    pub fn is_empty(&self) -> bool {
        guard(&self.tasks).is_empty()
    }

    fn insert_batch(&self, new_tasks: Vec<NewTask>) -> Result<Vec<Task>> {
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::TransactionFailed(
                "batch insert rejected".to_string(),
            )));
        }
        let now = Utc::now();
        let created: Vec<Task> = new_tasks
            .into_iter()
            .map(|t| Task {
                id: Uuid::new_v4().to_string(),
                goal_id: t.goal_id,
                owner_id: t.owner_id,
                title: t.title,
                description: t.description,
                step_number: t.step_number,
                due_date: t.due_date,
                completed: false,
                completed_at: None,
                created_at: now,
            })
            .collect();
        let mut tasks = guard(&self.tasks);
        for task in &created {
            tasks.insert(task.id.clone(), task.clone());
        }
        Ok(created)
    }

    fn select(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        let mut tasks: Vec<Task> = guard(&self.tasks)
            .values()
            .filter(|t| predicate(t))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(a.goal_id.cmp(&b.goal_id))
                .then(a.step_number.cmp(&b.step_number))
        });
        tasks
    }
}

#[async_trait]
impl TaskRepositoryTrait for InMemoryTaskRepository {
    fn get_by_id(&self, task_id: &str) -> Result<Task> {
        guard(&self.tasks)
            .get(task_id)
            .cloned()
            .ok_or_else(|| not_found("task", task_id))
    }

    fn list_by_goal(&self, goal_id: &str) -> Result<Vec<Task>> {
        Ok(self.select(|t| t.goal_id == goal_id))
    }

    fn list_by_owner_and_due_date(
        &self,
        owner_id: &str,
        due_date: NaiveDate,
    ) -> Result<Vec<Task>> {
        Ok(self.select(|t| t.owner_id == owner_id && t.due_date == due_date))
    }

    fn list_by_owner_between(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Task>> {
        Ok(self.select(|t| t.owner_id == owner_id && t.due_date >= start && t.due_date <= end))
    }

    async fn set_completion(
        &self,
        task_id: &str,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<CompletionChange> {
        let mut tasks = guard(&self.tasks);
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| not_found("task", task_id))?;
        let previous_completed = task.completed;
        let previous_completed_at = task.completed_at;
        task.completed = completed;
        task.completed_at = completed_at;
        Ok(CompletionChange {
            previous_completed,
            previous_completed_at,
            task: task.clone(),
        })
    }

    fn count_completed_for_goal(&self, goal_id: &str) -> Result<i64> {
        Ok(guard(&self.tasks)
            .values()
            .filter(|t| t.goal_id == goal_id && t.completed)
            .count() as i64)
    }

    async fn delete_by_goal(&self, goal_id: &str) -> Result<usize> {
        let mut tasks = guard(&self.tasks);
        let before = tasks.len();
        tasks.retain(|_, t| t.goal_id != goal_id);
        Ok(before - tasks.len())
    }
}
