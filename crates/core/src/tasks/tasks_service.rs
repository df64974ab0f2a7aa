use log::debug;
use std::sync::Arc;

use chrono::NaiveDate;

use super::tasks_model::Task;
use super::tasks_traits::{TaskRepositoryTrait, TaskServiceTrait};
use crate::errors::{Error, Result};
use crate::goals::GoalRepositoryTrait;
use crate::identity::OwnerId;

/// Service for owner-scoped task queries
pub struct TaskService {
    task_repository: Arc<dyn TaskRepositoryTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
}

impl TaskService {
    pub fn new(
        task_repository: Arc<dyn TaskRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
    ) -> Self {
        Self {
            task_repository,
            goal_repository,
        }
    }
}

impl TaskServiceTrait for TaskService {
    fn tasks_for_date(&self, owner: &OwnerId, date: NaiveDate) -> Result<Vec<Task>> {
        self.task_repository
            .list_by_owner_and_due_date(owner.as_str(), date)
    }

    fn tasks_between(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Task>> {
        if start > end {
            return Ok(Vec::new());
        }
        debug!("Loading tasks for {} between {} and {}", owner, start, end);
        self.task_repository
            .list_by_owner_between(owner.as_str(), start, end)
    }

    fn tasks_for_goal(&self, owner: &OwnerId, goal_id: &str) -> Result<Vec<Task>> {
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
        self.task_repository.list_by_goal(goal_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::NewGoal;
    use crate::identity::{require_owner, StaticIdentity};
    use crate::in_memory::{InMemoryGoalRepository, InMemoryTaskRepository};
    use crate::tasks::generate_tasks;

    fn owner(id: &str) -> OwnerId {
        require_owner(&StaticIdentity::user(id)).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded() -> (TaskService, String) {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let goals = Arc::new(InMemoryGoalRepository::new(tasks.clone()));
        let (goal, _) = goals
            .create_with_tasks(
                "g1",
                "u1",
                NewGoal {
                    name: "Stretch".into(),
                    description: None,
                    total_steps: 5,
                    start_date: date(2024, 4, 1),
                },
                generate_tasks("g1", "u1", 5, date(2024, 4, 1)).unwrap(),
            )
            .await
            .unwrap();
        (TaskService::new(tasks, goals), goal.id)
    }

    #[tokio::test]
    async fn test_tasks_for_date_and_range() {
        let (service, _) = seeded().await;
        let u1 = owner("u1");

        let day = service.tasks_for_date(&u1, date(2024, 4, 3)).unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].step_number, 3);

        let range = service
            .tasks_between(&u1, date(2024, 4, 4), date(2024, 4, 30))
            .unwrap();
        assert_eq!(range.len(), 2);

        let inverted = service
            .tasks_between(&u1, date(2024, 4, 5), date(2024, 4, 1))
            .unwrap();
        assert!(inverted.is_empty());

        assert!(service
            .tasks_for_date(&owner("u2"), date(2024, 4, 3))
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_tasks_for_goal_is_owner_scoped() {
        let (service, goal_id) = seeded().await;

        let tasks = service.tasks_for_goal(&owner("u1"), &goal_id).unwrap();
        assert_eq!(
            tasks.iter().map(|t| t.step_number).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );

        let err = service.tasks_for_goal(&owner("u2"), &goal_id).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "Goal", .. }));

        let err = service.tasks_for_goal(&owner("u1"), "missing").unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "Goal", .. }));
    }
}
