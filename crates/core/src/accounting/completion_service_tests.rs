#[cfg(test)]
mod tests {
    use crate::accounting::{AccountingConfig, CompletionService, CompletionServiceTrait};
    use crate::errors::{Error, PartialFailure};
    use crate::events::DomainEvent;
    use crate::goals::{Goal, GoalRepositoryTrait, GoalStatus, NewGoal};
    use crate::identity::{require_owner, OwnerId, StaticIdentity};
    use crate::in_memory::{InMemoryGoalRepository, InMemoryTaskRepository, RecordingEventSink};
    use crate::tasks::{generate_tasks, Task, TaskRepositoryTrait};
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct Fixture {
        service: Arc<CompletionService>,
        goals: Arc<InMemoryGoalRepository>,
        tasks: Arc<InMemoryTaskRepository>,
        sink: RecordingEventSink,
        goal: Goal,
        goal_tasks: Vec<Task>,
    }

    fn owner(id: &str) -> OwnerId {
        require_owner(&StaticIdentity::user(id)).unwrap()
    }

    async fn fixture_with(total_steps: i32, config: AccountingConfig) -> Fixture {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let goals = Arc::new(InMemoryGoalRepository::new(tasks.clone()));
        let sink = RecordingEventSink::new();
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let (goal, goal_tasks) = goals
            .create_with_tasks(
                "g1",
                "u1",
                NewGoal {
                    name: "Meditate".to_string(),
                    description: None,
                    total_steps,
                    start_date: start,
                },
                generate_tasks("g1", "u1", total_steps, start).unwrap(),
            )
            .await
            .unwrap();

        let service = Arc::new(CompletionService::new(
            tasks.clone(),
            goals.clone(),
            Arc::new(sink.clone()),
            config,
        ));
        Fixture {
            service,
            goals,
            tasks,
            sink,
            goal,
            goal_tasks,
        }
    }

    async fn fixture(total_steps: i32) -> Fixture {
        fixture_with(total_steps, AccountingConfig::default()).await
    }

    #[tokio::test]
    async fn test_completing_task_increments_goal() {
        let f = fixture(3).await;
        let task_id = &f.goal_tasks[0].id;

        let outcome = f
            .service
            .set_task_completion(&owner("u1"), task_id, true)
            .await
            .unwrap();

        assert_eq!(outcome.delta, 1);
        assert!(outcome.task.completed);
        assert!(outcome.task.completed_at.is_some());
        assert_eq!(outcome.goal.completed_steps, 1);
        assert_eq!(outcome.goal.status, GoalStatus::Active);
        assert_eq!(f.goals.get_by_id(&f.goal.id).unwrap().completed_steps, 1);
    }

    #[tokio::test]
    async fn test_repeated_completion_counts_once() {
        let f = fixture(3).await;
        let u1 = owner("u1");
        let task_id = &f.goal_tasks[1].id;

        f.service.set_task_completion(&u1, task_id, true).await.unwrap();
        let second = f.service.set_task_completion(&u1, task_id, true).await.unwrap();

        assert_eq!(second.delta, 0);
        assert!(second.task.completed);
        assert_eq!(second.goal.completed_steps, 1);
    }

    #[tokio::test]
    async fn test_complete_then_uncomplete_round_trips() {
        let f = fixture(2).await;
        let u1 = owner("u1");
        let task_id = &f.goal_tasks[0].id;

        f.service.set_task_completion(&u1, task_id, true).await.unwrap();
        let outcome = f.service.set_task_completion(&u1, task_id, false).await.unwrap();

        assert_eq!(outcome.delta, -1);
        assert_eq!(outcome.goal.completed_steps, 0);
        assert!(!outcome.task.completed);
        assert!(outcome.task.completed_at.is_none());
        assert!(f.tasks.get_by_id(task_id).unwrap().completed_at.is_none());
    }

    #[tokio::test]
    async fn test_uncompleting_an_open_task_never_goes_negative() {
        let f = fixture(2).await;

        let outcome = f
            .service
            .set_task_completion(&owner("u1"), &f.goal_tasks[0].id, false)
            .await
            .unwrap();

        assert_eq!(outcome.delta, 0);
        assert_eq!(outcome.goal.completed_steps, 0);
    }

    #[tokio::test]
    async fn test_completing_every_task_completes_goal() {
        let f = fixture(2).await;
        let u1 = owner("u1");

        f.service
            .set_task_completion(&u1, &f.goal_tasks[0].id, true)
            .await
            .unwrap();
        let outcome = f
            .service
            .set_task_completion(&u1, &f.goal_tasks[1].id, true)
            .await
            .unwrap();
        assert_eq!(outcome.goal.status, GoalStatus::Completed);
        assert!(f
            .sink
            .events()
            .contains(&DomainEvent::goal_status_changed("u1", &f.goal.id, GoalStatus::Completed)));

        let reopened = f
            .service
            .set_task_completion(&u1, &f.goal_tasks[1].id, false)
            .await
            .unwrap();
        assert_eq!(reopened.goal.status, GoalStatus::Active);
        assert_eq!(reopened.goal.completed_steps, 1);
    }

    #[tokio::test]
    async fn test_unknown_or_foreign_task_is_not_found() {
        let f = fixture(1).await;

        let err = f
            .service
            .set_task_completion(&owner("u1"), "missing", true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "Task", .. }));

        let err = f
            .service
            .set_task_completion(&owner("u2"), &f.goal_tasks[0].id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "Task", .. }));
        assert!(!f.tasks.get_by_id(&f.goal_tasks[0].id).unwrap().completed);
    }

    #[tokio::test]
    async fn test_deleted_goal_reports_partial_failure() {
        let f = fixture(2).await;
        f.goals.remove(&f.goal.id);

        let err = f
            .service
            .set_task_completion(&owner("u1"), &f.goal_tasks[0].id, true)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::PartialFailure(PartialFailure::GoalCounter { .. })
        ));
        // The task side of the toggle stands.
        assert!(f.tasks.get_by_id(&f.goal_tasks[0].id).unwrap().completed);
    }

    #[tokio::test]
    async fn test_lost_races_are_retried() {
        let f = fixture(3).await;
        f.goals.lose_next_races(2);

        let outcome = f
            .service
            .set_task_completion(&owner("u1"), &f.goal_tasks[0].id, true)
            .await
            .unwrap();

        assert_eq!(outcome.goal.completed_steps, 1);
        assert_eq!(outcome.goal.version, 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_revert_the_task() {
        let f = fixture_with(3, AccountingConfig { max_attempts: 3 }).await;
        f.goals.lose_next_races(10);

        let err = f
            .service
            .set_task_completion(&owner("u1"), &f.goal_tasks[0].id, true)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::ConflictRetryExhausted { attempts: 3, .. }
        ));
        let task = f.tasks.get_by_id(&f.goal_tasks[0].id).unwrap();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert_eq!(f.goals.get_by_id(&f.goal.id).unwrap().completed_steps, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_toggles_of_one_goal_lose_nothing() {
        let f = fixture(24).await;

        let handles: Vec<_> = f
            .goal_tasks
            .iter()
            .map(|task| {
                let service = f.service.clone();
                let task_id = task.id.clone();
                tokio::spawn(async move {
                    service
                        .set_task_completion(&owner("u1"), &task_id, true)
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let goal = f.goals.get_by_id(&f.goal.id).unwrap();
        assert_eq!(goal.completed_steps, 24);
        assert_eq!(goal.status, GoalStatus::Completed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_toggles_of_one_task_count_once() {
        let f = fixture(5).await;
        let task_id = f.goal_tasks[2].id.clone();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = f.service.clone();
                let task_id = task_id.clone();
                tokio::spawn(async move {
                    service
                        .set_task_completion(&owner("u1"), &task_id, true)
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(f.goals.get_by_id(&f.goal.id).unwrap().completed_steps, 1);
    }

    #[tokio::test]
    async fn test_reconcile_recounts_completed_tasks() {
        let f = fixture(4).await;
        let u1 = owner("u1");
        for task in &f.goal_tasks[..3] {
            f.service.set_task_completion(&u1, &task.id, true).await.unwrap();
        }
        // Corrupt the counter behind the service's back.
        let mut drifted = f.goals.get_by_id(&f.goal.id).unwrap();
        drifted.completed_steps = 0;
        f.goals.insert(drifted);

        let goal = f.service.reconcile_goal(&u1, &f.goal.id).await.unwrap();

        assert_eq!(goal.completed_steps, 3);
        assert_eq!(goal.status, GoalStatus::Active);
        assert_eq!(
            f.sink.events().last(),
            Some(&DomainEvent::goal_reconciled("u1", &f.goal.id, 0, 3))
        );
    }

    #[tokio::test]
    async fn test_reconcile_foreign_goal_is_not_found() {
        let f = fixture(1).await;
        let err = f
            .service
            .reconcile_goal(&owner("u2"), &f.goal.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "Goal", .. }));
    }
}
