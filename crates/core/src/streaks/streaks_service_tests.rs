#[cfg(test)]
mod tests {
    use crate::constants::MAX_STREAK_DAYS;
    use crate::errors::Error;
    use crate::identity::{require_owner, OwnerId, StaticIdentity};
    use crate::in_memory::InMemoryTaskRepository;
    use crate::streaks::{DailyCompletion, StreakService, StreakServiceTrait};
    use crate::tasks::Task;
    use crate::utils::time_utils::{sub_days, today_in, DEFAULT_TZ};
    use chrono::{NaiveDate, Utc};
    use std::sync::Arc;

    fn owner(id: &str) -> OwnerId {
        require_owner(&StaticIdentity::user(id)).unwrap()
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        sub_days(as_of(), n).unwrap()
    }

    struct History {
        repo: Arc<InMemoryTaskRepository>,
        next_id: u32,
    }

    impl History {
        fn new() -> Self {
            Self {
                repo: Arc::new(InMemoryTaskRepository::new()),
                next_id: 0,
            }
        }

        fn task(&mut self, owner_id: &str, due_date: NaiveDate, completed: bool) -> &mut Self {
            self.next_id += 1;
            self.repo.insert(Task {
                id: format!("t{}", self.next_id),
                goal_id: "g1".to_string(),
                owner_id: owner_id.to_string(),
                title: format!("Day {}", self.next_id),
                description: String::new(),
                step_number: self.next_id as i32,
                due_date,
                completed,
                completed_at: completed.then(Utc::now),
                created_at: Utc::now(),
            });
            self
        }

        fn service(&self) -> StreakService {
            StreakService::new(self.repo.clone(), DEFAULT_TZ)
        }
    }

    #[test]
    fn test_five_day_streak_ends_at_incomplete_day() {
        let mut history = History::new();
        for n in 0..5 {
            history.task("u1", days_ago(n), true);
        }
        history.task("u1", days_ago(5), false);
        history.task("u1", days_ago(6), false);

        let streak = history
            .service()
            .compute_streak(&owner("u1"), Some(as_of()))
            .unwrap();
        assert_eq!(streak, 5);
    }

    #[test]
    fn test_day_without_tasks_breaks_streak() {
        let mut history = History::new();
        history.task("u1", days_ago(0), true);
        history.task("u1", days_ago(2), true);

        let streak = history
            .service()
            .compute_streak(&owner("u1"), Some(as_of()))
            .unwrap();
        assert_eq!(streak, 1);
    }

    #[test]
    fn test_incomplete_today_means_no_streak() {
        let mut history = History::new();
        history.task("u1", days_ago(0), false);
        history.task("u1", days_ago(1), true);
        history.task("u1", days_ago(2), true);

        let streak = history
            .service()
            .compute_streak(&owner("u1"), Some(as_of()))
            .unwrap();
        assert_eq!(streak, 0);
    }

    #[test]
    fn test_streak_is_capped_at_a_year() {
        let mut history = History::new();
        for n in 0..400 {
            history.task("u1", days_ago(n), true);
        }

        let streak = history
            .service()
            .compute_streak(&owner("u1"), Some(as_of()))
            .unwrap();
        assert_eq!(streak, MAX_STREAK_DAYS);
        assert_eq!(streak, 365);
    }

    #[test]
    fn test_other_owners_tasks_do_not_count() {
        let mut history = History::new();
        history.task("u2", days_ago(0), true);
        history.task("u1", days_ago(0), false);

        let service = history.service();
        assert_eq!(service.compute_streak(&owner("u1"), Some(as_of())).unwrap(), 0);
        assert_eq!(service.compute_streak(&owner("u2"), Some(as_of())).unwrap(), 1);
    }

    #[test]
    fn test_streak_defaults_to_today() {
        let today = today_in(DEFAULT_TZ);
        let mut history = History::new();
        history.task("u1", today, true);

        let summary = history.service().streak_summary(&owner("u1"), None).unwrap();
        assert_eq!(summary.as_of, today);
        assert_eq!(summary.current_streak, 1);
    }

    #[test]
    fn test_completion_history_window() {
        let mut history = History::new();
        history
            .task("u1", days_ago(0), true)
            .task("u1", days_ago(0), false)
            .task("u1", days_ago(2), false)
            .task("u1", days_ago(9), true);

        let days = history
            .service()
            .completion_history(&owner("u1"), Some(as_of()), 3)
            .unwrap();

        assert_eq!(
            days,
            vec![
                DailyCompletion {
                    date: days_ago(2),
                    completed: 0,
                    total: 1
                },
                DailyCompletion::empty(days_ago(1)),
                DailyCompletion {
                    date: days_ago(0),
                    completed: 1,
                    total: 2
                },
            ]
        );
    }

    #[test]
    fn test_completion_history_rejects_bad_window() {
        let history = History::new();
        let service = history.service();
        assert!(matches!(
            service.completion_history(&owner("u1"), Some(as_of()), 0),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.completion_history(&owner("u1"), Some(as_of()), 1000),
            Err(Error::Validation(_))
        ));
    }
}
