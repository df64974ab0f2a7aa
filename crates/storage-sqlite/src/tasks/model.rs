//! Database models for tasks.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use dailysteps_core::tasks::{NewTask, Task};

/// Database model for tasks. Also used for inserts, since ids and
/// timestamps are assigned before the row is written.
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_default_value = false)]
pub struct TaskDB {
    pub id: String,
    pub goal_id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub step_number: i32,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl TaskDB {
    pub fn from_new(id: String, task: NewTask, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            goal_id: task.goal_id,
            owner_id: task.owner_id,
            title: task.title,
            description: task.description,
            step_number: task.step_number,
            due_date: task.due_date,
            completed: false,
            completed_at: None,
            created_at,
        }
    }

    pub fn new_batch(new_tasks: Vec<NewTask>) -> Vec<Self> {
        let now = Utc::now().naive_utc();
        new_tasks
            .into_iter()
            .map(|task| Self::from_new(uuid::Uuid::new_v4().to_string(), task, now))
            .collect()
    }
}

impl From<TaskDB> for Task {
    fn from(db: TaskDB) -> Self {
        Self {
            id: db.id,
            goal_id: db.goal_id,
            owner_id: db.owner_id,
            title: db.title,
            description: db.description,
            step_number: db.step_number,
            due_date: db.due_date,
            completed: db.completed,
            completed_at: db.completed_at.map(|at| at.and_utc()),
            created_at: db.created_at.and_utc(),
        }
    }
}
