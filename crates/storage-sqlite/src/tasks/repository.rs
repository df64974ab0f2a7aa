use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use dailysteps_core::tasks::{CompletionChange, Task, TaskRepositoryTrait};
use dailysteps_core::Result;

use super::model::TaskDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::tasks;
use crate::schema::tasks::dsl::*;
use crate::utils::chunk_for_sqlite;

/// Repository for task rows.
pub struct TaskRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TaskRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TaskRepository { pool, writer }
    }

    fn load<F>(&self, query: F) -> Result<Vec<Task>>
    where
        F: FnOnce(&mut SqliteConnection) -> QueryResult<Vec<TaskDB>>,
    {
        let mut conn = get_connection(&self.pool)?;
        let tasks_db = query(&mut conn).into_core()?;
        Ok(tasks_db.into_iter().map(Task::from).collect())
    }
}

/// Inserts task rows in SQLite-sized chunks on the caller's connection.
///
/// Runs inside a writer job, so every chunk shares one transaction.
pub(crate) fn insert_task_rows(conn: &mut SqliteConnection, rows: &[TaskDB]) -> Result<()> {
    for chunk in chunk_for_sqlite(rows) {
        diesel::insert_into(tasks::table)
            .values(chunk)
            .execute(conn)
            .into_core()?;
    }
    debug!("Inserted {} tasks", rows.len());
    Ok(())
}

#[async_trait]
impl TaskRepositoryTrait for TaskRepository {
    fn get_by_id(&self, task_id: &str) -> Result<Task> {
        let mut conn = get_connection(&self.pool)?;
        let task_db = tasks
            .find(task_id)
            .select(TaskDB::as_select())
            .first::<TaskDB>(&mut conn)
            .into_core()?;
        Ok(task_db.into())
    }

    fn list_by_goal(&self, goal: &str) -> Result<Vec<Task>> {
        self.load(|conn| {
            tasks
                .filter(goal_id.eq(goal))
                .order(step_number.asc())
                .select(TaskDB::as_select())
                .load(conn)
        })
    }

    fn list_by_owner_and_due_date(&self, owner: &str, day: NaiveDate) -> Result<Vec<Task>> {
        self.load(|conn| {
            tasks
                .filter(owner_id.eq(owner))
                .filter(due_date.eq(day))
                .order((goal_id.asc(), step_number.asc()))
                .select(TaskDB::as_select())
                .load(conn)
        })
    }

    fn list_by_owner_between(
        &self,
        owner: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Task>> {
        if start > end {
            return Ok(Vec::new());
        }
        self.load(|conn| {
            tasks
                .filter(owner_id.eq(owner))
                .filter(due_date.between(start, end))
                .order((due_date.asc(), goal_id.asc(), step_number.asc()))
                .select(TaskDB::as_select())
                .load(conn)
        })
    }

    async fn set_completion(
        &self,
        task_id: &str,
        is_completed: bool,
        at: Option<DateTime<Utc>>,
    ) -> Result<CompletionChange> {
        let task_id = task_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CompletionChange> {
                let previous = tasks
                    .find(&task_id)
                    .select(TaskDB::as_select())
                    .first::<TaskDB>(conn)
                    .into_core()?;

                let updated = diesel::update(tasks.find(&task_id))
                    .set((
                        completed.eq(is_completed),
                        completed_at.eq(at.map(|ts| ts.naive_utc())),
                    ))
                    .returning(TaskDB::as_returning())
                    .get_result(conn)
                    .into_core()?;

                Ok(CompletionChange {
                    previous_completed: previous.completed,
                    previous_completed_at: previous.completed_at.map(|ts| ts.and_utc()),
                    task: updated.into(),
                })
            })
            .await
    }

    fn count_completed_for_goal(&self, goal: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        tasks
            .filter(goal_id.eq(goal))
            .filter(completed.eq(true))
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()
    }

    async fn delete_by_goal(&self, goal: &str) -> Result<usize> {
        let goal = goal.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(tasks.filter(goal_id.eq(goal)))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
