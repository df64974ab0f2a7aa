use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use dailysteps_core::goals::{Goal, GoalRepositoryTrait, GoalStatus, GoalUpdate, NewGoal};
use dailysteps_core::tasks::{NewTask, Task};
use dailysteps_core::Result;

use super::model::{GoalDB, NewGoalDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::goals;
use crate::schema::goals::dsl::*;
use crate::tasks::{insert_task_rows, TaskDB};

/// Repository for goal rows.
pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }
}

fn find_goal(conn: &mut SqliteConnection, goal_id: &str) -> Result<GoalDB> {
    goals
        .find(goal_id)
        .select(GoalDB::as_select())
        .first::<GoalDB>(conn)
        .into_core()
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    async fn create_with_tasks(
        &self,
        goal_id: &str,
        owner: &str,
        new_goal: NewGoal,
        new_tasks: Vec<NewTask>,
    ) -> Result<(Goal, Vec<Task>)> {
        let new_goal_db = NewGoalDB::new(goal_id.to_string(), owner, new_goal);
        let task_rows = TaskDB::new_batch(new_tasks);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<(Goal, Vec<Task>)> {
                let result_db = diesel::insert_into(goals::table)
                    .values(&new_goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                insert_task_rows(conn, &task_rows)?;
                Ok((
                    Goal::from(result_db),
                    task_rows.into_iter().map(Task::from).collect(),
                ))
            })
            .await
    }

    fn get_by_id(&self, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        find_goal(&mut conn, goal_id).map(Goal::from)
    }

    fn list_by_owner(&self, owner: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let goals_db = goals
            .filter(owner_id.eq(owner))
            .order(created_at.desc())
            .select(GoalDB::as_select())
            .load::<GoalDB>(&mut conn)
            .into_core()?;
        Ok(goals_db.into_iter().map(Goal::from).collect())
    }

    async fn update_details(&self, goal_id: &str, update: GoalUpdate) -> Result<Goal> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let result_db = diesel::update(goals.find(&goal_id))
                    .set((name.eq(update.name), description.eq(update.description)))
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(Goal::from(result_db))
            })
            .await
    }

    async fn update_progress(
        &self,
        goal_id: &str,
        expected_version: i32,
        new_completed_steps: i32,
        new_status: GoalStatus,
    ) -> Result<Option<Goal>> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Goal>> {
                let updated = diesel::update(
                    goals
                        .filter(id.eq(&goal_id))
                        .filter(version.eq(expected_version)),
                )
                .set((
                    completed_steps.eq(new_completed_steps),
                    status.eq(new_status.as_str()),
                    version.eq(version + 1),
                ))
                .returning(GoalDB::as_returning())
                .get_result(conn)
                .optional()
                .into_core()?;

                match updated {
                    Some(goal_db) => Ok(Some(Goal::from(goal_db))),
                    // Distinguish a lost race from a deleted goal.
                    None => find_goal(conn, &goal_id).map(|_| None),
                }
            })
            .await
    }

    async fn delete(&self, goal_id: &str) -> Result<usize> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(goals.find(goal_id)).execute(conn).into_core()
            })
            .await
    }
}
