//! Database models for goals.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use log::warn;

use dailysteps_core::goals::{Goal, GoalStatus, NewGoal};

/// Database model for goals
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub total_steps: i32,
    pub completed_steps: i32,
    pub start_date: NaiveDate,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub version: i32,
}

/// Database model for creating a new goal
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
pub struct NewGoalDB {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub total_steps: i32,
    pub completed_steps: i32,
    pub start_date: NaiveDate,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub version: i32,
}

impl NewGoalDB {
    pub fn new(id: String, owner_id: &str, goal: NewGoal) -> Self {
        Self {
            id,
            owner_id: owner_id.to_string(),
            name: goal.name,
            description: goal.description,
            total_steps: goal.total_steps,
            completed_steps: 0,
            start_date: goal.start_date,
            status: GoalStatus::Active.as_str().to_string(),
            created_at: Utc::now().naive_utc(),
            version: 0,
        }
    }
}

// Conversion to domain models
impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        let status = GoalStatus::parse(&db.status).unwrap_or_else(|| {
            warn!("Goal {} has unknown status '{}'", db.id, db.status);
            GoalStatus::derive(db.completed_steps, db.total_steps)
        });
        Self {
            id: db.id,
            owner_id: db.owner_id,
            name: db.name,
            description: db.description,
            total_steps: db.total_steps,
            completed_steps: db.completed_steps,
            start_date: db.start_date,
            status,
            created_at: db.created_at.and_utc(),
            version: db.version,
        }
    }
}
