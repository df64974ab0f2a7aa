use std::sync::Arc;

use crate::{
    auth::Owner,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use dailysteps_core::accounting::CompletionOutcome;
use dailysteps_core::tasks::Task;
use dailysteps_core::utils::time_utils::today_in;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    date: Option<NaiveDate>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    completed: bool,
}

/// `?date=` for one day, `?start=&end=` for an inclusive range, neither for today.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = match query {
        TaskQuery {
            date: Some(date),
            start: None,
            end: None,
        } => state.task_service.tasks_for_date(&owner, date)?,
        TaskQuery {
            date: None,
            start: Some(start),
            end: Some(end),
        } => state.task_service.tasks_between(&owner, start, end)?,
        TaskQuery {
            date: None,
            start: None,
            end: None,
        } => state
            .task_service
            .tasks_for_date(&owner, today_in(state.timezone))?,
        _ => {
            return Err(ApiError::BadRequest(
                "use either date or both start and end".to_string(),
            ))
        }
    };
    Ok(Json(tasks))
}

async fn set_completion(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Json(body): Json<CompletionRequest>,
) -> ApiResult<Json<CompletionOutcome>> {
    let outcome = state
        .completion_service
        .set_task_completion(&owner, &id, body.completed)
        .await?;
    Ok(Json(outcome))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks/{id}/completion", put(set_completion))
}
