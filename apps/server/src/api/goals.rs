use std::sync::Arc;

use crate::{auth::Owner, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use dailysteps_core::goals::{Goal, GoalProgress, GoalUpdate, NewGoal};
use dailysteps_core::tasks::Task;

async fn list_goals(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.goal_service.list_goals(&owner)?;
    Ok(Json(goals))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Json(goal): Json<NewGoal>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let g = state.goal_service.create_goal(&owner, goal).await?;
    Ok((StatusCode::CREATED, Json(g)))
}

async fn get_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> ApiResult<Json<Goal>> {
    Ok(Json(state.goal_service.get_goal(&owner, &id)?))
}

async fn update_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Json(update): Json<GoalUpdate>,
) -> ApiResult<Json<Goal>> {
    let g = state.goal_service.update_goal(&owner, &id, update).await?;
    Ok(Json(g))
}

async fn delete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> ApiResult<StatusCode> {
    let _ = state.goal_service.delete_goal(&owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn goal_progress(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> ApiResult<Json<GoalProgress>> {
    Ok(Json(state.goal_service.goal_progress(&owner, &id)?))
}

async fn goal_tasks(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.task_service.tasks_for_goal(&owner, &id)?))
}

async fn reconcile_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> ApiResult<Json<Goal>> {
    let g = state.completion_service.reconcile_goal(&owner, &id).await?;
    Ok(Json(g))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route(
            "/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route("/goals/{id}/progress", get(goal_progress))
        .route("/goals/{id}/tasks", get(goal_tasks))
        .route("/goals/{id}/reconcile", post(reconcile_goal))
}
