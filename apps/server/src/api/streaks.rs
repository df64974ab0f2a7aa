use std::sync::Arc;

use crate::{auth::Owner, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use dailysteps_core::constants::DEFAULT_HISTORY_DAYS;
use dailysteps_core::streaks::{DailyCompletion, StreakSummary};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakQuery {
    as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    end: Option<NaiveDate>,
    days: Option<u32>,
}

async fn get_streak(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Query(query): Query<StreakQuery>,
) -> ApiResult<Json<StreakSummary>> {
    let summary = state.streak_service.streak_summary(&owner, query.as_of)?;
    Ok(Json(summary))
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<DailyCompletion>>> {
    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    let history = state
        .streak_service
        .completion_history(&owner, query.end, days)?;
    Ok(Json(history))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/streak", get(get_streak))
        .route("/history", get(get_history))
}
