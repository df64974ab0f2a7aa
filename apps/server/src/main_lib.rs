use std::sync::Arc;

use chrono_tz::Tz;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use dailysteps_core::{
    accounting::{AccountingConfig, CompletionService, CompletionServiceTrait},
    events::DomainEventSink,
    goals::{GoalService, GoalServiceTrait},
    streaks::{StreakService, StreakServiceTrait},
    tasks::{TaskService, TaskServiceTrait},
};
use dailysteps_storage_sqlite::{db, GoalRepository, TaskRepository};

use crate::{auth::JwtVerifier, config::Config, domain_events::LoggingDomainEventSink};

pub struct AppState {
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub task_service: Arc<dyn TaskServiceTrait>,
    pub completion_service: Arc<dyn CompletionServiceTrait>,
    pub streak_service: Arc<dyn StreakServiceTrait>,
    pub jwt: JwtVerifier,
    /// Zone used to resolve "today" for date-less queries.
    pub timezone: Tz,
}

pub fn init_tracing() {
    let log_format = std::env::var("DS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let event_sink = Arc::new(LoggingDomainEventSink::new());
    event_sink.start_worker();
    let event_sink: Arc<dyn DomainEventSink> = event_sink;

    let goal_repository = Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
    let task_repository = Arc::new(TaskRepository::new(pool.clone(), writer.clone()));

    let goal_service = Arc::new(GoalService::new(
        goal_repository.clone(),
        task_repository.clone(),
        event_sink.clone(),
    ));
    let task_service = Arc::new(TaskService::new(
        task_repository.clone(),
        goal_repository.clone(),
    ));
    let completion_service = Arc::new(CompletionService::new(
        task_repository.clone(),
        goal_repository.clone(),
        event_sink.clone(),
        AccountingConfig {
            max_attempts: config.accounting_max_attempts,
        },
    ));
    let streak_service = Arc::new(StreakService::new(task_repository, config.timezone));

    Ok(Arc::new(AppState {
        goal_service,
        task_service,
        completion_service,
        streak_service,
        jwt: JwtVerifier::new(&config.jwt_secret),
        timezone: config.timezone,
    }))
}
