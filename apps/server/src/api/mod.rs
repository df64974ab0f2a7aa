use std::sync::Arc;

use anyhow::Context;
use axum::{middleware, routing::get, Router};
use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{auth::require_jwt, config::Config, main_lib::AppState};

pub mod goals;
pub mod streaks;
pub mod tasks;

pub async fn healthz() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin '{}'", o))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        CorsLayer::new().allow_origin(origins)
    }
    .allow_methods(Any)
    .allow_headers(Any);

    let protected = Router::new()
        .merge(goals::router())
        .merge(tasks::router())
        .merge(streaks::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_jwt));

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(protected)
        .with_state(state);

    Ok(Router::new().nest("/api/v1", api).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(config.request_timeout))
            .layer(cors),
    ))
}
