use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dailysteps_core::errors::{DatabaseError, Error as CoreError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e {
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::NotFound { .. } | CoreError::Database(DatabaseError::NotFound(_)) => {
                    StatusCode::NOT_FOUND
                }
                CoreError::Unauthenticated => StatusCode::UNAUTHORIZED,
                CoreError::ConflictRetryExhausted { .. } => StatusCode::CONFLICT,
                CoreError::PartialFailure(_)
                | CoreError::Database(_)
                | CoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use dailysteps_core::errors::{PartialFailure, ValidationError};

    #[test]
    fn test_core_errors_map_to_statuses() {
        let cases = [
            (
                CoreError::from(ValidationError::MissingField("name".into())),
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::goal_not_found("g1"), StatusCode::NOT_FOUND),
            (CoreError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                CoreError::ConflictRetryExhausted {
                    goal_id: "g1".into(),
                    attempts: 5,
                },
                StatusCode::CONFLICT,
            ),
            (
                CoreError::from(PartialFailure::GoalCounter {
                    task_id: "t1".into(),
                    goal_id: "g1".into(),
                    reason: "gone".into(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
    }
}
