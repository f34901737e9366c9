use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::{
    DbErr,
    models::{
        project::ProjectError, role::RoleError, task::TaskError, team::TeamError,
        worker::WorkerError,
    },
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Team(#[from] TeamError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
    #[error(transparent)]
    Role(#[from] RoleError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Project(err) => match err {
                ProjectError::ProjectNotFound => (StatusCode::NOT_FOUND, "ProjectError"),
                ProjectError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "ProjectError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "ProjectError"),
            },
            ApiError::Task(err) => match err {
                TaskError::TaskNotFound => (StatusCode::NOT_FOUND, "TaskError"),
                // Bad references and bad dates arrive in the request body,
                // so they are client errors rather than missing resources.
                TaskError::ProjectNotFound
                | TaskError::TeamNotFound
                | TaskError::InvalidDate(_)
                | TaskError::InvalidDateRange { .. } => (StatusCode::BAD_REQUEST, "TaskError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "TaskError"),
            },
            ApiError::Team(err) => match err {
                TeamError::TeamNotFound => (StatusCode::NOT_FOUND, "TeamError"),
                TeamError::ProjectNotFound => (StatusCode::BAD_REQUEST, "TeamError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "TeamError"),
            },
            ApiError::Worker(err) => match err {
                WorkerError::WorkerNotFound => (StatusCode::NOT_FOUND, "WorkerError"),
                WorkerError::ProjectNotFound | WorkerError::TeamNotFound => {
                    (StatusCode::BAD_REQUEST, "WorkerError")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "WorkerError"),
            },
            ApiError::Role(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RoleError"),
            ApiError::Database(db_err) => match db_err {
                DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, "DatabaseError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            },
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "ConflictError"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };

        let error_message = match &self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => msg.clone(),
            _ => format!("{}: {}", error_type, self),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }
        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
