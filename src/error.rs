use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Errors raised while configuring documents, describing endpoints or writing reports.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Startup configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A described health endpoint declares route parameters.
    #[error("route parameters are not supported in health check endpoints (route `{route}`)")]
    UnsupportedRoute {
        /// Raw route pattern of the offending endpoint.
        route: String,
    },
    /// A JSON options source outside the recognized values was selected.
    #[error("unsupported JSON options source `{0}`")]
    UnsupportedJsonOptionsSource(String),
    /// No document is registered under the requested name.
    #[error("unknown document `{0}`")]
    UnknownDocument(String),
    /// The default tag selection found neither tags nor a controller name.
    #[error("operation {method} {path} has no tags and no controller route value")]
    MissingControllerName {
        /// HTTP method of the operation.
        method: String,
        /// Document path of the operation.
        path: String,
    },
    /// Two descriptions in the same document share a method and path.
    #[error("conflicting method/path combination {method} {path}")]
    ConflictingOperation {
        /// HTTP method of the operations.
        method: String,
        /// Document path of the operations.
        path: String,
    },
    /// The report could not be serialized.
    #[error("failed to serialize health report")]
    Serialization(#[from] serde_json::Error),
    /// The report could not be written.
    #[error("failed to write health report")]
    Io(#[from] std::io::Error),
}

impl From<ValidationErrors> for DocsError {
    fn from(err: ValidationErrors) -> Self {
        DocsError::InvalidConfiguration(err.to_string())
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DocsError> for AppError {
    fn from(err: DocsError) -> Self {
        match err {
            DocsError::UnknownDocument(name) => AppError::NotFound(format!("document `{name}`")),
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
