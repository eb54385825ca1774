//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use nexus_notify::NotifyError;
use nexus_persistence::PersistenceError;
use nexus_scheduler::SchedulerError;
use nexus_telegram::RelayError;

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error type for consistent error responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Conflict with the resource's current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An upstream provider failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Service unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Human readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound(m)
            | ApiError::BadRequest(m)
            | ApiError::Internal(m)
            | ApiError::Conflict(m)
            | ApiError::Upstream(m)
            | ApiError::ServiceUnavailable(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        }
        // Clients read either `error` or `message`.
        let body = Json(json!({
            "success": false,
            "error": self.message(),
            "message": self.message(),
        }));
        (status, body).into_response()
    }
}

impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::NotFound(id) => ApiError::NotFound(format!("reminder not found: {}", id)),
            SchedulerError::InFlight(_) => {
                ApiError::Conflict("Reminder is being delivered".to_string())
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::NoToken | RelayError::NoChat | RelayError::InvalidChatId(_) => {
                ApiError::ServiceUnavailable(err.to_string())
            }
            RelayError::Telegram(msg) => ApiError::Upstream(msg),
            RelayError::Persistence(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<NotifyError> for ApiError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::InvalidRecipient(msg) => ApiError::BadRequest(msg),
            NotifyError::NoNotifier(channel) => {
                ApiError::ServiceUnavailable(format!("{} delivery is not configured", channel))
            }
            _ => ApiError::Upstream(err.to_string()),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
