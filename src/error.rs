// backend/src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    OutOfRange(String),
    #[error("financial settings have not been configured")]
    ConfigurationMissing,
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("FlightAware API configuration error")]
    SourceNotConfigured,
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::OutOfRange(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ConfigurationMissing => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::SourceNotConfigured | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Connectivity failures are the store being unreachable, not a bad query.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::UpstreamUnavailable(format!("flight store: {e}"))
            }
            other => AppError::Database(other),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::UpstreamUnavailable(format!("FlightAware: {e}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
