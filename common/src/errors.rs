use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Structured error types for the market data proxy
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInterval(String),

    #[error("Missing required query parameter: {0}")]
    MissingParameter(&'static str),

    /// Any upstream failure; the cause is only logged.
    #[error("Alpha Vantage API error")]
    UpstreamUnavailable,

    #[error("{0}")]
    DataNotFound(String),

    #[error("{0}")]
    Processing(String),
}

/// Body for failures: `{"detail": ...}`
#[derive(Serialize)]
struct ErrorDetail {
    detail: String,
}

/// Body for data missing upstream: `{"error": ...}`
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn invalid_interval<S: AsRef<str>>(valid: &[S]) -> Self {
        let choices: Vec<&str> = valid.iter().map(AsRef::as_ref).collect();
        Self::InvalidInterval(format!(
            "Invalid interval. Choose from: {}",
            choices.join(", ")
        ))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::DataNotFound(message.into())
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInterval(_) | AppError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AppError::DataNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamUnavailable | AppError::Processing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        match self {
            AppError::DataNotFound(_) => {
                (status, Json(ErrorResponse { error: message })).into_response()
            }
            _ => (status, Json(ErrorDetail { detail: message })).into_response(),
        }
    }
}
