//! Unified error handling and the JSON error bodies returned by the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::schema::{FieldError, ValidationErrors};

/// JSON body for every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Check if this error is the caller's fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(errors) => ErrorBody {
                message: "Validation failed".to_string(),
                errors: Some(errors.into_vec()),
            },
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                internal_body()
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                internal_body()
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal_body() -> ErrorBody {
    ErrorBody {
        message: "Internal server error".to_string(),
        errors: None,
    }
}
