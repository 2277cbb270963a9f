//! Submission intake endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::submission::Submission;
use crate::schema::ValidationErrors;
use crate::services::submission;
use crate::AppState;

/// Create a submission. Bodies that are not JSON at all are reported against
/// the `body` path; field-level type errors are reported per field.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Malformed submission body");
        ValidationErrors::single("body", rejection.body_text())
    })?;

    let created = submission::submit(state.store.as_ref(), &state.notifier, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List every stored submission.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Submission>>, AppError> {
    let submissions = submission::list(state.store.as_ref()).await?;
    Ok(Json(submissions))
}
