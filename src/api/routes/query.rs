use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::api::{error::ApiError, state::AppState};
use crate::application::{services::QUESTION_REQUIRED, Answer};

/// Answers `{"question": "..."}` from the uploaded documents.
///
/// A missing or unparseable body and a missing, non-string or empty question are
/// all reported as "Question required". Oversized bodies get 413.
pub async fn query_documents(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Answer>, ApiError> {
    let Json(value) = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge;
        }
        tracing::debug!(error = %rejection, "unreadable query body");
        ApiError::bad_request(QUESTION_REQUIRED)
    })?;

    let question = value
        .get("question")
        .and_then(Value::as_str)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request(QUESTION_REQUIRED))?;

    let answer = state.rag_service.answer(question).await?;
    tracing::info!(sources = answer.sources.len(), "question answered");

    Ok(Json(answer))
}
