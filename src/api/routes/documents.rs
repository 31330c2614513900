use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::api::{error::ApiError, state::AppState};

pub const NO_FILE: &str = "No file uploaded";
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub chunks_added: usize,
}

pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "upload without a multipart body");
        ApiError::bad_request(NO_FILE)
    })?;

    let (filename, bytes) = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::bad_request(NO_FILE))?;

    let chunks_added = state.document_service.ingest(&filename, &bytes).await?;

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        chunks_added,
    }))
}

/// Finds the first `file` field. A field without a filename counts as no file.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Ok(None);
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some((filename, bytes)));
    }

    Ok(None)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge;
    }
    tracing::debug!(error = %err, "malformed multipart body");
    ApiError::bad_request(NO_FILE)
}
