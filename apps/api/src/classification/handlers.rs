use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::{info, info_span};
use uuid::Uuid;

use crate::classification::pipeline::Pipeline;
use crate::classification::upload::StagedUpload;
use crate::errors::AppError;
use crate::models::prediction::{PredictionResponse, RankedRoles};
use crate::state::AppState;

/// Multipart field carrying the résumé file.
pub const RESUME_FIELD: &str = "resume";

struct ResumeUpload {
    filename: String,
    bytes: Bytes,
}

/// POST /api/v1/predict
pub async fn handle_predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PredictionResponse>, AppError> {
    let upload = read_resume_field(&mut multipart).await?;
    if upload.filename.is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }

    let request_id = Uuid::new_v4();
    let filename = upload.filename.clone();
    let span = info_span!("predict", %request_id, filename = %filename);
    let pipeline = Arc::clone(&state.pipeline);
    let upload_dir = state.config.upload_dir.clone();

    // Extraction and scoring are synchronous CPU work.
    let ranked = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        classify_upload(&pipeline, &upload_dir, &upload)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;

    info!(%request_id, top = ?ranked.labels(), "Prediction served");
    Ok(Json(PredictionResponse::new(request_id, filename, ranked)))
}

/// Stages the upload, classifies it, and releases the staged file on every path.
fn classify_upload(
    pipeline: &Pipeline,
    upload_dir: &Path,
    upload: &ResumeUpload,
) -> Result<RankedRoles, AppError> {
    let staged = StagedUpload::stage(upload_dir, &upload.filename, &upload.bytes)?;
    let document = staged.read_document()?;
    Ok(pipeline.classify(&document)?)
}

async fn read_resume_field(multipart: &mut Multipart) -> Result<ResumeUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(ResumeUpload { filename, bytes });
    }
    Err(AppError::Validation(format!(
        "Missing '{RESUME_FIELD}' file field"
    )))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file exceeds the size limit".to_string())
    } else {
        AppError::Validation(format!("Malformed upload: {}", err.body_text()))
    }
}
