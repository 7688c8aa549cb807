use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::classification::{ClassificationError, ErrorKind};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Classification(e) => {
                let (status, code) = match e.kind() {
                    ErrorKind::UnsupportedFormat => {
                        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
                    }
                    ErrorKind::ExtractionError => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED")
                    }
                    ErrorKind::InsufficientContent => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_CONTENT")
                    }
                    ErrorKind::NotAResume => (StatusCode::UNPROCESSABLE_ENTITY, "NOT_A_RESUME"),
                    ErrorKind::InsufficientClasses => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "MODEL_MISCONFIGURED")
                    }
                    ErrorKind::InferenceError => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INFERENCE_ERROR")
                    }
                };
                (status, code, e.user_message())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_caller_errors_are_4xx() {
        assert_eq!(
            status_of(ClassificationError::UnsupportedFormat("txt".into()).into()),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status_of(
                ClassificationError::NotAResume {
                    reason: "too short".into(),
                    expected_sections: vec![],
                }
                .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::Validation("No file selected".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_operator_errors_are_5xx() {
        assert_eq!(
            status_of(
                ClassificationError::InsufficientClasses {
                    found: 2,
                    required: 3
                }
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Internal(anyhow::anyhow!("disk full"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
