use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::models::resume::ModelError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Model(e @ ModelError::IndexOutOfRange { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INDEX_OUT_OF_RANGE",
                e.to_string(),
            ),
            AppError::Model(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            AppError::Export(ExportError::RenderNotReady) => (
                StatusCode::CONFLICT,
                "RENDER_NOT_READY",
                "The preview has not been rendered; nothing to export".to_string(),
            ),
            AppError::Export(ExportError::IoUnavailable(e)) => {
                tracing::error!("Export I/O error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "IO_UNAVAILABLE",
                    "The export could not be written".to_string(),
                )
            }
            AppError::Export(e @ ExportError::Rasterization(_)) => {
                tracing::error!("{e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RASTERIZATION_ERROR",
                    "The image export failed".to_string(),
                )
            }
            AppError::Export(e @ ExportError::Encoding(_)) => {
                tracing::error!("{e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ENCODING_ERROR",
                    "The document export failed".to_string(),
                )
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
    use crate::models::resume::Section;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                AppError::Model(ModelError::UnknownField("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Model(ModelError::IndexOutOfRange {
                    section: Section::Experience,
                    index: 5,
                    len: 2,
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Export(ExportError::RenderNotReady),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Export(ExportError::IoUnavailable(std::io::Error::other("disk"))),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Export(ExportError::Encoding("zip".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
