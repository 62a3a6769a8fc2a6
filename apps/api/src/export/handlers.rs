//! Axum route handler for exports.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::ExportFormat;
use crate::state::AppState;

/// POST /api/v1/sessions/:id/exports/:format
///
/// Encodes the session's current snapshot, writes it to the export directory and
/// returns the file as an attachment. The session itself is never modified.
pub async fn handle_export(
    State(state): State<AppState>,
    Path((id, format)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format.parse().map_err(AppError::Validation)?;

    // Snapshot under the read lock, then release it before encoding.
    let snapshot = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?
        .snapshot();

    let exported = state.exporter.export(format, snapshot).await?;
    debug!(
        "Session {id} {format} export stored at {}",
        exported.path.display()
    );
    let artifact = exported.artifact;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(artifact.content_type()),
            ),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&artifact.filename),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}

/// `attachment` with an ASCII `filename` and, when the name needs it, an RFC 6266
/// `filename*=UTF-8''...` carrying the exact name.
fn content_disposition(filename: &str) -> HeaderValue {
    let ascii: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    let value = if ascii == filename {
        format!("attachment; filename=\"{ascii}\"")
    } else {
        format!(
            "attachment; filename=\"{ascii}\"; filename*=UTF-8''{}",
            urlencoding::encode(filename)
        )
    };
    // Only visible ASCII reaches here.
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("John_Doe_resume.png"),
            "attachment; filename=\"John_Doe_resume.png\""
        );
        assert_eq!(
            content_disposition("a\"b_resume.png"),
            "attachment; filename=\"a_b_resume.png\"; filename*=UTF-8''a%22b_resume.png"
        );
    }

    #[test]
    fn test_content_disposition_keeps_non_ascii_names() {
        assert_eq!(
            content_disposition("Zoë_resume.png"),
            "attachment; filename=\"Zo__resume.png\"; filename*=UTF-8''Zo%C3%AB_resume.png"
        );
        assert_eq!(
            content_disposition("José_García_resume.docx"),
            "attachment; filename=\"Jos__Garc_a_resume.docx\"; \
             filename*=UTF-8''Jos%C3%A9_Garc%C3%ADa_resume.docx"
        );
    }
}
