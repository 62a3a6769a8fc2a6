//! Axum route handlers for editor sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::editor::{EditorSession, SeedContent, SessionContext};
use crate::errors::AppError;
use crate::export::ExportError;
use crate::models::resume::{
    FieldUpdate, FieldValue, ModelError, ResumeContent, ResumeField, Section,
};
use crate::models::template::{default_template, find_template, TemplateDescriptor};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct OpenSessionRequest {
    /// Falls back to the first gallery template when omitted.
    pub template_id: Option<u32>,
    #[serde(default)]
    pub seed: SeedContent,
    #[serde(default)]
    pub signed_in: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetFieldRequest {
    pub value: FieldValue,
}

#[derive(Debug, Deserialize)]
pub struct SetEntryRequest {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SetSkillsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub template: TemplateDescriptor,
    pub content: ResumeContent,
    /// Skills as the editor's single text input shows them.
    pub skills_text: String,
    pub context: SessionContext,
    pub preview_ready: bool,
    /// False when the preview is too large to export as an image.
    pub image_ready: bool,
    pub opened_at: DateTime<Utc>,
}

impl From<&EditorSession> for SessionResponse {
    fn from(session: &EditorSession) -> Self {
        SessionResponse {
            session_id: session.id,
            template: session.template.clone(),
            content: session.content.clone(),
            skills_text: session.content.skills_text(),
            context: session.context,
            preview_ready: session.view().is_some(),
            image_ready: session.view().is_some_and(|view| view.page.is_ok()),
            opened_at: session.opened_at,
        }
    }
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// Applies one content mutation to a stored session and returns the new state.
async fn edit_session(
    state: &AppState,
    id: Uuid,
    mutation: impl FnOnce(&mut ResumeContent) -> Result<(), ModelError>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .edit(id, state.renderer.clone(), mutation)
        .await
        .ok_or_else(|| session_not_found(id))??;
    Ok(Json(SessionResponse::from(&session)))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Opens the editor for a template, seeded with sample or blank content.
pub async fn handle_open_session(
    State(state): State<AppState>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let template = match request.template_id {
        Some(id) => {
            find_template(id).ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))?
        }
        None => default_template(),
    };

    let mut session = EditorSession::open(
        template,
        request.seed,
        SessionContext {
            signed_in: request.signed_in,
        },
    );
    let rendered = session.render_job().run(state.renderer.clone()).await;
    session.install_view(rendered);
    let response = SessionResponse::from(&session);
    let template_name = session.template.name.clone();
    state.sessions.insert(session).await;
    info!(
        "Opened session {} for template '{}' ({} open)",
        response.session_id,
        template_name,
        state.sessions.len().await
    );
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(SessionResponse::from(&session)))
}

/// DELETE /api/v1/sessions/:id
///
/// Closes the editor without saving; the content and its exports are discarded.
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    state.exporter.discard(id).await;
    info!("Closed session {id} without saving");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:id/fields/:field
pub async fn handle_get_field(
    State(state): State<AppState>,
    Path((id, field)): Path<(Uuid, String)>,
) -> Result<Json<FieldValue>, AppError> {
    let field: ResumeField = field.parse()?;
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(session.content.field(field)))
}

/// PUT /api/v1/sessions/:id/fields/:field
///
/// Whole-field replacement. Scalar fields take a string, list fields a list of strings.
pub async fn handle_set_field(
    State(state): State<AppState>,
    Path((id, field)): Path<(Uuid, String)>,
    Json(request): Json<SetFieldRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let field: ResumeField = field.parse()?;
    let update = FieldUpdate::from_value(field, request.value)?;
    edit_session(&state, id, move |content| {
        content.set_field(update);
        Ok(())
    })
    .await
}

/// POST /api/v1/sessions/:id/entries/:section
///
/// Appends an empty entry to experience or education.
pub async fn handle_append_entry(
    State(state): State<AppState>,
    Path((id, section)): Path<(Uuid, String)>,
) -> Result<Json<SessionResponse>, AppError> {
    let section: Section = section.parse()?;
    edit_session(&state, id, move |content| {
        content.append_entry(section);
        Ok(())
    })
    .await
}

/// PUT /api/v1/sessions/:id/entries/:section/:index
pub async fn handle_set_entry(
    State(state): State<AppState>,
    Path((id, section, index)): Path<(Uuid, String, usize)>,
    Json(request): Json<SetEntryRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let section: Section = section.parse()?;
    edit_session(&state, id, move |content| {
        content.set_entry_at(section, index, request.value)
    })
    .await
}

/// PUT /api/v1/sessions/:id/skills
///
/// Replaces skills from the comma-and-space separated text input.
pub async fn handle_set_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetSkillsRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    edit_session(&state, id, move |content| {
        content.set_skills_from_text(&request.text);
        Ok(())
    })
    .await
}

/// GET /api/v1/sessions/:id/preview
///
/// Returns the current preview markup.
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    let view = session.view().ok_or(ExportError::RenderNotReady)?;
    Ok(Html(view.markup.as_str().to_string()))
}

/// POST /api/v1/sessions/:id/save
///
/// Hands the snapshot to the save sink and closes the editor, removing its exports. If
/// the sink fails the session stays open so no edits are lost.
pub async fn handle_save(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeContent>, AppError> {
    let session = state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    let saved = state
        .save_sink
        .on_save(session.context, &session.template, session.content.clone())
        .await;

    match saved {
        Ok(()) => {
            state.exporter.discard(id).await;
            info!("Saved and closed session {id}");
            Ok(Json(session.content))
        }
        Err(e) => {
            state.sessions.insert(session).await;
            Err(e)
        }
    }
}
