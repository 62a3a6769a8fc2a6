use axum::{extract::Path, Json};

use crate::errors::AppError;
use crate::models::template::{find_template, template_catalog, TemplateDescriptor};

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateDescriptor>> {
    Json(template_catalog())
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(Path(id): Path<u32>) -> Result<Json<TemplateDescriptor>, AppError> {
    find_template(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
}
