use crate::export::{ExportArtifact, ExportError, ExportFormat};
use crate::render::RenderTarget;

/// Writes the rendered preview markup out unchanged as UTF-8.
pub fn encode_html(target: Option<&RenderTarget>, name: &str) -> Result<ExportArtifact, ExportError> {
    let target = target.ok_or(ExportError::RenderNotReady)?;
    let bytes = target.markup.clone().into_bytes();
    Ok(ExportArtifact::new(name, ExportFormat::Html, bytes))
}
