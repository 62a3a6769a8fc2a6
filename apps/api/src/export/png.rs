use std::io::Cursor;
use std::sync::Arc;

use image::ImageFormat;

use crate::export::{ExportArtifact, ExportError, ExportFormat};
use crate::render::{RenderTarget, Renderer};

/// Rasterizes the rendered view and encodes it as PNG.
///
/// Capture and encoding are CPU-bound, so both run inside `spawn_blocking`; the single
/// await point is the completion of that task.
pub async fn encode_png(
    renderer: Arc<dyn Renderer>,
    target: Option<RenderTarget>,
    name: &str,
) -> Result<ExportArtifact, ExportError> {
    let target = target.ok_or(ExportError::RenderNotReady)?;

    let bytes = tokio::task::spawn_blocking(move || capture(renderer.as_ref(), &target))
        .await
        .map_err(|e| ExportError::Rasterization(format!("capture task failed: {e}")))??;

    Ok(ExportArtifact::new(name, ExportFormat::Png, bytes))
}

fn capture(renderer: &dyn Renderer, target: &RenderTarget) -> Result<Vec<u8>, ExportError> {
    let bitmap = renderer
        .rasterize(target)
        .map_err(|e| ExportError::Rasterization(e.to_string()))?;

    let mut bytes = Vec::new();
    bitmap
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ExportError::Rasterization(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeContent;
    use crate::models::template::{default_template, TemplateDescriptor};
    use crate::render::{PreviewRenderer, RasterConfig, RenderError};
    use image::RgbaImage;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    struct BrokenCapture;

    impl Renderer for BrokenCapture {
        fn render(
            &self,
            content: &ResumeContent,
            template: &TemplateDescriptor,
        ) -> Result<RenderTarget, RenderError> {
            PreviewRenderer::default().render(content, template)
        }

        fn rasterize(&self, _target: &RenderTarget) -> Result<RgbaImage, RenderError> {
            Err(RenderError::Raster("surface lost".to_string()))
        }
    }

    #[tokio::test]
    async fn test_png_round_trips_through_decoder() {
        let renderer: Arc<dyn Renderer> = Arc::new(PreviewRenderer::default());
        let target = renderer
            .render(&ResumeContent::default(), &default_template())
            .unwrap();
        let page = target.page.as_ref().unwrap();
        let (width, height) = (page.width, page.height);

        let artifact = encode_png(renderer, Some(target), "John Doe").await.unwrap();
        assert_eq!(artifact.filename, "John_Doe_resume.png");
        assert_eq!(&artifact.bytes[..8], &PNG_SIGNATURE);

        let decoded = image::load_from_memory_with_format(&artifact.bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (width, height));
    }

    #[tokio::test]
    async fn test_png_requires_rendered_view() {
        let renderer: Arc<dyn Renderer> = Arc::new(PreviewRenderer::default());
        let err = encode_png(renderer, None, "John Doe").await.unwrap_err();
        assert!(matches!(err, ExportError::RenderNotReady));
    }

    #[tokio::test]
    async fn test_oversized_page_is_a_rasterization_error() {
        let renderer: Arc<dyn Renderer> = Arc::new(PreviewRenderer::new(RasterConfig {
            max_height_px: 1_200,
            ..RasterConfig::default()
        }));
        let mut content = ResumeContent::default();
        content.experience = vec!["Very long tenure".to_string(); 40];
        let target = renderer.render(&content, &default_template()).unwrap();

        let err = encode_png(renderer, Some(target), "John Doe").await.unwrap_err();
        assert!(matches!(err, ExportError::Rasterization(msg) if msg.contains("Layout")));
    }

    #[tokio::test]
    async fn test_capture_failure_is_surfaced() {
        let renderer: Arc<dyn Renderer> = Arc::new(BrokenCapture);
        let target = renderer
            .render(&ResumeContent::default(), &default_template())
            .unwrap();
        let err = encode_png(renderer, Some(target), "John Doe").await.unwrap_err();
        assert!(matches!(err, ExportError::Rasterization(msg) if msg.contains("surface lost")));
    }
}
