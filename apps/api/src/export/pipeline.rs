use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::export::{docx, html, png, ArtifactWriter, ExportArtifact, ExportError, ExportFormat};
use crate::models::resume::ResumeContent;
use crate::render::{RenderTarget, Renderer};

/// Immutable input to a single export: the content and, when one exists, its rendered view.
#[derive(Debug, Clone)]
pub struct ExportSnapshot {
    pub session_id: Uuid,
    pub content: ResumeContent,
    pub view: Option<RenderTarget>,
}

#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub artifact: ExportArtifact,
    pub path: PathBuf,
}

/// Runs one encoder and persists its output. Holds no per-export state, so any number of
/// exports may run at once.
#[derive(Clone)]
pub struct Exporter {
    renderer: Arc<dyn Renderer>,
    writer: ArtifactWriter,
}

impl Exporter {
    pub fn new(renderer: Arc<dyn Renderer>, writer: ArtifactWriter) -> Self {
        Exporter { renderer, writer }
    }

    pub async fn export(
        &self,
        format: ExportFormat,
        snapshot: ExportSnapshot,
    ) -> Result<ExportedFile, ExportError> {
        let ExportSnapshot {
            session_id,
            content,
            view,
        } = snapshot;

        let encoded = match format {
            ExportFormat::Html => html::encode_html(view.as_ref(), &content.name),
            ExportFormat::Png => png::encode_png(self.renderer.clone(), view, &content.name).await,
            ExportFormat::Docx => docx::encode_document(content).await,
        };
        let artifact = encoded.map_err(|e| {
            warn!("{format} export failed: {e}");
            e
        })?;

        let path = self.writer.write(session_id, &artifact).await?;
        info!(
            "Exported {format} as {} ({} bytes)",
            artifact.filename,
            artifact.bytes.len()
        );
        Ok(ExportedFile { artifact, path })
    }

    /// Drops a finished session's exports. Failures are logged, not returned: the session
    /// is already gone either way.
    pub async fn discard(&self, session_id: Uuid) {
        if let Err(e) = self.writer.discard(session_id).await {
            warn!("Could not remove exports of session {session_id}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::default_template;
    use crate::render::{PreviewRenderer, RasterConfig};

    fn exporter(dir: &std::path::Path) -> Exporter {
        Exporter::new(
            Arc::new(PreviewRenderer::default()),
            ArtifactWriter::new(dir),
        )
    }

    fn snapshot(name: &str) -> ExportSnapshot {
        let mut content = ResumeContent::default();
        content.name = name.to_string();
        let view = PreviewRenderer::default()
            .render(&content, &default_template())
            .ok();
        ExportSnapshot {
            session_id: Uuid::new_v4(),
            content,
            view,
        }
    }

    fn files_under(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    files_under(&path)
                } else {
                    1
                }
            })
            .sum()
    }

    #[tokio::test]
    async fn test_every_format_shares_filename_base() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = exporter(tmp.path());
        for format in [ExportFormat::Html, ExportFormat::Png, ExportFormat::Docx] {
            let file = exporter
                .export(format, snapshot("Jane Q Public"))
                .await
                .unwrap();
            assert_eq!(
                file.artifact.filename,
                format!("Jane_Q_Public_resume.{}", format.extension())
            );
            assert!(file.path.exists());
        }
    }

    #[tokio::test]
    async fn test_concurrent_exports_do_not_interfere() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = exporter(tmp.path());
        let (html, png, docx) = tokio::join!(
            exporter.export(ExportFormat::Html, snapshot("John Doe")),
            exporter.export(ExportFormat::Png, snapshot("John Doe")),
            exporter.export(ExportFormat::Docx, snapshot("John Doe")),
        );
        assert!(html.is_ok() && png.is_ok() && docx.is_ok());
        assert_eq!(files_under(tmp.path()), 3);
    }

    #[tokio::test]
    async fn test_document_export_does_not_need_a_view() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = exporter(tmp.path());
        let snapshot = ExportSnapshot {
            session_id: Uuid::new_v4(),
            content: ResumeContent::default(),
            view: None,
        };
        assert!(matches!(
            exporter.export(ExportFormat::Html, snapshot.clone()).await,
            Err(ExportError::RenderNotReady)
        ));
        assert!(matches!(
            exporter.export(ExportFormat::Png, snapshot.clone()).await,
            Err(ExportError::RenderNotReady)
        ));
        assert!(exporter.export(ExportFormat::Docx, snapshot).await.is_ok());
        assert_eq!(files_under(tmp.path()), 1);
    }

    #[tokio::test]
    async fn test_oversized_view_still_exports_html() {
        let tmp = tempfile::tempdir().unwrap();
        let renderer = PreviewRenderer::new(RasterConfig {
            max_height_px: 1_200,
            ..RasterConfig::default()
        });
        let exporter = Exporter::new(Arc::new(renderer.clone()), ArtifactWriter::new(tmp.path()));
        let mut content = ResumeContent::default();
        content.experience = vec!["Very long tenure".to_string(); 40];
        let view = renderer.render(&content, &default_template()).ok();
        let snapshot = ExportSnapshot {
            session_id: Uuid::new_v4(),
            content,
            view,
        };

        let html = exporter
            .export(ExportFormat::Html, snapshot.clone())
            .await
            .unwrap();
        assert_eq!(
            html.artifact.bytes.len(),
            snapshot.view.as_ref().unwrap().markup.as_str().len()
        );
        assert!(matches!(
            exporter.export(ExportFormat::Png, snapshot.clone()).await,
            Err(ExportError::Rasterization(_))
        ));
        assert!(exporter.export(ExportFormat::Docx, snapshot).await.is_ok());
    }

    #[tokio::test]
    async fn test_discard_drops_session_exports() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = exporter(tmp.path());
        let snapshot = snapshot("John Doe");
        let session_id = snapshot.session_id;
        exporter.export(ExportFormat::Html, snapshot).await.unwrap();
        assert_eq!(files_under(tmp.path()), 1);

        exporter.discard(session_id).await;
        assert_eq!(files_under(tmp.path()), 0);
    }
}
