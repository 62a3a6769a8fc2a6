use std::sync::Arc;

use crate::config::Config;
use crate::editor::{LoggingSaveSink, SaveSink, SessionStore};
use crate::export::{ArtifactWriter, Exporter};
use crate::render::{PreviewRenderer, Renderer};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    /// Renders the preview for every session. Swappable for another view technology.
    pub renderer: Arc<dyn Renderer>,
    pub exporter: Exporter,
    /// Receives saved content. Default: LoggingSaveSink.
    pub save_sink: Arc<dyn SaveSink>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let renderer: Arc<dyn Renderer> = Arc::new(PreviewRenderer::new(config.raster()));
        Self::with_parts(config, renderer, Arc::new(LoggingSaveSink))
    }

    pub fn with_parts(
        config: Config,
        renderer: Arc<dyn Renderer>,
        save_sink: Arc<dyn SaveSink>,
    ) -> Self {
        let exporter = Exporter::new(
            renderer.clone(),
            ArtifactWriter::new(config.export_dir.clone()),
        );
        AppState {
            config,
            sessions: SessionStore::default(),
            renderer,
            exporter,
            save_sink,
        }
    }
}
