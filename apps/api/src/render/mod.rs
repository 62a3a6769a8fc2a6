// Renderer capability: turns a resume into the on-screen view (markup + raster page)
// without the document model or the exporters knowing about any concrete UI.

pub mod html;
pub mod raster;

use image::RgbaImage;
use thiserror::Error;

use crate::models::resume::ResumeContent;
use crate::models::template::TemplateDescriptor;

pub use raster::{RasterConfig, RasterPage};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Layout failed: {0}")]
    Layout(String),

    #[error("Rasterization failed: {0}")]
    Raster(String),

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Serialized preview markup. Exported byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn new(html: String) -> Self {
        Markup(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

/// The rendered view of one resume: what the preview panel currently shows.
///
/// The markup always exists once a view does. The raster page is laid out alongside it
/// and may fail on its own (e.g. a page taller than the bitmap limit); that failure only
/// surfaces when the view is rasterized.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub markup: Markup,
    pub page: Result<RasterPage, RenderError>,
}

pub trait Renderer: Send + Sync {
    fn render(
        &self,
        content: &ResumeContent,
        template: &TemplateDescriptor,
    ) -> Result<RenderTarget, RenderError>;

    /// Captures a rendered view as a bitmap. CPU-bound; callers run it off the async executor.
    fn rasterize(&self, target: &RenderTarget) -> Result<RgbaImage, RenderError>;
}

/// Default renderer mirroring the editor's preview panel.
#[derive(Debug, Clone, Default)]
pub struct PreviewRenderer {
    pub raster: RasterConfig,
}

impl PreviewRenderer {
    pub fn new(raster: RasterConfig) -> Self {
        PreviewRenderer { raster }
    }
}

impl Renderer for PreviewRenderer {
    fn render(
        &self,
        content: &ResumeContent,
        template: &TemplateDescriptor,
    ) -> Result<RenderTarget, RenderError> {
        let markup = html::render_markup(content, template);
        let page = raster::layout_page(content, template.style().background(), &self.raster);
        Ok(RenderTarget { markup, page })
    }

    fn rasterize(&self, target: &RenderTarget) -> Result<RgbaImage, RenderError> {
        let page = target.page.as_ref().map_err(Clone::clone)?;
        raster::draw_page(page)
    }
}
