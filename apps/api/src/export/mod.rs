// Export pipeline: three independent encoders (HTML, PNG, DOCX) plus the writer that
// persists their artifacts. Encoders share no state and each works on its own snapshot.

pub mod docx;
pub mod filename;
pub mod handlers;
pub mod html;
pub mod pipeline;
pub mod png;
pub mod writer;

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use pipeline::{ExportSnapshot, ExportedFile, Exporter};
pub use writer::ArtifactWriter;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No rendered view is available to export")]
    RenderNotReady,

    #[error("Rasterization failed: {0}")]
    Rasterization(String),

    #[error("Document encoding failed: {0}")]
    Encoding(String),

    #[error("Export destination unavailable: {0}")]
    IoUnavailable(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Html,
    Png,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Png => "png",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html; charset=utf-8",
            ExportFormat::Png => "image/png",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(ExportFormat::Html),
            "png" => Ok(ExportFormat::Png),
            "docx" | "word" => Ok(ExportFormat::Docx),
            other => Err(format!("Unsupported export format '{other}'")),
        }
    }
}

/// An encoded file, not yet persisted.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Bytes,
}

impl ExportArtifact {
    pub fn new(name: &str, format: ExportFormat, bytes: impl Into<Bytes>) -> Self {
        ExportArtifact {
            filename: filename::export_filename(name, format),
            format,
            bytes: bytes.into(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}
