use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};
use uuid::Uuid;

use crate::export::{ExportArtifact, ExportError};

/// Persists artifacts under the export directory, one subdirectory per editor session
/// (`<dir>/<session id>/<filename>`), so sessions with the same name never share a file.
/// A session's directory lives until the session is closed, saved or expired.
///
/// Bytes go to a temp file in the target directory first and are renamed into place once
/// fully written, so a failed export never leaves a partial file behind.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ArtifactWriter { dir: dir.into() }
    }

    pub async fn write(
        &self,
        session_id: Uuid,
        artifact: &ExportArtifact,
    ) -> Result<PathBuf, ExportError> {
        let dir = self.session_dir(session_id);
        let filename = artifact.filename.clone();
        let bytes = artifact.bytes.clone();

        let path = tokio::task::spawn_blocking(move || write_atomically(&dir, &filename, &bytes))
            .await
            .map_err(|e| io::Error::other(format!("write task failed: {e}")))?
            .map_err(|e| {
                warn!("Failed to persist {}: {e}", artifact.filename);
                ExportError::IoUnavailable(e)
            })?;

        info!("Wrote {} ({} bytes)", path.display(), artifact.bytes.len());
        Ok(path)
    }

    /// Deletes everything exported for a session. A session that never exported is fine.
    pub async fn discard(&self, session_id: Uuid) -> Result<(), ExportError> {
        let dir = self.session_dir(session_id);
        tokio::task::spawn_blocking(move || match std::fs::remove_dir_all(&dir) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        })
        .await
        .map_err(|e| io::Error::other(format!("discard task failed: {e}")))??;
        Ok(())
    }

    fn session_dir(&self, session_id: Uuid) -> PathBuf {
        self.dir.join(session_id.to_string())
    }
}

fn write_atomically(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    // Names are only whitespace-sanitized; anything that is not a single plain
    // component (e.g. contains '/') cannot be placed inside the export directory.
    let mut components = Path::new(filename).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{filename}' is not a valid file name"),
        ));
    }

    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    let target = dir.join(filename);
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(target)
}
