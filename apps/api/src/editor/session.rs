use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::export::ExportSnapshot;
use crate::models::resume::{ModelError, ResumeContent};
use crate::models::template::TemplateDescriptor;
use crate::render::{RenderError, RenderTarget, Renderer};

/// Per-request session facts. Carried explicitly instead of living in UI state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub signed_in: bool,
}

/// What the form starts with when the editor opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedContent {
    #[default]
    Sample,
    Blank,
}

impl SeedContent {
    fn content(self) -> ResumeContent {
        match self {
            SeedContent::Sample => ResumeContent::default(),
            SeedContent::Blank => ResumeContent::blank(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    pub id: Uuid,
    pub template: TemplateDescriptor,
    pub content: ResumeContent,
    pub context: SessionContext,
    pub opened_at: DateTime<Utc>,
    /// Last open, read or edit. Idle expiry counts from here.
    pub last_active: DateTime<Utc>,
    revision: u64,
    view: Option<RenderTarget>,
}

impl EditorSession {
    /// A fresh session with no view yet; render it with [`EditorSession::render_job`].
    pub fn open(template: TemplateDescriptor, seed: SeedContent, context: SessionContext) -> Self {
        let now = Utc::now();
        EditorSession {
            id: Uuid::new_v4(),
            template,
            content: seed.content(),
            context,
            opened_at: now,
            last_active: now,
            revision: 0,
            view: None,
        }
    }

    /// Applies one mutation. A rejected mutation leaves the session exactly as it was;
    /// an accepted one invalidates any render still in flight for the old content.
    pub fn edit<T>(
        &mut self,
        mutation: impl FnOnce(&mut ResumeContent) -> Result<T, ModelError>,
    ) -> Result<T, ModelError> {
        let out = mutation(&mut self.content)?;
        self.revision += 1;
        self.last_active = Utc::now();
        Ok(out)
    }

    pub fn render_job(&self) -> RenderJob {
        RenderJob {
            revision: self.revision,
            content: self.content.clone(),
            template: self.template.clone(),
        }
    }

    /// Installs a finished render if it still matches the current content. On a failed
    /// render the view is dropped, so view-based exports report `RenderNotReady`
    /// instead of exporting a stale render.
    pub fn install_view(&mut self, rendered: RenderedView) -> bool {
        if rendered.revision != self.revision {
            return false;
        }
        match rendered.result {
            Ok(target) => {
                if let Err(e) = &target.page {
                    debug!("Session {} preview cannot be rasterized: {e}", self.id);
                }
                self.view = Some(target);
            }
            Err(e) => {
                warn!("Session {} has no renderable view: {e}", self.id);
                self.view = None;
            }
        }
        true
    }

    pub fn view(&self) -> Option<&RenderTarget> {
        self.view.as_ref()
    }

    pub fn snapshot(&self) -> ExportSnapshot {
        ExportSnapshot {
            session_id: self.id,
            content: self.content.clone(),
            view: self.view.clone(),
        }
    }
}

/// Owned input for one render, detached from the session so no lock is held while it runs.
#[derive(Debug)]
pub struct RenderJob {
    revision: u64,
    content: ResumeContent,
    template: TemplateDescriptor,
}

#[derive(Debug)]
pub struct RenderedView {
    revision: u64,
    result: Result<RenderTarget, RenderError>,
}

impl RenderJob {
    /// Runs the render on the blocking pool.
    pub async fn run(self, renderer: Arc<dyn Renderer>) -> RenderedView {
        let RenderJob {
            revision,
            content,
            template,
        } = self;
        let result = tokio::task::spawn_blocking(move || renderer.render(&content, &template))
            .await
            .unwrap_or_else(|e| Err(RenderError::Task(e.to_string())));
        RenderedView { revision, result }
    }
}

/// Open editor sessions keyed by id. Writes are serialized by the lock; readers get clones
/// so exports never hold it, and renders run between two short lock scopes.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, EditorSession>>>,
}

impl SessionStore {
    pub async fn insert(&self, session: EditorSession) {
        self.sessions.write().await.insert(session.id, session);
    }

    /// A copy of the session. Counts as activity for idle expiry.
    pub async fn get(&self, id: Uuid) -> Option<EditorSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.last_active = Utc::now();
        Some(session.clone())
    }

    /// Applies `mutation` under the write lock, re-renders with the lock released, then
    /// installs the view and returns the updated session. `None` when the session does
    /// not exist (or was closed while rendering).
    pub async fn edit(
        &self,
        id: Uuid,
        renderer: Arc<dyn Renderer>,
        mutation: impl FnOnce(&mut ResumeContent) -> Result<(), ModelError>,
    ) -> Option<Result<EditorSession, ModelError>> {
        let job = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&id)?;
            if let Err(e) = session.edit(mutation) {
                return Some(Err(e));
            }
            session.render_job()
        };

        let rendered = job.run(renderer).await;

        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.install_view(rendered);
        Some(Ok(session.clone()))
    }

    pub async fn remove(&self, id: Uuid) -> Option<EditorSession> {
        self.sessions.write().await.remove(&id)
    }

    /// Drops every session last active before `cutoff` and returns their ids.
    pub async fn remove_idle(&self, cutoff: DateTime<Utc>) -> Vec<Uuid> {
        let mut sessions = self.sessions.write().await;
        let idle: Vec<Uuid> = sessions
            .values()
            .filter(|s| s.last_active < cutoff)
            .map(|s| s.id)
            .collect();
        for id in &idle {
            sessions.remove(id);
        }
        idle
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
