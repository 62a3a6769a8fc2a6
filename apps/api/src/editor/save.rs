use async_trait::async_trait;
use tracing::info;

use crate::editor::SessionContext;
use crate::errors::AppError;
use crate::models::resume::ResumeContent;
use crate::models::template::TemplateDescriptor;

/// Receives the content snapshot when the user saves. What happens to it is up to the sink.
#[async_trait]
pub trait SaveSink: Send + Sync {
    async fn on_save(
        &self,
        context: SessionContext,
        template: &TemplateDescriptor,
        content: ResumeContent,
    ) -> Result<(), AppError>;
}

/// Logs the saved content and discards it.
pub struct LoggingSaveSink;

#[async_trait]
impl SaveSink for LoggingSaveSink {
    async fn on_save(
        &self,
        context: SessionContext,
        template: &TemplateDescriptor,
        content: ResumeContent,
    ) -> Result<(), AppError> {
        let body = serde_json::to_string(&content)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize content: {e}")))?;
        info!(
            "Saving template '{}' (signed_in={}) with content: {body}",
            template.name, context.signed_in
        );
        Ok(())
    }
}
