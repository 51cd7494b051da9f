//! Crate facade: one gateway, three repositories, and the reconciliation
//! path that ties the two tag representations together.

use std::sync::Arc;

use tracing::debug;

use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::gateway::RecordGateway;
use crate::repo::{TagRepository, TaskRepository, TaskTagRepository};
use crate::types::Tag;

/// Bundles the repositories over one shared gateway handle.
pub struct TaskFlow {
    pub tasks: TaskRepository,
    pub tags: TagRepository,
    pub links: TaskTagRepository,
}

impl TaskFlow {
    pub fn new(gateway: Arc<dyn RecordGateway>, config: &AppConfig) -> Self {
        Self {
            tasks: TaskRepository::new(gateway.clone(), config.collections.tasks.as_str())
                .with_page_size(config.page_size),
            tags: TagRepository::new(gateway.clone(), config.collections.tags.as_str())
                .with_page_size(config.page_size),
            links: TaskTagRepository::new(gateway, config.collections.task_tags.as_str())
                .with_page_size(config.page_size),
        }
    }

    /// Replace a task's tags from free-text names.
    ///
    /// The join rows are the canonical representation: names resolve via
    /// get-or-create, the task's links are replaced with the resolved ids,
    /// and the comma-joined name string on the task record is rewritten as
    /// a derived view. Returns the resolved tags in input order, duplicates
    /// included; the link set itself is deduplicated.
    pub async fn replace_task_tags(
        &self,
        task_id: &str,
        names: &[String],
    ) -> ServiceResult<Vec<Tag>> {
        if task_id.is_empty() {
            return Err(ServiceError::missing_field("task_id"));
        }

        let resolved = self.tags.get_or_create_tags(names).await?;

        let mut tag_ids = Vec::new();
        let mut label = Vec::new();
        for tag in &resolved {
            let Some(id) = &tag.id else { continue };
            if !tag_ids.contains(id) {
                tag_ids.push(id.clone());
                label.push(tag.name.clone());
            }
        }

        self.links.update_task_tags(task_id, &tag_ids).await?;
        self.tasks.write_tags_label(task_id, &label).await?;

        debug!(task_id, tags = label.len(), "replaced task tags");
        Ok(resolved)
    }
}
