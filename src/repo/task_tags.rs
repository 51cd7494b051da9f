//! Task-tag link repository: the join collection behind task tagging.

use std::sync::Arc;

use serde_json::Value;

use super::{projection, restrict_to};
use crate::error::{ServiceError, ServiceResult};
use crate::gateway::{DEFAULT_PAGE_SIZE, PagingInfo, RecordGateway, RecordQuery, WhereCondition};
use crate::mapper::{link_from_record, link_to_record};
use crate::types::TaskTagLink;

/// Every field of the task-tag link collection.
pub const LINK_FIELDS: &[&str] = &[
    "Name",
    "Tags",
    "Owner",
    "CreatedOn",
    "CreatedBy",
    "ModifiedOn",
    "ModifiedBy",
    "task_id",
    "tag_id",
];

/// Fields the client is permitted to write on create/update.
const UPDATEABLE_FIELDS: &[&str] = &["Name", "Tags", "Owner", "task_id", "tag_id"];

/// Repository over the task-tag join collection.
pub struct TaskTagRepository {
    gateway: Arc<dyn RecordGateway>,
    collection: String,
    page_size: usize,
}

impl TaskTagRepository {
    pub fn new(gateway: Arc<dyn RecordGateway>, collection: impl Into<String>) -> Self {
        Self {
            gateway,
            collection: collection.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Fetch every link for a task.
    pub async fn fetch_task_tags(&self, task_id: &str) -> ServiceResult<Vec<TaskTagLink>> {
        let query = RecordQuery {
            fields: projection(LINK_FIELDS),
            conditions: vec![WhereCondition::exact("task_id", task_id)],
            paging_info: PagingInfo {
                limit: self.page_size,
                offset: 0,
            },
            ..Default::default()
        };

        let response = self
            .gateway
            .fetch_records(&self.collection, query)
            .await
            .map_err(|err| ServiceError::fetch_failed("task tags", err))?;

        Ok(response.data.iter().map(link_from_record).collect())
    }

    /// Create one edge. No uniqueness check: calling twice with the same
    /// pair stores a duplicate edge.
    pub async fn create_task_tag(&self, task_id: &str, tag_id: &str) -> ServiceResult<TaskTagLink> {
        let link = TaskTagLink {
            task_id: task_id.to_string(),
            tag_id: tag_id.to_string(),
            ..TaskTagLink::default()
        };
        let record = restrict_to(link_to_record(&link), UPDATEABLE_FIELDS);

        let response = self
            .gateway
            .create_records(&self.collection, vec![record])
            .await?;
        let record = response
            .into_first_record()
            .ok_or_else(|| ServiceError::create_failed("task-tag link"))?;

        Ok(link_from_record(&record))
    }

    /// Remove every link for a task. Succeeds without issuing a delete call
    /// when none exist.
    pub async fn delete_task_tags_by_task(&self, task_id: &str) -> ServiceResult<bool> {
        let links = self.fetch_task_tags(task_id).await?;
        if links.is_empty() {
            return Ok(true);
        }

        let ids: Vec<Value> = links
            .into_iter()
            .filter_map(|link| link.id)
            .map(Value::String)
            .collect();
        let response = self.gateway.delete_records(&self.collection, ids).await?;
        if !response.success {
            return Err(ServiceError::delete_failed("task-tag links"));
        }
        Ok(true)
    }

    /// Replace a task's links with the given tag set: delete everything,
    /// then recreate sequentially.
    ///
    /// Not transactional. A failure partway leaves a partial link set and
    /// propagates; callers must not run two replacements for one task
    /// concurrently.
    pub async fn update_task_tags(
        &self,
        task_id: &str,
        tag_ids: &[String],
    ) -> ServiceResult<Vec<TaskTagLink>> {
        self.delete_task_tags_by_task(task_id).await?;

        let mut links = Vec::with_capacity(tag_ids.len());
        for tag_id in tag_ids {
            links.push(self.create_task_tag(task_id, tag_id).await?);
        }
        Ok(links)
    }
}
