//! Task repository: filtered fetches, CRUD, completion toggling, counts.

use std::sync::Arc;

use chrono::Local;
use serde_json::Value;
use tracing::warn;

use super::{projection, restrict_to};
use crate::error::{ServiceError, ServiceResult};
use crate::gateway::{
    DEFAULT_PAGE_SIZE, OrderBy, PagingInfo, Record, RecordGateway, RecordQuery, WhereCondition,
};
use crate::mapper::{join_tags, task_from_record, task_to_record};
use crate::types::{Task, TaskCounts, TaskQuery};

/// Every field of the task collection.
pub const TASK_FIELDS: &[&str] = &[
    "Name",
    "Tags",
    "Owner",
    "CreatedOn",
    "CreatedBy",
    "ModifiedOn",
    "ModifiedBy",
    "title",
    "description",
    "completed",
    "priority",
    "dueDate",
];

/// Fields the client is permitted to write on create/update.
const UPDATEABLE_FIELDS: &[&str] = &[
    "Name",
    "Tags",
    "Owner",
    "title",
    "description",
    "completed",
    "priority",
    "dueDate",
];

/// Lightweight projection for the count aggregate.
const COUNT_FIELDS: &[&str] = &["Id", "completed", "dueDate"];

/// Upper bound on records scanned for counts.
const COUNT_SCAN_LIMIT: usize = 1000;

/// Repository over the task collection.
pub struct TaskRepository {
    gateway: Arc<dyn RecordGateway>,
    collection: String,
    page_size: usize,
}

impl TaskRepository {
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

    /// Fetch tasks matching the query, ordered by modification time
    /// (newest first unless the query asks for ascending order).
    ///
    /// Absent filter fields impose no predicate; present ones are ANDed.
    /// An empty result is a normal outcome, not an error.
    pub async fn fetch_tasks(&self, query: &TaskQuery) -> ServiceResult<Vec<Task>> {
        let mut conditions = Vec::new();

        if let Some(completed) = query.completed {
            conditions.push(WhereCondition::exact("completed", completed));
        }
        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            conditions.push(WhereCondition::contains("title", search));
        }
        if let Some(priority) = query.priority {
            conditions.push(WhereCondition::exact("priority", priority.as_str()));
        }
        if let Some(due_date) = query.due_date.as_deref().filter(|d| !d.is_empty()) {
            conditions.push(WhereCondition::exact("dueDate", due_date));
        }

        let record_query = RecordQuery {
            fields: projection(TASK_FIELDS),
            conditions,
            order_by: vec![OrderBy {
                field: "ModifiedOn".to_string(),
                direction: query.sort_direction,
            }],
            paging_info: PagingInfo {
                limit: query.limit.unwrap_or(self.page_size),
                offset: query.offset.unwrap_or(0),
            },
        };

        let response = self
            .gateway
            .fetch_records(&self.collection, record_query)
            .await
            .map_err(|err| ServiceError::fetch_failed("tasks", err))?;

        Ok(response.data.iter().map(task_from_record).collect())
    }

    /// Create a task. Returns the gateway's canonical version, which carries
    /// the assigned id and timestamps. Any placeholder id on the input is
    /// stripped by the updateable-field restriction.
    pub async fn create_task(&self, task: &Task) -> ServiceResult<Task> {
        let record = restrict_to(task_to_record(task), UPDATEABLE_FIELDS);

        let response = self
            .gateway
            .create_records(&self.collection, vec![record])
            .await?;
        let record = response
            .into_first_record()
            .ok_or_else(|| ServiceError::create_failed("task"))?;

        Ok(task_from_record(&record))
    }

    /// Full-field overwrite of an existing task. Fails before any gateway
    /// call when the task carries no id.
    pub async fn update_task(&self, task: &Task) -> ServiceResult<Task> {
        let id = task
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ServiceError::missing_field("id"))?;

        let mut record = restrict_to(task_to_record(task), UPDATEABLE_FIELDS);
        record.insert("Id".to_string(), Value::String(id.to_string()));

        let response = self
            .gateway
            .update_records(&self.collection, vec![record])
            .await?;
        let record = response
            .into_first_record()
            .ok_or_else(|| ServiceError::update_failed("task"))?;

        Ok(task_from_record(&record))
    }

    /// Delete a task by id. Links in the join collection are not cascaded;
    /// callers remove those separately when they care.
    pub async fn delete_task(&self, id: &str) -> ServiceResult<bool> {
        if id.is_empty() {
            return Err(ServiceError::missing_field("id"));
        }

        let response = self
            .gateway
            .delete_records(&self.collection, vec![Value::String(id.to_string())])
            .await?;
        if !response.success {
            return Err(ServiceError::delete_failed("task"));
        }
        Ok(true)
    }

    /// Flip a task's completed flag.
    ///
    /// Read-then-write with no atomicity: a concurrent update landing
    /// between the two steps is overwritten, last write wins.
    pub async fn toggle_completion(&self, id: &str) -> ServiceResult<Task> {
        if id.is_empty() {
            return Err(ServiceError::missing_field("id"));
        }

        let read = RecordQuery {
            fields: projection(TASK_FIELDS),
            conditions: vec![WhereCondition::exact("Id", id)],
            ..Default::default()
        };
        let response = self
            .gateway
            .fetch_records(&self.collection, read)
            .await
            .map_err(|err| ServiceError::fetch_failed("tasks", err))?;
        let current = response
            .data
            .first()
            .ok_or_else(|| ServiceError::task_not_found(id))?;
        let completed = current
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut patch = Record::new();
        patch.insert("Id".to_string(), Value::String(id.to_string()));
        patch.insert("completed".to_string(), Value::Bool(!completed));

        let response = self
            .gateway
            .update_records(&self.collection, vec![patch])
            .await?;
        let record = response
            .into_first_record()
            .ok_or_else(|| ServiceError::update_failed("task completion"))?;

        Ok(task_from_record(&record))
    }

    /// Aggregate counts for the tab header, measured against today's local
    /// date. Never fails: any error degrades to all-zero counts.
    pub async fn task_counts(&self) -> TaskCounts {
        let today = Local::now().format("%Y-%m-%d").to_string();
        self.task_counts_as_of(&today).await
    }

    /// Counts computed against an explicit `YYYY-MM-DD` date string.
    pub async fn task_counts_as_of(&self, today: &str) -> TaskCounts {
        match self.scan_counts(today).await {
            Ok(counts) => counts,
            Err(err) => {
                warn!(error = %err, "task counts degraded to zero");
                TaskCounts::default()
            }
        }
    }

    async fn scan_counts(&self, today: &str) -> ServiceResult<TaskCounts> {
        let query = RecordQuery {
            fields: projection(COUNT_FIELDS),
            paging_info: PagingInfo {
                limit: COUNT_SCAN_LIMIT,
                offset: 0,
            },
            ..Default::default()
        };
        let response = self
            .gateway
            .fetch_records(&self.collection, query)
            .await
            .map_err(|err| ServiceError::fetch_failed("tasks", err))?;

        let mut counts = TaskCounts {
            all: response.data.len(),
            ..TaskCounts::default()
        };
        for record in &response.data {
            if record
                .get("completed")
                .and_then(Value::as_bool)
                .unwrap_or(false)
            {
                counts.completed += 1;
            }
            // Lexical comparison on ISO dates: equal is today, greater is
            // upcoming, empty is neither.
            let due = record.get("dueDate").and_then(Value::as_str).unwrap_or("");
            if due == today {
                counts.today += 1;
            } else if !due.is_empty() && due > today {
                counts.upcoming += 1;
            }
        }
        Ok(counts)
    }

    /// Write the derived comma-joined tag string onto a task via a partial
    /// update. Only tag reconciliation calls this; the join rows stay
    /// canonical.
    pub(crate) async fn write_tags_label(&self, id: &str, names: &[String]) -> ServiceResult<()> {
        let mut patch = Record::new();
        patch.insert("Id".to_string(), Value::String(id.to_string()));
        patch.insert("Tags".to_string(), Value::String(join_tags(names)));

        let response = self
            .gateway
            .update_records(&self.collection, vec![patch])
            .await?;
        if !response.success {
            return Err(ServiceError::update_failed("task tags"));
        }
        Ok(())
    }
}
