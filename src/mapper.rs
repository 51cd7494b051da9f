//! Field mapping between gateway records and domain entities.
//!
//! Pure transforms, no I/O. Round-trips are exact for fully-populated
//! entities (modulo the derived `Name` field, which is discarded on read
//! back); absent optionals come back as defaults, not absence.

use serde_json::Value;

use crate::gateway::Record;
use crate::types::{Priority, Tag, Task, TaskTagLink};

/// Split a stored comma-separated tag string into trimmed, non-empty names.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tag names back into the stored comma-separated convention.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

fn string_field(record: &Record, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Record ids arrive as strings or numbers depending on the backend; both
/// map to the opaque string id the domain carries.
fn id_field(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Map a gateway task record to the domain shape.
pub fn task_from_record(record: &Record) -> Task {
    // An empty or missing title falls back to the system Name field.
    let title = string_field(record, "title")
        .filter(|t| !t.is_empty())
        .or_else(|| string_field(record, "Name"))
        .unwrap_or_default();

    Task {
        id: id_field(record, "Id"),
        title,
        description: string_field(record, "description").unwrap_or_default(),
        completed: record
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        priority: string_field(record, "priority")
            .map(|p| Priority::parse(&p))
            .unwrap_or_default(),
        due_date: string_field(record, "dueDate").unwrap_or_default(),
        tags: string_field(record, "Tags")
            .map(|t| split_tags(&t))
            .unwrap_or_default(),
        created_on: string_field(record, "CreatedOn"),
        modified_on: string_field(record, "ModifiedOn"),
    }
}

/// Map a domain task to the gateway record shape.
///
/// `Id` is included only when the task already has one; that presence is
/// what separates update intent from create intent downstream.
pub fn task_to_record(task: &Task) -> Record {
    let mut record = Record::new();
    // Name mirrors the title so list views on the backend stay readable.
    record.insert("Name".to_string(), Value::String(task.title.clone()));
    record.insert("Tags".to_string(), Value::String(join_tags(&task.tags)));
    record.insert("title".to_string(), Value::String(task.title.clone()));
    record.insert(
        "description".to_string(),
        Value::String(task.description.clone()),
    );
    record.insert("completed".to_string(), Value::Bool(task.completed));
    record.insert(
        "priority".to_string(),
        Value::String(task.priority.as_str().to_string()),
    );
    record.insert("dueDate".to_string(), Value::String(task.due_date.clone()));
    if let Some(id) = &task.id {
        record.insert("Id".to_string(), Value::String(id.clone()));
    }
    record
}

/// Map a gateway tag record to the domain shape.
pub fn tag_from_record(record: &Record) -> Tag {
    Tag {
        id: id_field(record, "Id"),
        name: string_field(record, "Name").unwrap_or_default(),
        tags: string_field(record, "Tags")
            .map(|t| split_tags(&t))
            .unwrap_or_default(),
        created_on: string_field(record, "CreatedOn"),
        modified_on: string_field(record, "ModifiedOn"),
    }
}

/// Map a domain tag to the gateway record shape.
pub fn tag_to_record(tag: &Tag) -> Record {
    let mut record = Record::new();
    record.insert("Name".to_string(), Value::String(tag.name.clone()));
    record.insert("Tags".to_string(), Value::String(join_tags(&tag.tags)));
    if let Some(id) = &tag.id {
        record.insert("Id".to_string(), Value::String(id.clone()));
    }
    record
}

/// Map a gateway task-tag link record to the domain shape.
pub fn link_from_record(record: &Record) -> TaskTagLink {
    TaskTagLink {
        id: id_field(record, "Id"),
        task_id: id_field(record, "task_id").unwrap_or_default(),
        tag_id: id_field(record, "tag_id").unwrap_or_default(),
        created_on: string_field(record, "CreatedOn"),
        modified_on: string_field(record, "ModifiedOn"),
    }
}

/// Map a domain link to the gateway record shape. The backend requires a
/// Name on every record; for links it is synthesized from the two ids.
pub fn link_to_record(link: &TaskTagLink) -> Record {
    let mut record = Record::new();
    record.insert(
        "Name".to_string(),
        Value::String(format!("{}-{}", link.task_id, link.tag_id)),
    );
    record.insert("task_id".to_string(), Value::String(link.task_id.clone()));
    record.insert("tag_id".to_string(), Value::String(link.tag_id.clone()));
    if let Some(id) = &link.id {
        record.insert("Id".to_string(), Value::String(id.clone()));
    }
    record
}
