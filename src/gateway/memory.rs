//! In-memory gateway for tests and local development.
//!
//! Emulates the hosted backend's conventions: assigns numeric string ids,
//! stamps `CreatedOn`/`ModifiedOn`, and honors projection, predicates,
//! ordering, and paging. All state lives behind one mutex shared across
//! clones, so a `MemoryGateway` can be handed to several repositories.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::{
    DeleteResponse, FetchResponse, Record, RecordGateway, RecordQuery, WhereCondition,
    WhereOperator, WriteResponse, WriteResult,
};
use crate::types::SortDirection;

/// In-memory record store implementing [`RecordGateway`].
#[derive(Clone, Default)]
pub struct MemoryGateway {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Record>>,
    next_id: u64,
}

impl Inner {
    /// Assign an id and stamp timestamps. Seeded records may carry their own
    /// `CreatedOn`/`ModifiedOn`, which are kept for ordering tests.
    fn assign(&mut self, record: &mut Record) -> String {
        self.next_id += 1;
        let id = self.next_id.to_string();
        let now = Utc::now().to_rfc3339();
        record.insert("Id".to_string(), Value::String(id.clone()));
        record
            .entry("CreatedOn".to_string())
            .or_insert_with(|| Value::String(now.clone()));
        record
            .entry("ModifiedOn".to_string())
            .or_insert_with(|| Value::String(now));
        id
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the create conventions except id
    /// and timestamp assignment. Returns the assigned id.
    pub fn seed(&self, collection: &str, mut record: Record) -> String {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.assign(&mut record);
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
        id
    }

    /// Number of stored records in a collection.
    pub fn len(&self, collection: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.collections.get(collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl RecordGateway for MemoryGateway {
    async fn fetch_records(&self, collection: &str, query: RecordQuery) -> Result<FetchResponse> {
        let inner = self.inner.lock().unwrap();
        let rows: &[Record] = inner
            .collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut matched: Vec<&Record> = rows
            .iter()
            .filter(|r| matches_all(r, &query.conditions))
            .collect();

        if let Some(order) = query.order_by.first() {
            matched.sort_by(|a, b| {
                // Ties resolve by insertion order via the numeric id.
                let ord = field_text(a, &order.field)
                    .cmp(&field_text(b, &order.field))
                    .then(numeric_id(a).cmp(&numeric_id(b)));
                match order.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let data = matched
            .into_iter()
            .skip(query.paging_info.offset)
            .take(query.paging_info.limit)
            .map(|r| project(r, &query.fields))
            .collect();

        Ok(FetchResponse { data })
    }

    async fn create_records(&self, collection: &str, records: Vec<Record>) -> Result<WriteResponse> {
        let mut inner = self.inner.lock().unwrap();
        let mut results = Vec::with_capacity(records.len());

        for mut record in records {
            // Ids are gateway-assigned; a client-supplied one is discarded.
            record.remove("Id");
            record.remove("CreatedOn");
            record.remove("ModifiedOn");
            inner.assign(&mut record);
            inner
                .collections
                .entry(collection.to_string())
                .or_default()
                .push(record.clone());
            results.push(WriteResult { data: record });
        }

        Ok(WriteResponse {
            success: true,
            results,
        })
    }

    async fn update_records(&self, collection: &str, records: Vec<Record>) -> Result<WriteResponse> {
        let mut inner = self.inner.lock().unwrap();
        let rows = inner.collections.entry(collection.to_string()).or_default();
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let Some(id) = record.get("Id").and_then(value_to_id) else {
                return Ok(WriteResponse::default());
            };
            let Some(row) = rows
                .iter_mut()
                .find(|r| record_id(r).as_deref() == Some(id.as_str()))
            else {
                return Ok(WriteResponse::default());
            };

            // Partial update: only the supplied fields change.
            for (key, value) in record {
                if key == "Id" || key == "CreatedOn" {
                    continue;
                }
                row.insert(key, value);
            }
            row.insert(
                "ModifiedOn".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
            results.push(WriteResult { data: row.clone() });
        }

        Ok(WriteResponse {
            success: true,
            results,
        })
    }

    async fn delete_records(
        &self,
        collection: &str,
        record_ids: Vec<Value>,
    ) -> Result<DeleteResponse> {
        let mut inner = self.inner.lock().unwrap();
        let rows = inner.collections.entry(collection.to_string()).or_default();

        let ids: Vec<String> = record_ids.iter().filter_map(value_to_id).collect();
        let before = rows.len();
        rows.retain(|r| record_id(r).is_none_or(|id| !ids.contains(&id)));

        // Soft failure when any requested id did not exist.
        Ok(DeleteResponse {
            success: before - rows.len() == ids.len(),
        })
    }
}

fn matches_all(record: &Record, conditions: &[WhereCondition]) -> bool {
    conditions.iter().all(|c| matches_one(record, c))
}

fn matches_one(record: &Record, condition: &WhereCondition) -> bool {
    let stored = record
        .get(&condition.field_name)
        .unwrap_or(&Value::Null);

    match condition.operator {
        WhereOperator::ExactMatch => condition.values.iter().any(|v| v == stored),
        WhereOperator::Contains => {
            let haystack = value_text(stored).to_lowercase();
            condition
                .values
                .iter()
                .any(|v| haystack.contains(&value_text(v).to_lowercase()))
        }
    }
}

fn project(record: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record.clone();
    }
    // The backend always returns Id, whether or not it was requested.
    let mut out = Record::new();
    if let Some(id) = record.get("Id") {
        out.insert("Id".to_string(), id.clone());
    }
    for field in fields {
        if let Some(value) = record.get(field) {
            out.insert(field.clone(), value.clone());
        }
    }
    out
}

fn field_text(record: &Record, field: &str) -> String {
    record.get(field).map_or_else(String::new, value_text)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn record_id(record: &Record) -> Option<String> {
    record.get("Id").and_then(value_to_id)
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn numeric_id(record: &Record) -> u64 {
    record_id(record)
        .and_then(|id| id.parse().ok())
        .unwrap_or(0)
}
