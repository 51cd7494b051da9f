//! Record gateway abstraction.
//!
//! The hosted backend is reached through a pre-authenticated client exposing
//! four collection-scoped operations. This module defines that contract as a
//! trait plus the query and response types it exchanges. `memory` provides an
//! in-process implementation for tests and local development.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::SortDirection;

/// A flat field-name-to-value mapping as stored by the gateway.
pub type Record = serde_json::Map<String, Value>;

/// Default page size for fetches.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Predicate operator supported by the gateway's query language.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WhereOperator {
    ExactMatch,
    Contains,
}

/// One predicate of a fetch query. Multiple conditions are ANDed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WhereCondition {
    pub field_name: String,
    pub operator: WhereOperator,
    pub values: Vec<Value>,
}

impl WhereCondition {
    pub fn exact(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field_name: field.into(),
            operator: WhereOperator::ExactMatch,
            values: vec![value.into()],
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field_name: field.into(),
            operator: WhereOperator::Contains,
            values: vec![value.into()],
        }
    }
}

/// Sort instruction for a fetch query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

/// Limit/offset paging window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagingInfo {
    pub limit: usize,
    pub offset: usize,
}

impl Default for PagingInfo {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// A fetch query: projection, predicates, ordering, and paging.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    /// Field projection. Empty means every field.
    pub fields: Vec<String>,
    /// ANDed predicates. Empty imposes no filter.
    #[serde(rename = "where", default)]
    pub conditions: Vec<WhereCondition>,
    pub order_by: Vec<OrderBy>,
    pub paging_info: PagingInfo,
}

/// Response to a fetch. An empty `data` is a normal result, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchResponse {
    pub data: Vec<Record>,
}

/// Per-record outcome of a create or update call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResult {
    pub data: Record,
}

/// Response to a create or update call. `success: false` is a soft failure
/// the caller must check; it is not a transport error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteResponse {
    pub success: bool,
    pub results: Vec<WriteResult>,
}

impl WriteResponse {
    /// The first returned record, or `None` when the call soft-failed or
    /// returned nothing.
    pub fn into_first_record(self) -> Option<Record> {
        if !self.success {
            return None;
        }
        self.results.into_iter().next().map(|r| r.data)
    }
}

/// Response to a delete call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// The external record-storage client.
///
/// Implementations own authentication, transport, timeouts, and retries. The
/// repositories in this crate only interpret the success/data conventions of
/// the responses; transport errors surface through `anyhow::Error`.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Fetch records from a collection.
    async fn fetch_records(&self, collection: &str, query: RecordQuery) -> Result<FetchResponse>;

    /// Create records in a collection. The gateway assigns ids and
    /// timestamps and returns the canonical stored records.
    async fn create_records(&self, collection: &str, records: Vec<Record>) -> Result<WriteResponse>;

    /// Update existing records. Each record must carry an `Id`; fields not
    /// present in the record are left untouched (partial update).
    async fn update_records(&self, collection: &str, records: Vec<Record>) -> Result<WriteResponse>;

    /// Delete records by id.
    async fn delete_records(
        &self,
        collection: &str,
        record_ids: Vec<Value>,
    ) -> Result<DeleteResponse>;
}
