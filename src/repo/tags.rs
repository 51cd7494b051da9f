//! Tag repository: fetch, create, and name-based reconciliation.

use std::collections::HashMap;
use std::sync::Arc;

use super::{projection, restrict_to};
use crate::error::{ServiceError, ServiceResult};
use crate::gateway::{DEFAULT_PAGE_SIZE, OrderBy, PagingInfo, RecordGateway, RecordQuery};
use crate::mapper::{tag_from_record, tag_to_record};
use crate::types::{SortDirection, Tag};

/// Every field of the tag collection.
pub const TAG_FIELDS: &[&str] = &[
    "Name",
    "Tags",
    "Owner",
    "CreatedOn",
    "CreatedBy",
    "ModifiedOn",
    "ModifiedBy",
];

/// Fields the client is permitted to write on create/update.
const UPDATEABLE_FIELDS: &[&str] = &["Name", "Tags", "Owner"];

/// Repository over the tag collection.
pub struct TagRepository {
    gateway: Arc<dyn RecordGateway>,
    collection: String,
    page_size: usize,
}

impl TagRepository {
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

    /// Fetch all tags, ordered by name ascending.
    pub async fn fetch_tags(&self) -> ServiceResult<Vec<Tag>> {
        let query = RecordQuery {
            fields: projection(TAG_FIELDS),
            order_by: vec![OrderBy {
                field: "Name".to_string(),
                direction: SortDirection::Asc,
            }],
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
            .map_err(|err| ServiceError::fetch_failed("tags", err))?;

        Ok(response.data.iter().map(tag_from_record).collect())
    }

    /// Create a tag. Returns the gateway's canonical version.
    pub async fn create_tag(&self, tag: &Tag) -> ServiceResult<Tag> {
        let record = restrict_to(tag_to_record(tag), UPDATEABLE_FIELDS);

        let response = self
            .gateway
            .create_records(&self.collection, vec![record])
            .await?;
        let record = response
            .into_first_record()
            .ok_or_else(|| ServiceError::create_failed("tag"))?;

        Ok(tag_from_record(&record))
    }

    /// Resolve free-text names to tags, creating the ones that don't exist.
    ///
    /// Existing tags are fetched once and matched case-insensitively.
    /// Missing names are created sequentially, never fanned out, so a name
    /// duplicated in the input cannot race itself into two records. The
    /// result preserves input order and cardinality, minus blank entries.
    pub async fn get_or_create_tags(&self, names: &[String]) -> ServiceResult<Vec<Tag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_name: HashMap<String, Tag> = self
            .fetch_tags()
            .await?
            .into_iter()
            .map(|tag| (tag.name.to_lowercase(), tag))
            .collect();

        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let key = name.to_lowercase();
            if by_name.contains_key(&key) {
                continue;
            }
            let created = self
                .create_tag(&Tag {
                    name: name.to_string(),
                    ..Tag::default()
                })
                .await?;
            by_name.insert(key, created);
        }

        Ok(names
            .iter()
            .filter_map(|name| by_name.get(&name.trim().to_lowercase()).cloned())
            .collect())
    }
}
