//! Repositories orchestrating gateway calls per collection.
//!
//! Each repository holds a shared gateway handle and the name of the
//! collection it operates on. Field lists mirror the collection schemas;
//! writes are restricted to the updateable subset before they reach the
//! gateway.

pub mod task_tags;
pub mod tags;
pub mod tasks;

pub use task_tags::TaskTagRepository;
pub use tags::TagRepository;
pub use tasks::TaskRepository;

use crate::gateway::Record;

/// Build an owned projection list from a static field set.
pub(crate) fn projection(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

/// Restrict a record to the given field set. Anything outside it, including
/// a client-supplied `Id`, is dropped before the write.
pub(crate) fn restrict_to(record: Record, allowed: &[&str]) -> Record {
    record
        .into_iter()
        .filter(|(key, _)| allowed.contains(&key.as_str()))
        .collect()
}
