//! Core domain types for the TaskFlow library.

use serde::{Deserialize, Serialize};

/// Task priority. Stored as a lowercase string on the wire.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Parse a priority string ("high", "medium", "low").
    /// Returns medium for unrecognized values.
    pub fn parse(s: &str) -> Priority {
        match s.to_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for ordered fetches.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    /// Newest first (the default for task lists).
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A task as the UI sees it.
///
/// `id`, `created_on`, and `modified_on` are assigned by the gateway; a task
/// built locally carries `None` for all three until it has been created. A
/// client-chosen placeholder id is tolerated; create strips it before the
/// record reaches the gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
    /// ISO `YYYY-MM-DD`, or empty when the task has no due date.
    pub due_date: String,
    /// Ordered tag names. Never contains empty or whitespace-only entries.
    pub tags: Vec<String>,
    pub created_on: Option<String>,
    pub modified_on: Option<String>,
}

/// A tag as the UI sees it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: Option<String>,
    pub name: String,
    /// Secondary free-text labels, same comma-separated storage convention
    /// as task tags.
    pub tags: Vec<String>,
    pub created_on: Option<String>,
    pub modified_on: Option<String>,
}

/// One edge of the task-tag many-to-many relation, materialized as a row in
/// the join collection. No foreign-key enforcement exists on the backend;
/// referential correctness is the link repository's contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskTagLink {
    pub id: Option<String>,
    pub task_id: String,
    pub tag_id: String,
    pub created_on: Option<String>,
    pub modified_on: Option<String>,
}

/// Filter descriptor for fetching tasks. Absent fields impose no predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    pub completed: Option<bool>,
    /// Substring match on the title.
    pub search: Option<String>,
    pub priority: Option<Priority>,
    /// Exact-match ISO date.
    pub due_date: Option<String>,
    pub sort_direction: SortDirection,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Aggregate task counts for the tab header display.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskCounts {
    pub all: usize,
    pub completed: usize,
    pub today: usize,
    pub upcoming: usize,
}
