//! In-memory filtering and ordering of already-fetched task lists.
//!
//! The gateway's predicates are the source of truth for everything its
//! operators can express. This engine applies what they cannot: the
//! upcoming-tab scope (the query language has no greater-than) and
//! sort-order toggling, plus the same search and priority rules for
//! callers filtering an already-fetched page locally. Title search is
//! case-insensitive, matching the tag-name convention.

use crate::types::{Priority, SortDirection, Task, TaskQuery};

/// The four tab contexts of the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TabScope {
    #[default]
    All,
    Today,
    Upcoming,
    Completed,
}

/// UI-side filter state: free-text search, priority, and sort order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub search: String,
    pub priority: Option<Priority>,
    pub sort_direction: SortDirection,
}

/// Translate a tab scope plus filter state into the server-side query.
///
/// Completed and Today push exact predicates down to the gateway; Upcoming
/// cannot be expressed there and is applied by [`refine`] instead. The
/// query always requests the gateway's default newest-first page: ordering
/// has a single owner, and in this flow it is [`refine`].
pub fn scope_query(scope: TabScope, filter: &ListFilter, today: &str) -> TaskQuery {
    TaskQuery {
        completed: (scope == TabScope::Completed).then_some(true),
        due_date: (scope == TabScope::Today).then(|| today.to_string()),
        search: (!filter.search.is_empty()).then(|| filter.search.clone()),
        priority: filter.priority,
        ..TaskQuery::default()
    }
}

/// Refine an already-fetched, newest-first task list.
///
/// Keeps tasks in scope whose title contains `search` (case-insensitive)
/// and whose priority matches when one is set. `desc` keeps the fetched
/// order (newest-modified first); `asc` reverses it.
pub fn refine(tasks: &[Task], scope: TabScope, filter: &ListFilter, today: &str) -> Vec<Task> {
    let needle = filter.search.to_lowercase();

    let mut kept: Vec<Task> = tasks
        .iter()
        .filter(|task| in_scope(task, scope, today))
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .filter(|task| filter.priority.is_none_or(|p| task.priority == p))
        .cloned()
        .collect();

    if filter.sort_direction == SortDirection::Asc {
        kept.reverse();
    }
    kept
}

fn in_scope(task: &Task, scope: TabScope, today: &str) -> bool {
    match scope {
        TabScope::All => true,
        TabScope::Completed => task.completed,
        // Lexical comparison is calendar-correct for ISO dates.
        TabScope::Today => task.due_date == today,
        TabScope::Upcoming => !task.due_date.is_empty() && task.due_date.as_str() > today,
    }
}
