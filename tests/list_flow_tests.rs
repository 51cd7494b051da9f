//! End-to-end list flow: tab scope to gateway query to in-memory refine.

use std::sync::Arc;

use taskflow_core::filter::{ListFilter, TabScope, refine, scope_query};
use taskflow_core::gateway::memory::MemoryGateway;
use taskflow_core::repo::TaskRepository;
use taskflow_core::types::{Priority, SortDirection, Task};

const TODAY: &str = "2026-08-06";

async fn seeded_repo() -> TaskRepository {
    let repo = TaskRepository::new(Arc::new(MemoryGateway::new()), "tasks");
    for (title, due, priority) in [
        ("Write report", TODAY, Priority::High),
        ("Plan offsite", "2026-08-20", Priority::Medium),
        ("Review budget report", "2026-09-01", Priority::High),
        ("Archive inbox", "", Priority::Low),
    ] {
        repo.create_task(&Task {
            title: title.to_string(),
            due_date: due.to_string(),
            priority,
            ..Task::default()
        })
        .await
        .unwrap();
    }
    repo
}

#[tokio::test]
async fn today_tab_is_filtered_by_the_gateway() {
    let repo = seeded_repo().await;
    let filter = ListFilter::default();

    let query = scope_query(TabScope::Today, &filter, TODAY);
    let fetched = repo.fetch_tasks(&query).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].title, "Write report");

    // Refine is a no-op here; the predicate was already pushed down.
    let listed = refine(&fetched, TabScope::Today, &filter, TODAY);
    assert_eq!(listed, fetched);
}

#[tokio::test]
async fn upcoming_tab_is_refined_client_side() {
    let repo = seeded_repo().await;
    let filter = ListFilter::default();

    let query = scope_query(TabScope::Upcoming, &filter, TODAY);
    let fetched = repo.fetch_tasks(&query).await.unwrap();
    // The gateway cannot express greater-than; the full page comes back.
    assert_eq!(fetched.len(), 4);

    let listed = refine(&fetched, TabScope::Upcoming, &filter, TODAY);
    let titles: Vec<&str> = listed.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Review budget report", "Plan offsite"]);
}

#[tokio::test]
async fn search_and_priority_are_pushed_down_and_sorted() {
    let repo = seeded_repo().await;
    let filter = ListFilter {
        search: "report".to_string(),
        priority: Some(Priority::High),
        sort_direction: SortDirection::Asc,
    };

    let query = scope_query(TabScope::All, &filter, TODAY);
    let fetched = repo.fetch_tasks(&query).await.unwrap();
    // The page arrives newest-first regardless of the requested direction.
    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].title, "Review budget report");

    // Refine owns the direction: asc flips the page to oldest-first.
    let listed = refine(&fetched, TabScope::All, &filter, TODAY);
    assert_eq!(listed[0].title, "Write report");
}
