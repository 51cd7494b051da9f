//! Integration tests for the facade's tag reconciliation path.
//!
//! Join rows are the canonical tag representation; the comma-joined string
//! on the task record is a derived view these tests verify stays in sync.

mod common;

use std::sync::Arc;

use common::FailingGateway;
use taskflow_core::app::TaskFlow;
use taskflow_core::config::AppConfig;
use taskflow_core::error::ErrorCode;
use taskflow_core::gateway::memory::MemoryGateway;
use taskflow_core::types::{Task, TaskQuery};

fn flow_with_store() -> (TaskFlow, MemoryGateway) {
    let store = MemoryGateway::new();
    let flow = TaskFlow::new(Arc::new(store.clone()), &AppConfig::default());
    (flow, store)
}

fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn replace_task_tags_creates_links_and_derived_label() {
    let (flow, store) = flow_with_store();
    let task = flow
        .tasks
        .create_task(&Task {
            title: "Tag me".to_string(),
            ..Task::default()
        })
        .await
        .unwrap();
    let task_id = task.id.as_deref().unwrap();

    let resolved = flow
        .replace_task_tags(task_id, &names(&["Work", "work", "home"]))
        .await
        .unwrap();

    // Input order and cardinality are preserved; storage is deduplicated.
    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved[0].id, resolved[1].id);
    assert_eq!(store.len("tags"), 2);

    let links = flow.links.fetch_task_tags(task_id).await.unwrap();
    assert_eq!(links.len(), 2);

    // The task record carries the derived comma-joined view.
    let tasks = flow.tasks.fetch_tasks(&TaskQuery::default()).await.unwrap();
    assert_eq!(tasks[0].tags, vec!["Work", "home"]);
}

#[tokio::test]
async fn replace_task_tags_replaces_previous_links() {
    let (flow, store) = flow_with_store();
    let task = flow
        .tasks
        .create_task(&Task {
            title: "Retag me".to_string(),
            ..Task::default()
        })
        .await
        .unwrap();
    let task_id = task.id.as_deref().unwrap();

    flow.replace_task_tags(task_id, &names(&["alpha", "beta"]))
        .await
        .unwrap();
    flow.replace_task_tags(task_id, &names(&["beta", "gamma"]))
        .await
        .unwrap();

    let links = flow.links.fetch_task_tags(task_id).await.unwrap();
    assert_eq!(links.len(), 2);
    // Tag records are reused, never rewritten: three distinct names total.
    assert_eq!(store.len("tags"), 3);

    let tasks = flow.tasks.fetch_tasks(&TaskQuery::default()).await.unwrap();
    assert_eq!(tasks[0].tags, vec!["beta", "gamma"]);
}

#[tokio::test]
async fn replace_task_tags_requires_a_task_id() {
    let (flow, _) = flow_with_store();
    let err = flow
        .replace_task_tags("", &names(&["work"]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
}

#[tokio::test]
async fn replace_task_tags_clears_when_given_no_names() {
    let (flow, store) = flow_with_store();
    let task = flow
        .tasks
        .create_task(&Task {
            title: "Untag me".to_string(),
            ..Task::default()
        })
        .await
        .unwrap();
    let task_id = task.id.as_deref().unwrap();

    flow.replace_task_tags(task_id, &names(&["work"]))
        .await
        .unwrap();
    flow.replace_task_tags(task_id, &[]).await.unwrap();

    assert_eq!(store.len("task_tags"), 0);
    let tasks = flow.tasks.fetch_tasks(&TaskQuery::default()).await.unwrap();
    assert!(tasks[0].tags.is_empty());
}

#[tokio::test]
async fn tag_create_failure_propagates_before_links_change() {
    // Tag creation is the first write; when it fails, no link was touched.
    let gateway = Arc::new(FailingGateway::fail_on_create(1));
    let flow = TaskFlow::new(gateway.clone(), &AppConfig::default());

    let err = flow
        .replace_task_tags("t1", &names(&["doomed"]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::GatewayError);
    assert_eq!(gateway.store.len("task_tags"), 0);
}
