//! Shared test gateways.
//!
//! `RecordingGateway` wraps the in-memory store and counts calls so tests
//! can assert on what actually went over the wire; `FailingGateway` injects
//! a transport error on a chosen call.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::Value;
use taskflow_core::gateway::memory::MemoryGateway;
use taskflow_core::gateway::{
    DeleteResponse, FetchResponse, Record, RecordGateway, RecordQuery, WriteResponse,
};

/// Call counts per gateway operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct CallCounts {
    pub fetch: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

/// In-memory gateway that records every call and the last fetch query.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    pub store: MemoryGateway,
    counts: Arc<Mutex<CallCounts>>,
    last_fetch: Arc<Mutex<Option<RecordQuery>>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> CallCounts {
        *self.counts.lock().unwrap()
    }

    pub fn last_fetch(&self) -> Option<RecordQuery> {
        self.last_fetch.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordGateway for RecordingGateway {
    async fn fetch_records(&self, collection: &str, query: RecordQuery) -> Result<FetchResponse> {
        self.counts.lock().unwrap().fetch += 1;
        *self.last_fetch.lock().unwrap() = Some(query.clone());
        self.store.fetch_records(collection, query).await
    }

    async fn create_records(&self, collection: &str, records: Vec<Record>) -> Result<WriteResponse> {
        self.counts.lock().unwrap().create += 1;
        self.store.create_records(collection, records).await
    }

    async fn update_records(&self, collection: &str, records: Vec<Record>) -> Result<WriteResponse> {
        self.counts.lock().unwrap().update += 1;
        self.store.update_records(collection, records).await
    }

    async fn delete_records(
        &self,
        collection: &str,
        record_ids: Vec<Value>,
    ) -> Result<DeleteResponse> {
        self.counts.lock().unwrap().delete += 1;
        self.store.delete_records(collection, record_ids).await
    }
}

/// In-memory gateway that fails the Nth call (1-based) of one operation
/// with a transport error.
#[derive(Clone)]
pub struct FailingGateway {
    pub store: MemoryGateway,
    fail_fetch_at: Option<usize>,
    fail_create_at: Option<usize>,
    fetches: Arc<AtomicUsize>,
    creates: Arc<AtomicUsize>,
}

impl FailingGateway {
    fn new() -> Self {
        Self {
            store: MemoryGateway::new(),
            fail_fetch_at: None,
            fail_create_at: None,
            fetches: Arc::new(AtomicUsize::new(0)),
            creates: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fail_on_fetch(n: usize) -> Self {
        Self {
            fail_fetch_at: Some(n),
            ..Self::new()
        }
    }

    pub fn fail_on_create(n: usize) -> Self {
        Self {
            fail_create_at: Some(n),
            ..Self::new()
        }
    }
}

#[async_trait]
impl RecordGateway for FailingGateway {
    async fn fetch_records(&self, collection: &str, query: RecordQuery) -> Result<FetchResponse> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_fetch_at == Some(n) {
            bail!("fetch refused by test gateway");
        }
        self.store.fetch_records(collection, query).await
    }

    async fn create_records(&self, collection: &str, records: Vec<Record>) -> Result<WriteResponse> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_create_at == Some(n) {
            bail!("create refused by test gateway");
        }
        self.store.create_records(collection, records).await
    }

    async fn update_records(&self, collection: &str, records: Vec<Record>) -> Result<WriteResponse> {
        self.store.update_records(collection, records).await
    }

    async fn delete_records(
        &self,
        collection: &str,
        record_ids: Vec<Value>,
    ) -> Result<DeleteResponse> {
        self.store.delete_records(collection, record_ids).await
    }
}
