use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{SiteStore, StoreError};
use crate::model::PageRecord;

/// A request as the store received it
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Update { id: String, record: PageRecord },
    Delete { id: String },
}

/// In-process store.
///
/// Records every call, can be told to fail the next request, and in gated mode
/// holds each request until [`release`](Self::release) hands out a permit.
#[derive(Default)]
pub struct MemorySiteStore {
    records: Mutex<HashMap<String, PageRecord>>,
    calls: Mutex<Vec<StoreCall>>,
    failures: Mutex<Vec<StoreError>>,
    gate: Option<Semaphore>,
}

impl MemorySiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose requests block until released
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn with_record(self, record: PageRecord) -> Self {
        self.insert(record);
        self
    }

    pub fn insert(&self, record: PageRecord) {
        lock(&self.records).insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<PageRecord> {
        lock(&self.records).get(id).cloned()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    /// Fail the next request with `error`. Queued failures are used in order.
    pub fn fail_next(&self, error: StoreError) {
        lock(&self.failures).insert(0, error);
    }

    /// Let `n` held requests proceed
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    async fn admit(&self, call: StoreCall) -> Result<(), StoreError> {
        lock(&self.calls).push(call);
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        match lock(&self.failures).pop() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl SiteStore for MemorySiteStore {
    async fn update_site(&self, id: &str, record: &PageRecord) -> Result<PageRecord, StoreError> {
        self.admit(StoreCall::Update {
            id: id.to_string(),
            record: record.clone(),
        })
        .await?;

        let mut records = lock(&self.records);
        if !records.contains_key(id) {
            return Err(StoreError::NotFound);
        }
        records.insert(id.to_string(), record.clone());
        Ok(record.clone())
    }

    async fn delete_site(&self, id: &str) -> Result<(), StoreError> {
        self.admit(StoreCall::Delete { id: id.to_string() }).await?;

        match lock(&self.records).remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}
