//! Shared fakes for engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use idset_core::ports::{DataSource, DatasetStore};
use idset_core::{DatasetRecord, Error, RawRows, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Barrier, Notify};

/// Dataset store backed by a vector.
pub struct MemoryStore {
    records: Mutex<Vec<DatasetRecord>>,
}

impl MemoryStore {
    pub fn new(records: Vec<DatasetRecord>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
        })
    }

    pub fn set(&self, records: Vec<DatasetRecord>) {
        *self.records.lock().unwrap() = records;
    }
}

#[async_trait]
impl DatasetStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<DatasetRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }
}

/// Data source that records every call and answers with two columns: the
/// call number and the first bound parameter.
#[derive(Default)]
pub struct RecordingSource {
    calls: AtomicUsize,
    queries: Mutex<Vec<(String, Vec<Option<String>>)>>,
    fail: AtomicBool,
    barrier: Option<Arc<Barrier>>,
    hold: Option<Arc<Notify>>,
}

impl RecordingSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every query waits on `barrier` before answering.
    pub fn with_barrier(barrier: Arc<Barrier>) -> Arc<Self> {
        Arc::new(Self {
            barrier: Some(barrier),
            ..Default::default()
        })
    }

    /// Every query waits for a notification before answering.
    pub fn with_hold(hold: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            hold: Some(hold),
            ..Default::default()
        })
    }

    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_sql(&self) -> Option<String> {
        self.queries.lock().unwrap().last().map(|(sql, _)| sql.clone())
    }

    pub fn last_params(&self) -> Option<Vec<Option<String>>> {
        self.queries.lock().unwrap().last().map(|(_, p)| p.clone())
    }
}

#[async_trait]
impl DataSource for RecordingSource {
    async fn query(&self, sql: &str, params: &[Option<String>]) -> Result<RawRows> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.queries
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Execution("relation does not exist".to_string()));
        }

        let first = params.first().cloned().flatten().unwrap_or_default();
        Ok(RawRows {
            columns: vec!["call".to_string(), "param".to_string()],
            rows: vec![
                vec![r#"{"align": "right"}"#.to_string(), "{}".to_string()],
                vec![call.to_string(), first],
            ],
        })
    }
}

pub fn dataset(id: &str, ttl_secs: i32) -> DatasetRecord {
    DatasetRecord {
        id: id.to_string(),
        query: Some("select * from t where a = $1 /*sort:id*/".to_string()),
        presentation_place: "reports".to_string(),
        cache_expiration_secs: ttl_secs,
        query_params: Some(r#"{"a": 1}"#.to_string()),
        ..Default::default()
    }
}

pub fn params(v: &[&str]) -> Vec<Option<String>> {
    v.iter().map(|s| Some(s.to_string())).collect()
}

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,idset_engine=debug")),
        )
        .with_test_writer()
        .try_init();
}
