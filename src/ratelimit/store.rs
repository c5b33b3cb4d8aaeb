use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateWindowRecord {
    pub count: u32,
    pub window_start: i64,
    pub window_ms: i64,
}

impl RateWindowRecord {
    pub fn new(window_start: i64, window_ms: i64) -> Self {
        Self { count: 1, window_start, window_ms }
    }

    pub fn reset_time(&self) -> i64 {
        self.window_start.saturating_add(self.window_ms)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now.saturating_sub(self.window_start) >= self.window_ms
    }
}

/// Per-identity window records. Production wiring shares one store per process;
/// tests build their own.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn get(&self, identity: &str) -> Option<RateWindowRecord>;
    async fn set(&self, identity: &str, record: RateWindowRecord);
    /// Removes every record whose window has elapsed at `now`; returns how many.
    async fn sweep(&self, now: i64) -> usize;
    async fn len(&self) -> usize;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRateLimitStore {
    records: Arc<Mutex<HashMap<String, RateWindowRecord>>>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn get(&self, identity: &str) -> Option<RateWindowRecord> {
        let records = self.records.lock().await;
        records.get(identity).copied()
    }

    async fn set(&self, identity: &str, record: RateWindowRecord) {
        let mut records = self.records.lock().await;
        records.insert(identity.to_string(), record);
    }

    async fn sweep(&self, now: i64) -> usize {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now));
        before - records.len()
    }

    async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}
