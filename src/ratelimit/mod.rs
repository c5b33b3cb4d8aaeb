//! Fixed-window upload throttling keyed by client identity.
//!
//! A window opens on the first request from an identity and lasts `window`;
//! once it has elapsed the next request opens a fresh one. Expired records are
//! only dropped when [`RateLimiter::clear_expired_records`] is called.

mod clock;
mod store;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{MemoryRateLimitStore, RateLimitStore, RateWindowRecord};

use crate::validation::RoleLimitPolicy;
use crate::{RateLimitConfig, Role};

const ROLE_QUOTA_WINDOW: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining_uploads: u32,
    pub reset_time: DateTime<Utc>,
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
    config: RateLimitConfig,
    // Serializes read-modify-write on the store.
    gate: Arc<Mutex<()>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_parts(config, Arc::new(MemoryRateLimitStore::new()), Arc::new(SystemClock))
    }

    pub fn with_parts(config: RateLimitConfig, store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            config,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Checks against the configured default limit and window.
    pub async fn check(&self, identity: &str) -> RateLimitDecision {
        let window = Duration::from_millis(self.config.window_ms);
        self.check_rate_limit(identity, self.config.max_requests, window).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn check_rate_limit(&self, identity: &str, limit: u32, window: Duration) -> RateLimitDecision {
        let _guard = self.gate.lock().await;
        let now = self.clock.now_millis();
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);

        if limit == 0 {
            debug!("limit is zero, denying");
            return decision(false, 0, now.saturating_add(window_ms));
        }

        match self.store.get(identity).await {
            Some(mut record) if !record.is_expired(now) => {
                if record.count >= limit {
                    debug!(count = record.count, "rate limit exceeded");
                    return decision(false, 0, record.reset_time());
                }
                record.count += 1;
                self.store.set(identity, record).await;
                decision(true, limit - record.count, record.reset_time())
            }
            _ => {
                let record = RateWindowRecord::new(now, window_ms);
                self.store.set(identity, record).await;
                decision(true, limit - 1, record.reset_time())
            }
        }
    }

    /// Hourly upload quota for an authenticated user, from the role table.
    pub async fn check_role_quota(&self, user_id: &str, role: Option<&str>) -> RateLimitDecision {
        let limits = RoleLimitPolicy::limits_for(Role::parse(role));
        let identity = format!("user:{}", user_id);
        self.check_rate_limit(&identity, limits.max_files_per_hour, ROLE_QUOTA_WINDOW).await
    }

    pub async fn clear_expired_records(&self) -> usize {
        let _guard = self.gate.lock().await;
        let removed = self.store.sweep(self.clock.now_millis()).await;
        if removed > 0 {
            info!(removed, "cleared expired rate limit records");
        }
        removed
    }

    pub async fn tracked_identities(&self) -> usize {
        self.store.len().await
    }
}

fn decision(allowed: bool, remaining_uploads: u32, reset_millis: i64) -> RateLimitDecision {
    RateLimitDecision {
        allowed,
        remaining_uploads,
        reset_time: DateTime::from_timestamp_millis(reset_millis).unwrap_or_default(),
    }
}
