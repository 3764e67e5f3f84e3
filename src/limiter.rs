//! Per-(activity, account) play limiter
//!
//! Counters live in an external expiring key-value store, one key per
//! (activity, account) pair. Every write resets the expiry to the full
//! window, so the window is a refreshing one: it ends `window` after the
//! most recent play, not at a calendar-day boundary.
//!
//! The read and the write are separate store calls, so two concurrent plays
//! can both observe a count just under the limit and both proceed. Callers
//! own the limit comparison; this type only moves counters.

use std::sync::Arc;
use std::time::Duration;

use crate::stores::RateLimitStore;
use crate::types::Result;

/// Counter key namespace
const KEY_PREFIX: &str = "talents";

/// Play-count limiter over an expiring counter store
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    window: Duration,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, window: Duration) -> Self {
        Self { store, window }
    }

    fn window_key(activity_code: i32, account_id: &str) -> String {
        format!("{}:{}_{}", KEY_PREFIX, activity_code, account_id)
    }

    /// Plays consumed in the current window; an absent or expired key is 0
    pub async fn consumed(&self, activity_code: i32, account_id: &str) -> Result<i64> {
        let count = self
            .store
            .get(&Self::window_key(activity_code, account_id))
            .await?;
        Ok(count.unwrap_or(0))
    }

    /// Record a new count, refreshing the expiry to the full window
    pub async fn consume(&self, activity_code: i32, account_id: &str, new_count: i64) -> Result<()> {
        self.store
            .set_with_expiry(
                &Self::window_key(activity_code, account_id),
                new_count,
                self.window,
            )
            .await
    }
}
