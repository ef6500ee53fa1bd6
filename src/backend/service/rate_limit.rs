//! Per-user search rate limiting
//!
//! Fixed-window counter keyed by user id. The limiter is in-process state;
//! it bounds abusive polling of the search endpoint, not a distributed
//! quota.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::shared::ServiceError;

const DEFAULT_WINDOW: Duration = Duration::from_secs(60);
const DEFAULT_MAX_REQUESTS: u32 = 30;

#[derive(Debug)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window per-user request limiter
#[derive(Clone)]
pub struct SearchLimiter {
    window: Duration,
    max_requests: u32,
    state: Arc<Mutex<HashMap<Uuid, Window>>>,
}

impl SearchLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Count one request for `user_id`, failing with `RateLimited` when the
    /// current window's budget is spent
    pub fn check(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let now = Instant::now();
        let mut state = self.state.lock().expect("limiter lock poisoned");

        let window = state.entry(user_id).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(window.started_at) >= self.window {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= self.max_requests {
            let elapsed = now.duration_since(window.started_at);
            let retry_after_secs = self.window.saturating_sub(elapsed).as_secs().max(1);
            return Err(ServiceError::RateLimited { retry_after_secs });
        }

        window.count += 1;
        Ok(())
    }
}

impl Default for SearchLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MAX_REQUESTS)
    }
}
