//! Scalar entry with optional expiration

use std::time::{Duration, Instant};

use crate::client::Value;

/// Entry in the scalar namespace with value and expiration
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: Value,
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// Create an entry; a zero TTL means it never expires
    pub fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: (!ttl.is_zero()).then(|| Instant::now() + ttl),
        }
    }

    /// Entry without expiration
    pub fn persistent(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// An entry is live until its deadline is reached
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.map(|t| now >= t).unwrap_or(false)
    }

    /// Replace the deadline with `now + ttl`
    pub fn expire_in(&mut self, ttl: Duration) {
        self.expires_at = Some(Instant::now() + ttl);
    }

    /// Remaining time to live, `None` if the entry never expires
    pub fn ttl(&self) -> Option<Duration> {
        self.expires_at
            .map(|t| t.saturating_duration_since(Instant::now()))
    }
}
