//! Cache Metrics
//!
//! Operation counters, hit/miss ratios, eviction counts and latency tracking.

use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Outcome of a single cache operation, as seen by metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Read found its key, field or list element
    Hit,
    /// Read found nothing
    Miss,
    /// Mutation applied; not part of the hit ratio
    Write,
    /// Caller error (bad arguments)
    Rejected,
}

/// Metrics collector
#[derive(Debug)]
pub struct Metrics {
    /// Total operations count
    total_ops: AtomicU64,

    /// Operations per command name
    ops_by_command: RwLock<HashMap<&'static str, u64>>,

    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    rejected: AtomicU64,

    /// Expired scalars removed on access
    lazy_evictions: AtomicU64,

    /// Expired scalars removed by the background reaper
    reaped: AtomicU64,
    sweeps: AtomicU64,

    latency_sum_us: AtomicU64,
    latency_count: AtomicU64,
    latency_min_us: AtomicU64,
    latency_max_us: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            total_ops: AtomicU64::new(0),
            ops_by_command: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            lazy_evictions: AtomicU64::new(0),
            reaped: AtomicU64::new(0),
            sweeps: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
            latency_count: AtomicU64::new(0),
            latency_min_us: AtomicU64::new(u64::MAX),
            latency_max_us: AtomicU64::new(0),
        }
    }

    /// Record an operation
    pub fn record_operation(&self, command: &'static str, outcome: Outcome, latency: Duration) {
        self.total_ops.fetch_add(1, Ordering::Relaxed);

        *self.ops_by_command.write().entry(command).or_insert(0) += 1;

        let counter = match outcome {
            Outcome::Hit => &self.hits,
            Outcome::Miss => &self.misses,
            Outcome::Write => &self.writes,
            Outcome::Rejected => &self.rejected,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        let latency_us = latency.as_micros() as u64;
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
        self.latency_min_us.fetch_min(latency_us, Ordering::Relaxed);
        self.latency_max_us.fetch_max(latency_us, Ordering::Relaxed);
    }

    /// Record an expired entry removed while serving a read
    pub fn record_lazy_eviction(&self) {
        self.lazy_evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one reaper sweep and how many entries it removed
    pub fn record_sweep(&self, removed: usize) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.reaped.fetch_add(removed as u64, Ordering::Relaxed);
    }

    /// Get total operations count
    pub fn total_ops(&self) -> u64 {
        self.total_ops.load(Ordering::Relaxed)
    }

    /// Get operations by command
    pub fn ops_by_command(&self) -> HashMap<&'static str, u64> {
        self.ops_by_command.read().clone()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn lazy_evictions(&self) -> u64 {
        self.lazy_evictions.load(Ordering::Relaxed)
    }

    pub fn reaped(&self) -> u64 {
        self.reaped.load(Ordering::Relaxed)
    }

    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    /// Fraction of reads that hit (0.0 when nothing recorded)
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64
    }

    /// Get average latency in microseconds
    pub fn avg_latency_us(&self) -> f64 {
        let count = self.latency_count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        sum as f64 / count as f64
    }

    /// Get min latency in microseconds
    pub fn min_latency_us(&self) -> u64 {
        let min = self.latency_min_us.load(Ordering::Relaxed);
        if min == u64::MAX {
            0
        } else {
            min
        }
    }

    /// Get max latency in microseconds
    pub fn max_latency_us(&self) -> u64 {
        self.latency_max_us.load(Ordering::Relaxed)
    }

    /// Get a summary of metrics
    pub fn summary(&self) -> String {
        format!(
            "Operations: {} | Hits: {} Misses: {} ({:.1}% hit) Writes: {} | Evicted: lazy={}, reaped={} in {} sweeps | Latency (µs): avg={:.1}, min={}, max={}",
            self.total_ops(),
            self.hits(),
            self.misses(),
            self.hit_ratio() * 100.0,
            self.writes(),
            self.lazy_evictions(),
            self.reaped(),
            self.sweeps(),
            self.avg_latency_us(),
            self.min_latency_us(),
            self.max_latency_us()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.record_operation("GET", Outcome::Hit, Duration::from_micros(100));
        metrics.record_operation("GET", Outcome::Miss, Duration::from_micros(200));
        metrics.record_operation("SET", Outcome::Write, Duration::from_micros(150));

        assert_eq!(metrics.total_ops(), 3);
        assert_eq!(metrics.min_latency_us(), 100);
        assert_eq!(metrics.max_latency_us(), 200);
        assert!((metrics.avg_latency_us() - 150.0).abs() < 0.1);

        let by_cmd = metrics.ops_by_command();
        assert_eq!(by_cmd.get("GET"), Some(&2));
        assert_eq!(by_cmd.get("SET"), Some(&1));

        assert_eq!(metrics.hits(), 1);
        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.writes(), 1);
        assert!((metrics.hit_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_writes_do_not_move_hit_ratio() {
        let metrics = Metrics::new();
        metrics.record_operation("GET", Outcome::Miss, Duration::from_micros(10));
        for _ in 0..10 {
            metrics.record_operation("SET", Outcome::Write, Duration::from_micros(10));
        }

        assert_eq!(metrics.hits(), 0);
        assert_eq!(metrics.hit_ratio(), 0.0);
        assert_eq!(metrics.total_ops(), 11);
    }

    #[test]
    fn test_eviction_counters() {
        let metrics = Metrics::new();
        metrics.record_lazy_eviction();
        metrics.record_sweep(3);
        metrics.record_sweep(0);

        assert_eq!(metrics.lazy_evictions(), 1);
        assert_eq!(metrics.reaped(), 3);
        assert_eq!(metrics.sweeps(), 2);
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = Metrics::new();
        assert_eq!(metrics.min_latency_us(), 0);
        assert_eq!(metrics.hit_ratio(), 0.0);
        assert!(metrics.summary().starts_with("Operations: 0"));
    }
}
