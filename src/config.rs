//! Cache Configuration

use std::time::Duration;

use crate::error::{CacheError, Result};

/// In-memory cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Period between expiration sweeps of the scalar namespace
    pub reaper_interval: Duration,

    /// Shards per namespace map (0 = auto-detect)
    pub shard_amount: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            reaper_interval: Duration::from_secs(60),
            shard_amount: 0, // Auto-detect (num_cpus * 4)
        }
    }
}

impl CacheConfig {
    /// Set the reaper interval
    pub fn with_reaper_interval(mut self, interval: Duration) -> Self {
        self.reaper_interval = interval;
        self
    }

    /// Set the shard amount
    pub fn with_shard_amount(mut self, shard_amount: usize) -> Self {
        self.shard_amount = shard_amount;
        self
    }

    /// Shard count actually used by the namespace maps.
    ///
    /// DashMap requires a power of two greater than one.
    pub fn effective_shard_amount(&self) -> usize {
        let requested = if self.shard_amount == 0 {
            num_cpus::get() * 4
        } else {
            self.shard_amount
        };
        requested.max(2).next_power_of_two()
    }

    pub fn validate(&self) -> Result<()> {
        if self.reaper_interval.is_zero() {
            return Err(CacheError::InvalidArgument(
                "reaper interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.reaper_interval, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = CacheConfig::default().with_reaper_interval(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_shard_amount_rounding() {
        assert_eq!(CacheConfig::default().with_shard_amount(1).effective_shard_amount(), 2);
        assert_eq!(CacheConfig::default().with_shard_amount(6).effective_shard_amount(), 8);
        assert_eq!(CacheConfig::default().with_shard_amount(16).effective_shard_amount(), 16);
        assert!(CacheConfig::default().effective_shard_amount().is_power_of_two());
    }
}
