//! In-Memory Cache
//!
//! Process-local stand-in for a networked cache: a keyspace, its expiration
//! reaper and operation metrics behind the `CacheClient` contract.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{Keyspace, KeyspaceStats, Reaper};
use crate::client::{CacheClient, Value};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::metrics::{Metrics, Outcome};

/// In-memory implementation of `CacheClient`
///
/// Must be created inside a Tokio runtime; the reaper is spawned on it.
#[derive(Debug)]
pub struct InMemoryCache {
    keyspace: Arc<Keyspace>,
    metrics: Arc<Metrics>,
    reaper: Reaper,
}

impl InMemoryCache {
    /// Create a cache with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let keyspace = Arc::new(Keyspace::with_shard_amount(config.effective_shard_amount()));
        let metrics = Arc::new(Metrics::new());
        let reaper = Reaper::spawn(keyspace.clone(), metrics.clone(), config.reaper_interval)?;

        Ok(Self {
            keyspace,
            metrics,
            reaper,
        })
    }

    /// Stop the reaper and wait for it to exit
    pub async fn shutdown(mut self) {
        self.reaper.stop().await;
    }

    pub fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn stats(&self) -> KeyspaceStats {
        self.keyspace.stats()
    }

    pub fn is_reaper_running(&self) -> bool {
        self.reaper.is_running()
    }

    /// Run one operation and record its outcome
    fn observe<T>(
        &self,
        command: &'static str,
        classify: fn(&Result<T>) -> Outcome,
        op: impl FnOnce(&Keyspace) -> Result<T>,
    ) -> Result<T> {
        let start = Instant::now();
        let result = op(&self.keyspace);
        self.metrics
            .record_operation(command, classify(&result), start.elapsed());
        result
    }
}

/// Reads count toward the hit ratio
fn read_outcome<T>(result: &Result<T>) -> Outcome {
    match result {
        Ok(_) => Outcome::Hit,
        Err(e) if e.is_miss() => Outcome::Miss,
        Err(_) => Outcome::Rejected,
    }
}

fn write_outcome<T>(result: &Result<T>) -> Outcome {
    match result {
        Err(e) if !e.is_miss() => Outcome::Rejected,
        _ => Outcome::Write,
    }
}

fn presence_outcome(result: &Result<bool>) -> Outcome {
    match result {
        Ok(true) => Outcome::Hit,
        Ok(false) => Outcome::Miss,
        Err(_) => Outcome::Rejected,
    }
}

impl CacheClient for InMemoryCache {
    fn set(&self, key: Bytes, value: Value, ttl: Duration) -> Result<()> {
        self.observe("SET", write_outcome, |ks| {
            ks.set(key, value, ttl);
            Ok(())
        })
    }

    fn get(&self, key: &[u8]) -> Result<Bytes> {
        self.observe("GET", read_outcome, |ks| {
            let (result, evicted) = ks.get_evicting(key);
            if evicted {
                self.metrics.record_lazy_eviction();
            }
            result
        })
    }

    fn delete(&self, keys: &[Bytes]) -> Result<()> {
        self.observe("DEL", write_outcome, |ks| {
            ks.delete(keys);
            Ok(())
        })
    }

    fn exists(&self, keys: &[Bytes]) -> Result<bool> {
        self.observe("EXISTS", presence_outcome, |ks| Ok(ks.exists(keys)))
    }

    fn expire(&self, key: &[u8], ttl: Duration) -> Result<bool> {
        self.observe("EXPIRE", write_outcome, |ks| Ok(ks.expire(key, ttl)))
    }

    fn incr(&self, key: &[u8]) -> Result<i64> {
        self.observe("INCR", write_outcome, |ks| Ok(ks.incr(key)))
    }

    fn hset(&self, key: &[u8], field_values: &[Bytes]) -> Result<()> {
        self.observe("HSET", write_outcome, |ks| ks.hset(key, field_values))
    }

    fn hget(&self, key: &[u8], field: &[u8]) -> Result<Bytes> {
        self.observe("HGET", read_outcome, |ks| ks.hget(key, field))
    }

    fn hgetall(&self, key: &[u8]) -> Result<HashMap<Bytes, Bytes>> {
        self.observe("HGETALL", read_outcome, |ks| ks.hgetall(key))
    }

    fn hdel(&self, key: &[u8], fields: &[Bytes]) -> Result<()> {
        self.observe("HDEL", write_outcome, |ks| {
            ks.hdel(key, fields);
            Ok(())
        })
    }

    fn lpush(&self, key: &[u8], values: &[Bytes]) -> Result<()> {
        self.observe("LPUSH", write_outcome, |ks| {
            ks.lpush(key, values);
            Ok(())
        })
    }

    fn lpop(&self, key: &[u8]) -> Result<Bytes> {
        self.observe("LPOP", read_outcome, |ks| ks.lpop(key))
    }

    fn rpush(&self, key: &[u8], values: &[Bytes]) -> Result<()> {
        self.observe("RPUSH", write_outcome, |ks| {
            ks.rpush(key, values);
            Ok(())
        })
    }

    fn rpop(&self, key: &[u8]) -> Result<Bytes> {
        self.observe("RPOP", read_outcome, |ks| ks.rpop(key))
    }
}
