//! Keyspace
//!
//! Three independent namespaces (scalars, hashes, lists) backed by sharded
//! DashMaps. Every operation runs inside the lock of the shard owning the key,
//! so calls on the same key are linearizable while different keys proceed in
//! parallel.

use bytes::Bytes;
use dashmap::DashMap;
use hashbrown::HashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::entry::Entry;
use crate::client::Value;
use crate::error::{CacheError, Result};

type FieldMap = HashMap<Bytes, Bytes>;

/// Entry counts per namespace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyspaceStats {
    /// Scalars, including expired ones not yet reaped
    pub scalars: usize,
    pub hashes: usize,
    pub lists: usize,
}

/// The shared state behind an in-memory cache
#[derive(Debug)]
pub struct Keyspace {
    scalars: DashMap<Bytes, Entry>,
    hashes: DashMap<Bytes, FieldMap>,
    lists: DashMap<Bytes, VecDeque<Bytes>>,
}

impl Default for Keyspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyspace {
    /// Create an empty keyspace with default sharding
    pub fn new() -> Self {
        Self {
            scalars: DashMap::new(),
            hashes: DashMap::new(),
            lists: DashMap::new(),
        }
    }

    /// Create with a specific shard count (power of two, greater than one)
    pub fn with_shard_amount(shard_amount: usize) -> Self {
        Self {
            scalars: DashMap::with_shard_amount(shard_amount),
            hashes: DashMap::with_shard_amount(shard_amount),
            lists: DashMap::with_shard_amount(shard_amount),
        }
    }

    // ---- scalars ----

    /// Store a scalar, replacing any previous value and deadline.
    /// A zero `ttl` means the entry never expires.
    pub fn set(&self, key: Bytes, value: Value, ttl: Duration) {
        self.scalars.insert(key, Entry::new(value, ttl));
    }

    /// Read a live scalar. An expired entry is removed on the way out.
    pub fn get(&self, key: &[u8]) -> Result<Bytes> {
        self.get_evicting(key).0
    }

    /// Like [`get`](Self::get), also reporting whether this call removed an
    /// expired entry. Stays false when a concurrent reader or the reaper got
    /// there first.
    pub fn get_evicting(&self, key: &[u8]) -> (Result<Bytes>, bool) {
        let live = match self.scalars.get(key) {
            None => return (Err(CacheError::key_not_found(key)), false),
            Some(entry) if entry.is_expired() => None,
            Some(entry) => Some(entry.value.to_bytes()),
        };

        match live {
            Some(value) => (Ok(value), false),
            None => {
                // Re-checked under the write lock: a concurrent set may have replaced it
                let evicted = self.scalars.remove_if(key, |_, e| e.is_expired()).is_some();
                if evicted {
                    debug!(key = %String::from_utf8_lossy(key), "Evicted expired key on read");
                }
                (Err(CacheError::key_expired(key)), evicted)
            }
        }
    }

    /// Remove scalars; absent keys are ignored
    pub fn delete(&self, keys: &[Bytes]) {
        for key in keys {
            self.scalars.remove(key);
        }
    }

    /// Presence check only; expired entries awaiting the reaper still count
    pub fn exists(&self, keys: &[Bytes]) -> bool {
        keys.iter().all(|key| self.scalars.contains_key(key))
    }

    /// Set `now + ttl` as the deadline of a live scalar
    pub fn expire(&self, key: &[u8], ttl: Duration) -> bool {
        if self.scalars.remove_if(key, |_, e| e.is_expired()).is_some() {
            return false;
        }
        match self.scalars.get_mut(key) {
            Some(mut entry) if !entry.is_expired() => {
                entry.expire_in(ttl);
                true
            }
            _ => false,
        }
    }

    /// Increment an integer scalar. Absent, expired and non-integer values
    /// count as zero; the result is stored without expiration.
    pub fn incr(&self, key: &[u8]) -> i64 {
        let mut slot = self
            .scalars
            .entry(Bytes::copy_from_slice(key))
            .or_insert_with(|| Entry::persistent(Value::Integer(0)));

        let current = if slot.is_expired() {
            0
        } else {
            slot.value.as_integer().unwrap_or(0)
        };
        let next = current.wrapping_add(1);
        *slot = Entry::persistent(Value::Integer(next));
        next
    }

    /// Remaining time to live of a scalar, `None` when it never expires
    pub fn ttl(&self, key: &[u8]) -> Result<Option<Duration>> {
        match self.scalars.get(key) {
            None => Err(CacheError::key_not_found(key)),
            Some(entry) if entry.is_expired() => Err(CacheError::key_expired(key)),
            Some(entry) => Ok(entry.ttl()),
        }
    }

    // ---- hashes ----

    /// Set field/value pairs on a hash, creating it when absent.
    /// An odd argument count is rejected before anything is written.
    pub fn hset(&self, key: &[u8], field_values: &[Bytes]) -> Result<()> {
        if field_values.len() % 2 != 0 {
            warn!(
                key = %String::from_utf8_lossy(key),
                args = field_values.len(),
                "Rejected HSET with odd argument count"
            );
            return Err(CacheError::InvalidArgument(format!(
                "HSET expects field/value pairs, got {} arguments",
                field_values.len()
            )));
        }

        let mut hash = self
            .hashes
            .entry(Bytes::copy_from_slice(key))
            .or_default();
        for pair in field_values.chunks_exact(2) {
            hash.insert(pair[0].clone(), pair[1].clone());
        }
        Ok(())
    }

    /// Read one field of a hash
    pub fn hget(&self, key: &[u8], field: &[u8]) -> Result<Bytes> {
        self.hashes
            .get(key)
            .and_then(|hash| hash.get(field).cloned())
            .ok_or_else(|| CacheError::field_not_found(key, field))
    }

    /// Owned copy of the hash; an existing but empty hash yields an empty map
    pub fn hgetall(&self, key: &[u8]) -> Result<std::collections::HashMap<Bytes, Bytes>> {
        self.hashes
            .get(key)
            .map(|hash| {
                hash.iter()
                    .map(|(f, v)| (f.clone(), v.clone()))
                    .collect()
            })
            .ok_or_else(|| CacheError::key_not_found(key))
    }

    /// Remove fields from a hash. The hash itself stays, even when emptied.
    pub fn hdel(&self, key: &[u8], fields: &[Bytes]) {
        if let Some(mut hash) = self.hashes.get_mut(key) {
            for field in fields {
                hash.remove(field);
            }
        }
    }

    // ---- lists ----

    /// Push each value onto the head in turn, so the last one ends up first
    pub fn lpush(&self, key: &[u8], values: &[Bytes]) {
        let mut list = self.lists.entry(Bytes::copy_from_slice(key)).or_default();
        for value in values {
            list.push_front(value.clone());
        }
    }

    /// Append values to the tail in order
    pub fn rpush(&self, key: &[u8], values: &[Bytes]) {
        let mut list = self.lists.entry(Bytes::copy_from_slice(key)).or_default();
        list.extend(values.iter().cloned());
    }

    /// Pop the head element; an absent or empty list is `EmptyList`
    pub fn lpop(&self, key: &[u8]) -> Result<Bytes> {
        self.lists
            .get_mut(key)
            .and_then(|mut list| list.pop_front())
            .ok_or_else(|| CacheError::empty_list(key))
    }

    /// Pop the tail element; an absent or empty list is `EmptyList`
    pub fn rpop(&self, key: &[u8]) -> Result<Bytes> {
        self.lists
            .get_mut(key)
            .and_then(|mut list| list.pop_back())
            .ok_or_else(|| CacheError::empty_list(key))
    }

    /// Number of elements, zero for an absent list
    pub fn llen(&self, key: &[u8]) -> usize {
        self.lists.get(key).map(|list| list.len()).unwrap_or(0)
    }

    // ---- maintenance ----

    /// Remove every expired scalar, returns count of removed keys
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.scalars.retain(|_, entry| {
            if entry.is_expired_at(now) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn stats(&self) -> KeyspaceStats {
        KeyspaceStats {
            scalars: self.scalars.len(),
            hashes: self.hashes.len(),
            lists: self.lists.len(),
        }
    }

    /// Drop all keys in every namespace
    pub fn clear(&self) {
        self.scalars.clear();
        self.hashes.clear();
        self.lists.clear();
    }
}
