//! memkv - In-Process Keyed Data-Structure Cache
//!
//! An ephemeral, multi-type key-value store (strings, hashes, lists, TTLs,
//! atomic counters) that behaves like a networked cache client, so code written
//! against the `CacheClient` contract runs without a network dependency.

pub mod client;
pub mod config;
pub mod error;
pub mod files;
pub mod metrics;
pub mod protocol;
pub mod storage;

pub use client::{CacheClient, Value};
pub use config::CacheConfig;
pub use error::{CacheError, ErrorKind, FilesError, Result};
pub use files::{FileStore, MemoryFiles};
pub use metrics::Metrics;
pub use protocol::{Command, Response};
pub use storage::{InMemoryCache, Keyspace, KeyspaceStats, Reaper};
