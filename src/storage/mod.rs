//! Storage Engine
//!
//! In-memory scalar, hash and list namespaces with TTL support.

mod entry;
mod keyspace;
mod memory;
mod reaper;

pub use entry::Entry;
pub use keyspace::{Keyspace, KeyspaceStats};
pub use memory::InMemoryCache;
pub use reaper::Reaper;
