//! Cache Client Contract
//!
//! The capability interface shared by the in-memory store and networked cache backends.
//! Callers that only rely on this trait can swap implementations transparently.

use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::Result;

/// Scalar payload stored under a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Opaque byte string
    Bytes(Bytes),

    /// 64-bit counter value
    Integer(i64),
}

impl Value {
    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Bytes(_) => None,
        }
    }

    /// Render as bytes; integers become their decimal text
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Value::Bytes(b) => b.clone(),
            Value::Integer(n) => Bytes::from(n.to_string()),
        }
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Bytes(Bytes::from(s))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(v))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

/// Keyed data-structure cache operations
///
/// Scalar, hash and list keys live in separate namespaces: the same key may
/// hold a scalar, a hash and a list at once.
pub trait CacheClient: Send + Sync {
    /// Insert or overwrite a scalar. `Duration::ZERO` means no expiration.
    fn set(&self, key: Bytes, value: Value, ttl: Duration) -> Result<()>;

    /// Read a scalar, failing if it is absent or expired
    fn get(&self, key: &[u8]) -> Result<Bytes>;

    /// Remove scalars; missing keys are ignored
    fn delete(&self, keys: &[Bytes]) -> Result<()>;

    /// True iff every key is present in the scalar namespace
    fn exists(&self, keys: &[Bytes]) -> Result<bool>;

    /// Set a time-to-live on an existing scalar; false if the key is absent
    fn expire(&self, key: &[u8], ttl: Duration) -> Result<bool>;

    /// Increment an integer scalar and return the new value
    fn incr(&self, key: &[u8]) -> Result<i64>;

    /// Set hash fields from alternating field/value arguments
    fn hset(&self, key: &[u8], field_values: &[Bytes]) -> Result<()>;

    fn hget(&self, key: &[u8], field: &[u8]) -> Result<Bytes>;

    /// Copy of every field in the hash
    fn hgetall(&self, key: &[u8]) -> Result<HashMap<Bytes, Bytes>>;

    fn hdel(&self, key: &[u8], fields: &[Bytes]) -> Result<()>;

    /// Prepend each value in turn, so `[a, b]` ends up as `b, a, ...`
    fn lpush(&self, key: &[u8], values: &[Bytes]) -> Result<()>;

    fn lpop(&self, key: &[u8]) -> Result<Bytes>;

    /// Append values in argument order
    fn rpush(&self, key: &[u8], values: &[Bytes]) -> Result<()>;

    fn rpop(&self, key: &[u8]) -> Result<Bytes>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from("abc"), Value::Bytes(Bytes::from_static(b"abc")));
        let owned = String::from("borrowed");
        assert_eq!(Value::from(owned.as_str()).to_bytes(), Bytes::from_static(b"borrowed"));
        assert_eq!(Value::from(7i64).as_integer(), Some(7));
        assert_eq!(Value::from(String::from("x")).as_integer(), None);
    }

    #[test]
    fn test_integer_renders_as_decimal() {
        assert_eq!(Value::Integer(-42).to_bytes(), Bytes::from_static(b"-42"));
    }
}
