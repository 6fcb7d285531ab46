//! Error Types
//!
//! Routine miss conditions and caller mistakes reported by the cache and file store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by cache operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("key expired: {0}")]
    KeyExpired(String),

    #[error("field '{field}' not found in hash '{key}'")]
    FieldNotFound { key: String, field: String },

    #[error("list is empty: {0}")]
    EmptyList(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no tokio runtime available to run the expiration reaper")]
    NoRuntime,
}

/// Coarse error classification shared with networked cache backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    EmptyList,
    InvalidArgument,
    Runtime,
}

impl CacheError {
    pub(crate) fn key_not_found(key: &[u8]) -> Self {
        Self::KeyNotFound(display_key(key))
    }

    pub(crate) fn key_expired(key: &[u8]) -> Self {
        Self::KeyExpired(display_key(key))
    }

    pub(crate) fn field_not_found(key: &[u8], field: &[u8]) -> Self {
        Self::FieldNotFound {
            key: display_key(key),
            field: display_key(field),
        }
    }

    pub(crate) fn empty_list(key: &[u8]) -> Self {
        Self::EmptyList(display_key(key))
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyNotFound(_) | Self::KeyExpired(_) | Self::FieldNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::EmptyList(_) => ErrorKind::EmptyList,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NoRuntime => ErrorKind::Runtime,
        }
    }

    /// True for the "nothing there" outcomes callers usually fall through on
    pub fn is_miss(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound | ErrorKind::EmptyList)
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors returned by the in-memory file store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilesError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("parent directory does not exist: {}", .0.display())]
    ParentNotFound(PathBuf),

    #[error("is a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot move a directory into itself: {}", .0.display())]
    MoveIntoSelf(PathBuf),
}

fn display_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(CacheError::key_not_found(b"a").kind(), ErrorKind::NotFound);
        assert_eq!(CacheError::key_expired(b"a").kind(), ErrorKind::NotFound);
        assert_eq!(CacheError::field_not_found(b"h", b"f").kind(), ErrorKind::NotFound);
        assert_eq!(CacheError::empty_list(b"l").kind(), ErrorKind::EmptyList);
        assert_eq!(
            CacheError::InvalidArgument("odd".into()).kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_is_miss() {
        assert!(CacheError::key_expired(b"a").is_miss());
        assert!(CacheError::empty_list(b"l").is_miss());
        assert!(!CacheError::InvalidArgument("odd".into()).is_miss());
        assert!(!CacheError::NoRuntime.is_miss());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            CacheError::field_not_found(b"user:1", b"name").to_string(),
            "field 'name' not found in hash 'user:1'"
        );
        assert_eq!(
            FilesError::NotFound(PathBuf::from("a/b.txt")).to_string(),
            "file not found: a/b.txt"
        );
    }
}
