//! Pluggable content store backing all persistence.
//!
//! Everything the service writes (uploaded assets, rendered certificates,
//! the static verification site, batch archives) goes through a
//! [`ContentStore`] keyed by relative `/`-separated paths, so the backend
//! (local disk in production, memory in tests) is swappable without touching
//! the pipeline.

mod disk;
mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur during content store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No entry exists under the requested key.
    #[error("not found: {0}")]
    NotFound(String),
    /// The key is empty, absolute, or contains traversal segments.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Flat key/value content store.
///
/// Keys are relative `/`-separated paths such as `templates/cert.png`.
/// `put` overwrites silently (last write wins) and creates any intermediate
/// directories the backend needs.
pub trait ContentStore: Send + Sync {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// List every key under the directory named by `prefix`, sorted
    /// lexicographically. A prefix with no entries yields an empty list.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Reject keys that could escape the store root.
///
/// Applied by every backend before any path construction; identifiers coming
/// from URLs never reach the filesystem unvalidated.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains('\0')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
