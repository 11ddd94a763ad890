//! Timetable persistence.
//!
//! Schedules are stored as JSON blobs in a key-value store under
//! `<prefix>/<department>/<kind>_timetable[_<faculty>].json`.
//!
//! The store itself is a collaborator behind the [`BlobStore`] trait.
//! Two backends ship with the crate: [`MemoryBlobStore`] and
//! [`FsBlobStore`]. Neither coordinates concurrent writers; the last
//! write to a key wins.

mod fs;
mod gateway;
mod memory;

pub use fs::FsBlobStore;
pub use gateway::{sanitize_faculty_name, TimetableStore, DEFAULT_KEY_PREFIX, JSON_CONTENT_TYPE};
pub use memory::MemoryBlobStore;

use crate::error::StoreError;

/// A key-value blob store.
pub trait BlobStore: Send + Sync {
    /// Writes `body` under `key`, replacing any previous value.
    fn put(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StoreError>;

    /// Reads the value under `key`; `StoreError::NotFound` when absent.
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Keys starting with `prefix`, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Removes `key`; `StoreError::NotFound` when absent.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

impl<B: BlobStore + ?Sized> BlobStore for Box<B> {
    fn put(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StoreError> {
        (**self).put(key, body, content_type)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(key)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        (**self).list(prefix)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}
