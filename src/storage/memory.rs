//! Process-local blob store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::BlobStore;
use crate::error::StoreError;

#[derive(Debug, Clone)]
struct StoredObject {
    body: Vec<u8>,
    content_type: String,
}

/// An in-memory blob store.
///
/// Contents live as long as the value; nothing is written to disk.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl MemoryBlobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Content type recorded for a key.
    pub fn content_type(&self, key: &str) -> Result<Option<String>, StoreError> {
        let objects = self.objects.read().map_err(|_| poisoned(key))?;
        Ok(objects.get(key).map(|o| o.content_type.clone()))
    }

    /// Number of stored objects.
    pub fn len(&self) -> Result<usize, StoreError> {
        let objects = self.objects.read().map_err(|_| poisoned(""))?;
        Ok(objects.len())
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned(key: &str) -> StoreError {
    StoreError::Backend {
        key: key.to_string(),
        reason: "store lock poisoned".to_string(),
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StoreError> {
        let mut objects = self.objects.write().map_err(|_| poisoned(key))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                body: body.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let objects = self.objects.read().map_err(|_| poisoned(key))?;
        objects
            .get(key)
            .map(|o| o.body.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let objects = self.objects.read().map_err(|_| poisoned(prefix))?;
        Ok(objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut objects = self.objects.write().map_err(|_| poisoned(key))?;
        objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}
