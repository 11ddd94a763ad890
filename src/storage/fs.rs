//! Filesystem blob store: one file per key below a root directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use super::BlobStore;
use crate::error::StoreError;

/// A blob store backed by a directory tree.
///
/// Keys are `/`-separated relative paths. Keys that would escape the
/// root (absolute paths, `..` components) are rejected. A `put` replaces
/// the whole file at once, so readers see either the old or the new body.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Creates a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(StoreError::Backend {
                key: key.to_string(),
                reason: "key escapes the store root".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    fn collect_keys(&self, dir: &Path, keys: &mut Vec<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.collect_keys(&path, keys)?;
            } else if let Ok(relative) = path.strip_prefix(&self.root) {
                let key: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                keys.push(key.join("/"));
            }
        }
        Ok(())
    }
}

fn io_error(key: &str, err: io::Error) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound(key.to_string())
    } else {
        StoreError::Backend {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent).map_err(|e| io_error(key, e))?;

        // Stage beside the target, then rename over it.
        let mut staged = NamedTempFile::new_in(parent).map_err(|e| io_error(key, e))?;
        staged.write_all(body).map_err(|e| io_error(key, e))?;
        staged.persist(&path).map_err(|e| io_error(key, e.error))?;
        debug!(key, content_type, size = body.len(), "Wrote blob");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        fs::read(self.path_for(key)?).map_err(|e| io_error(key, e))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        match self.collect_keys(&self.root, &mut keys) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(keys),
            Err(e) => return Err(io_error(prefix, e)),
        }
        keys.retain(|k| k.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        fs::remove_file(self.path_for(key)?).map_err(|e| io_error(key, e))
    }
}
