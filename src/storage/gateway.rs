//! JSON persistence of schedules over a blob store.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, instrument, warn};

use super::BlobStore;
use crate::config::StorageConfig;
use crate::department::Department;
use crate::error::StoreError;
use crate::models::{Timetable, TimetableKind};

/// Default root of every timetable key.
pub const DEFAULT_KEY_PREFIX: &str = "timetable_generation";

/// Content type of stored payloads.
pub const JSON_CONTENT_TYPE: &str = "application/json";

const MAX_FACULTY_KEY_LEN: usize = 128;

static UNSAFE_KEY_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("static pattern is valid"));

/// Storage-key-safe form of a faculty name.
///
/// Every character outside word characters, whitespace and `-` becomes
/// `_`, as do spaces and commas; the result is cut to 128 characters.
/// An empty name maps to `unknown_faculty`.
pub fn sanitize_faculty_name(name: &str) -> String {
    if name.is_empty() {
        return "unknown_faculty".to_string();
    }
    UNSAFE_KEY_CHARS
        .replace_all(name, "_")
        .replace([' ', ','], "_")
        .chars()
        .take(MAX_FACULTY_KEY_LEN)
        .collect()
}

/// Reads and writes schedules as JSON under deterministic keys.
#[derive(Debug)]
pub struct TimetableStore<B> {
    backend: B,
    key_prefix: String,
    content_type: String,
}

impl<B: BlobStore> TimetableStore<B> {
    /// Creates a gateway with the default key prefix.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            content_type: JSON_CONTENT_TYPE.to_string(),
        }
    }

    /// Creates a gateway from storage settings.
    pub fn from_config(backend: B, config: &StorageConfig) -> Self {
        Self::new(backend)
            .with_key_prefix(config.key_prefix.clone())
            .with_content_type(config.content_type.clone())
    }

    /// Sets the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Sets the content type recorded with each payload.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Underlying blob store.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Storage key for a schedule.
    ///
    /// `<prefix>/<department>/<kind>_timetable[_<sanitized faculty>].json`
    pub fn key(&self, department: &Department, kind: TimetableKind, faculty: Option<&str>) -> String {
        match faculty {
            Some(name) => format!(
                "{}/{}/{}_timetable_{}.json",
                self.key_prefix,
                department,
                kind,
                sanitize_faculty_name(name)
            ),
            None => format!("{}/{}/{}_timetable.json", self.key_prefix, department, kind),
        }
    }

    /// Stores a schedule and returns its key.
    ///
    /// An empty payload is not written; the returned key is then empty.
    #[instrument(skip(self, payload), fields(kind = %T::KIND))]
    pub fn put<T: Timetable>(
        &self,
        department: &Department,
        payload: &T,
        faculty: Option<&str>,
    ) -> Result<String, StoreError> {
        if payload.is_empty() {
            warn!(
                kind = %T::KIND,
                faculty = faculty.unwrap_or("all"),
                %department,
                "Refusing to store empty timetable"
            );
            return Ok(String::new());
        }

        let key = self.key(department, T::KIND, faculty);
        let body = serde_json::to_vec(payload).map_err(|e| StoreError::Codec {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.backend.put(&key, &body, &self.content_type)?;
        info!(key = %key, size = body.len(), "Timetable stored");
        Ok(key)
    }

    /// Loads a schedule; a missing key yields the empty schedule.
    #[instrument(skip(self), fields(kind = %T::KIND))]
    pub fn get<T: Timetable>(
        &self,
        department: &Department,
        faculty: Option<&str>,
    ) -> Result<T, StoreError> {
        let key = self.key(department, T::KIND, faculty);
        let body = match self.backend.get(&key) {
            Ok(body) => body,
            Err(e) if e.is_not_found() => {
                warn!(key = %key, "Timetable not found");
                return Ok(T::default());
            }
            Err(e) => return Err(e),
        };

        let timetable: T = serde_json::from_slice(&body).map_err(|e| StoreError::Codec {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        if timetable.is_empty() {
            warn!(key = %key, "Empty timetable fetched");
        }
        Ok(timetable)
    }

    /// Keys stored for a department.
    pub fn list(&self, department: &Department) -> Result<Vec<String>, StoreError> {
        self.backend
            .list(&format!("{}/{}/", self.key_prefix, department))
    }

    /// Removes one stored schedule.
    pub fn delete(
        &self,
        department: &Department,
        kind: TimetableKind,
        faculty: Option<&str>,
    ) -> Result<(), StoreError> {
        self.backend.delete(&self.key(department, kind, faculty))
    }
}
