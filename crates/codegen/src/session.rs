//! # Session State
//!
//! Migration file names embed a timestamp. A preview and the following
//! write of the same request must agree on it, so the timestamp is stored
//! in a session the first time it is needed and reused afterwards until
//! the session is cleared.
//!
//! - [`MemorySession`]: lives as long as the process
//! - [`FileSession`]: one JSON document per session id, so separate CLI
//!   invocations can share a session
//! - [`TimestampCache`]: the `(table, column)` keyed view used by the
//!   migration adapter

use chrono::{DateTime, Utc};
use lingo_core::{Clock, EngineError, EngineResult, Persistable, SessionStore};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

// ============================================================================
// MemorySession
// ============================================================================

/// In-process session store
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    values: HashMap<String, String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

// ============================================================================
// FileSession
// ============================================================================

/// On-disk representation of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Session identifier
    pub session_id: String,

    /// Last time the session was written
    pub updated_at: DateTime<Utc>,

    /// Stored values
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl Persistable for SessionDocument {
    fn file_extension() -> &'static str {
        "json"
    }
}

/// Session store persisted as `<dir>/<session id>.json`
#[derive(Debug, Clone)]
pub struct FileSession {
    id: String,
    path: PathBuf,
    values: BTreeMap<String, String>,
    dirty: bool,
}

impl FileSession {
    /// Open (or start) the session `id` inside `dir`.
    ///
    /// Session ids may only contain ASCII letters, digits, `-` and `_`.
    pub fn open(dir: impl AsRef<Path>, id: &str) -> EngineResult<Self> {
        let path = Self::path_for(dir.as_ref(), id)?;
        let values = if path.exists() {
            SessionDocument::load_from_file(&path)?.values
        } else {
            BTreeMap::new()
        };

        tracing::debug!(session = id, entries = values.len(), "session opened");

        Ok(Self {
            id: id.to_string(),
            path,
            values,
            dirty: false,
        })
    }

    /// Delete the session file. Returns whether a file was removed.
    pub fn destroy(dir: impl AsRef<Path>, id: &str) -> EngineResult<bool> {
        let path = Self::path_for(dir.as_ref(), id)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path).map_err(|e| EngineError::FileWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(true)
    }

    /// Session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Location of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_for(dir: &Path, id: &str) -> EngineResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(EngineError::Session(format!(
                "invalid session id '{}': use letters, digits, '-' or '_'",
                id
            )));
        }
        Ok(dir.join(format!("{}.{}", id, SessionDocument::file_extension())))
    }
}

impl SessionStore for FileSession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
        self.dirty = true;
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        let previous = self.values.remove(key);
        self.dirty |= previous.is_some();
        previous
    }

    fn clear(&mut self) {
        self.dirty |= !self.values.is_empty();
        self.values.clear();
    }

    fn flush(&mut self) -> EngineResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let document = SessionDocument {
            session_id: self.id.clone(),
            updated_at: Utc::now(),
            values: self.values.clone(),
        };
        document.save_to_file(&self.path)?;
        self.dirty = false;
        tracing::debug!(session = %self.id, path = %self.path.display(), "session saved");
        Ok(())
    }
}

// ============================================================================
// TimestampCache
// ============================================================================

/// Session-backed migration timestamps keyed by `(table, column)`
pub struct TimestampCache<'a> {
    store: &'a mut dyn SessionStore,
    clock: &'a dyn Clock,
}

impl<'a> TimestampCache<'a> {
    pub fn new(store: &'a mut dyn SessionStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Session key for a `(table, column)` pair
    pub fn key(table: &str, column: &str) -> String {
        format!("migration_ts:{}:{}", table, column)
    }

    /// The timestamp for `(table, column)`, created on first use
    pub fn timestamp_for(&mut self, table: &str, column: &str) -> i64 {
        let key = Self::key(table, column);
        if let Some(stored) = self.store.get(&key) {
            match stored.parse::<i64>() {
                Ok(ts) => return ts,
                Err(_) => {
                    tracing::warn!(key = %key, value = %stored, "discarding unreadable session timestamp");
                }
            }
        }

        let ts = self.clock.now_timestamp();
        self.store.set(&key, ts.to_string());
        ts
    }

    /// Forget the timestamp of `(table, column)`
    pub fn forget(&mut self, table: &str, column: &str) {
        self.store.remove(&Self::key(table, column));
    }
}

// ============================================================================
// Tests
// ============================================================================
