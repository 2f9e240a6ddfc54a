//! Core traits for Field Lingo
//!
//! This module defines the validation and persistence behaviours shared by
//! the workspace, and the collaborator contracts the generators depend on:
//! language registries, session stores, statement executors and clocks.
//! Implementations are injected explicitly; nothing here reaches for global
//! state.

use crate::error::{EngineError, EngineResult};
use crate::types::Language;
use serde::{Serialize, de::DeserializeOwned};

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use lingo_core::{Validatable, EngineResult, EngineError};
///
/// struct Selection {
///     suffix: String,
/// }
///
/// impl Validatable for Selection {
///     fn validate(&self) -> EngineResult<()> {
///         if self.suffix.is_empty() {
///             return Err(EngineError::validation("Suffix cannot be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or an `EngineError` describing the problem.
    fn validate(&self) -> EngineResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Persistable Trait
// ============================================================================

/// Trait for types that can be serialized to and deserialized from files
///
/// Types implementing this trait can be saved to and loaded from
/// JSON documents on disk (schema snapshots, session files).
pub trait Persistable: Serialize + DeserializeOwned + Sized {
    /// Get the file extension for this type (without the dot)
    fn file_extension() -> &'static str;

    /// Save to a JSON string
    fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Load from a JSON string
    fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Save to a file, creating parent directories as needed
    fn save_to_file(&self, path: &std::path::Path) -> EngineResult<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }
        }
        std::fs::write(path, json).map_err(|e| EngineError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from a file
    fn load_from_file(path: &std::path::Path) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// Source of the languages an operator may select as base languages
pub trait LanguageRegistry {
    /// All languages, enabled or not
    fn languages(&self) -> Vec<Language>;

    /// Enabled languages ordered by their priority
    fn list_enabled_languages(&self) -> Vec<Language> {
        let mut enabled: Vec<Language> =
            self.languages().into_iter().filter(|l| l.enabled).collect();
        enabled.sort_by_key(|l| l.order);
        enabled
    }

    /// Codes of the enabled languages, in priority order
    fn enabled_codes(&self) -> Vec<String> {
        self.list_enabled_languages()
            .into_iter()
            .map(|l| l.code)
            .collect()
    }
}

/// Session-scoped key-value store.
///
/// Keys never leak between sessions; a store instance represents exactly
/// one session.
pub trait SessionStore {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&mut self, key: &str, value: String);

    /// Remove a value, returning the previous one
    fn remove(&mut self, key: &str) -> Option<String>;

    /// Forget everything stored in this session
    fn clear(&mut self);

    /// Persist pending writes
    fn flush(&mut self) -> EngineResult<()> {
        Ok(())
    }
}

/// Runs a single SQL statement against live infrastructure
#[async_trait::async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Execute one statement. Failures are reported as
    /// [`EngineError::Execution`].
    async fn execute(&self, sql: &str) -> EngineResult<()>;
}

/// Source of the current time as a unix timestamp (seconds)
pub trait Clock {
    fn now_timestamp(&self) -> i64;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_timestamp(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_timestamp(&self) -> i64 {
        self.0
    }
}

// ============================================================================
// Tests
// ============================================================================
