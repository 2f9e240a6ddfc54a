//! Error types for Field Lingo
//!
//! This module provides unified error handling across the workspace:
//! selection and validation errors, per-family generation outcomes,
//! statement execution failures, IO and serialization errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Field Lingo
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A single request attribute failed validation
    #[error("Invalid value for '{attribute}': {message}")]
    AttributeValidation { attribute: String, message: String },

    /// Language selection or suffix is unusable; the run produces nothing
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    // ========================================================================
    // Generation Outcomes
    // ========================================================================
    /// No usable template/anchor column for a localized family
    #[error("No source column could be resolved for '{table}.{base}_*'")]
    SourceUnresolved { table: String, base: String },

    /// The column to be added is already present in the table
    #[error("Column '{table}.{column}' already exists")]
    TargetAlreadyExists { table: String, column: String },

    /// Table not found in the schema
    #[error("Table not found: {0}")]
    TableNotFound(String),

    // ========================================================================
    // Database Errors
    // ========================================================================
    /// Executing a statement against the database failed
    #[error("Failed to execute '{statement}': {message}")]
    Execution { statement: String, message: String },

    /// Reading the schema failed
    #[error("Failed to read schema: {0}")]
    SchemaRead(String),

    /// Database connection failed
    #[error("Database connection failed: {0}")]
    Connection(String),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Invalid schema file format
    #[error("Invalid schema file format: {0}")]
    InvalidSchemaFormat(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected at most {expected}, found {found}")]
    SchemaVersionMismatch { expected: u32, found: u32 },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Session store failure
    #[error("Session error: {0}")]
    Session(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl EngineError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Create an attribute validation error
    pub fn attribute(attribute: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::AttributeValidation {
            attribute: attribute.into(),
            message: msg.into(),
        }
    }

    /// Create an invalid selection error
    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        EngineError::InvalidSelection(msg.into())
    }

    /// Create a source-unresolved error
    pub fn source_unresolved(table: impl Into<String>, base: impl Into<String>) -> Self {
        EngineError::SourceUnresolved {
            table: table.into(),
            base: base.into(),
        }
    }

    /// Create a target-already-exists error
    pub fn target_exists(table: impl Into<String>, column: impl Into<String>) -> Self {
        EngineError::TargetAlreadyExists {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create an execution error
    pub fn execution(statement: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::Execution {
            statement: statement.into(),
            message: msg.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_)
                | EngineError::AttributeValidation { .. }
                | EngineError::InvalidSelection(_)
        )
    }

    /// Check if this error only affects a single localized family.
    ///
    /// Such errors are recorded in the run bookkeeping and never abort
    /// a generation run.
    pub fn is_family_local(&self) -> bool {
        matches!(
            self,
            EngineError::SourceUnresolved { .. } | EngineError::TargetAlreadyExists { .. }
        )
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_error() {
        let err = EngineError::validation("Suffix is required");
        assert!(err.is_validation());
        assert!(!err.is_family_local());
        assert_eq!(err.to_string(), "Validation error: Suffix is required");
    }

    #[test]
    fn test_attribute_error() {
        let err = EngineError::attribute("languages", "Please select at least one base language.");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Invalid value for 'languages': Please select at least one base language."
        );
    }

    #[test]
    fn test_family_local_errors() {
        let err = EngineError::source_unresolved("post", "title");
        assert!(err.is_family_local());
        assert_eq!(
            err.to_string(),
            "No source column could be resolved for 'post.title_*'"
        );

        let err = EngineError::target_exists("post", "title_de");
        assert!(err.is_family_local());
        assert_eq!(err.to_string(), "Column 'post.title_de' already exists");
    }

    #[test]
    fn test_execution_error() {
        let err = EngineError::execution("ALTER TABLE x", "Duplicate column name");
        assert!(!err.is_validation());
        assert_eq!(
            err.to_string(),
            "Failed to execute 'ALTER TABLE x': Duplicate column name"
        );
    }

    #[test]
    fn test_error_with_context() {
        let err = EngineError::with_context("Loading schema", "Permission denied");
        assert_eq!(err.to_string(), "Loading schema: Permission denied");
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Table>("key = ").unwrap_err();
        let err: EngineError = toml_err.into();
        assert!(err.to_string().starts_with("TOML parse error:"));
    }
}
