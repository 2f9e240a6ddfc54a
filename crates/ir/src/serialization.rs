//! Serialization and deserialization of schema snapshots
//!
//! Schema snapshots are JSON documents, either wrapped in a versioned
//! [`SchemaFile`] envelope or written as a bare [`Schema`] (as produced by
//! hand or by other introspection tools).

use crate::{SCHEMA_VERSION, Schema};
use lingo_core::{EngineError, EngineResult, Persistable, Validatable};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Constants
// ============================================================================

/// File extension for schema snapshots
pub const SCHEMA_EXTENSION: &str = "json";

// ============================================================================
// Schema File Wrapper
// ============================================================================

/// Wrapper for schema files that includes version information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Snapshot format version
    pub schema_version: u32,

    /// The schema data
    pub schema: Schema,
}

impl SchemaFile {
    /// Wrap a schema with the current version
    pub fn new(schema: Schema) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            schema,
        }
    }

    /// Reject snapshots written by a newer version of the tool
    pub fn check_version(&self) -> EngineResult<()> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(EngineError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found: self.schema_version,
            });
        }
        Ok(())
    }
}

impl Persistable for SchemaFile {
    fn file_extension() -> &'static str {
        SCHEMA_EXTENSION
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Save a schema snapshot to a file
pub fn save_schema(schema: &Schema, path: impl AsRef<Path>) -> EngineResult<()> {
    SchemaFile::new(schema.clone()).save_to_file(path.as_ref())
}

/// Save a schema snapshot to a JSON string
pub fn save_schema_to_string(schema: &Schema) -> EngineResult<String> {
    SchemaFile::new(schema.clone()).to_json()
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a schema snapshot from a file
///
/// The loaded schema is validated: duplicate tables or columns are rejected.
pub fn load_schema(path: impl AsRef<Path>) -> EngineResult<Schema> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EngineError::FileRead {
            path: path.to_path_buf(),
            message: "file does not exist".to_string(),
        });
    }

    let json = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_schema_from_string(&json).map_err(|e| match e {
        EngineError::JsonSerialization(je) => EngineError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid schema file format: {}", je),
        },
        other => other,
    })
}

/// Load a schema snapshot from a JSON string
///
/// A document carrying `schema_version` must be a complete [`SchemaFile`];
/// anything else must be a bare schema with a `tables` array.
pub fn load_schema_from_string(json: &str) -> EngineResult<Schema> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let Some(object) = value.as_object() else {
        return Err(EngineError::InvalidSchemaFormat(
            "expected a JSON object".to_string(),
        ));
    };

    let schema = if object.contains_key("schema_version") {
        let file: SchemaFile = serde_json::from_value(value)?;
        file.check_version()?;
        file.schema
    } else if object.contains_key("tables") {
        serde_json::from_value::<Schema>(value)?
    } else {
        return Err(EngineError::InvalidSchemaFormat(
            "expected a 'tables' array or a versioned snapshot".to_string(),
        ));
    };

    schema.validate()?;
    Ok(schema)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, Table};
    use tempfile::TempDir;

    fn sample() -> Schema {
        Schema::new().with_table(Table::new("post").with_columns([
            Column::not_null("id", "int(11)"),
            Column::not_null("title_en", "varchar(255)"),
        ]))
    }

    #[test]
    fn test_save_and_load_schema() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("schema.json");

        save_schema(&sample(), &path).unwrap();
        assert!(path.exists());

        let loaded = load_schema(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_load_bare_schema() {
        let json = r#"{
            "tables": [
                {"name": "post", "columns": [
                    {"name": "id", "type": "int(11)"},
                    {"name": "title_en", "type": "varchar(255)", "nullable": false}
                ]}
            ]
        }"#;
        let schema = load_schema_from_string(json).unwrap();
        assert_eq!(schema, sample());
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let json = r#"{"schema_version": 99, "schema": {"tables": []}}"#;
        let err = load_schema_from_string(json).unwrap_err();
        assert!(matches!(
            err,
            EngineError::SchemaVersionMismatch { found: 99, .. }
        ));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_schema("/nonexistent/path/schema.json");
        assert!(matches!(result, Err(EngineError::FileRead { .. })));
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        match load_schema(&path) {
            Err(EngineError::FileRead { message, .. }) => {
                assert!(message.starts_with("Invalid schema file format"));
            }
            other => panic!("Expected FileRead error, got {:?}", other),
        }
    }

    #[test]
    fn test_string_roundtrip_is_wrapped() {
        let json = save_schema_to_string(&sample()).unwrap();
        assert!(json.contains("\"schema_version\": 1"));
        assert_eq!(load_schema_from_string(&json).unwrap(), sample());
    }

    #[test]
    fn test_malformed_envelope_is_an_error() {
        // Column without a type inside a versioned snapshot
        let json = r#"{"schema_version": 1, "schema": {"tables": [
            {"name": "post", "columns": [{"name": "title_en"}]}
        ]}}"#;
        let err = load_schema_from_string(json).unwrap_err();
        assert!(matches!(err, EngineError::JsonSerialization(_)));
    }

    #[test]
    fn test_unrelated_document_is_an_error() {
        for json in [r#"{"foo": 1}"#, "[]", "42"] {
            let err = load_schema_from_string(json).unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidSchemaFormat(_)),
                "{json} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_duplicate_columns_are_rejected() {
        let json = r#"{"tables": [{"name": "post", "columns": [
            {"name": "title_en", "type": "varchar(255)"},
            {"name": "title_en", "type": "varchar(255)"}
        ]}]}"#;
        let err = load_schema_from_string(json).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_duplicate_tables_are_rejected_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("schema.json");
        std::fs::write(
            &path,
            r#"{"tables": [{"name": "post", "columns": []}, {"name": "post", "columns": []}]}"#,
        )
        .unwrap();

        let err = load_schema(&path).unwrap_err();
        assert!(err.to_string().contains("Duplicate table 'post'"));
    }

    #[test]
    fn test_empty_table_list_is_accepted() {
        let schema = load_schema_from_string(r#"{"tables": []}"#).unwrap();
        assert_eq!(schema.table_count(), 0);
    }
}
