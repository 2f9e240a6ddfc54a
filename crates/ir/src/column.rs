//! Column definitions
//!
//! A `Column` is an immutable snapshot of one database column as reported
//! by schema introspection: its name, declared type and nullability.

use lingo_core::{EngineError, EngineResult, Validatable};
use serde::{Deserialize, Serialize};

// ============================================================================
// Column
// ============================================================================

/// Represents a single table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, e.g. "title_en"
    pub name: String,

    /// Declared, dialect-specific type, e.g. "varchar(255)"
    #[serde(rename = "type")]
    pub db_type: String,

    /// Whether the column accepts NULL
    #[serde(rename = "nullable", default)]
    pub allow_null: bool,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, db_type: impl Into<String>, allow_null: bool) -> Self {
        Self {
            name: name.into(),
            db_type: db_type.into(),
            allow_null,
        }
    }

    /// Create a NOT NULL column
    pub fn not_null(name: impl Into<String>, db_type: impl Into<String>) -> Self {
        Self::new(name, db_type, false)
    }

    /// Create a nullable column
    pub fn nullable(name: impl Into<String>, db_type: impl Into<String>) -> Self {
        Self::new(name, db_type, true)
    }

    /// `NULL` or `NOT NULL`
    pub fn null_keyword(&self) -> &'static str {
        if self.allow_null { "NULL" } else { "NOT NULL" }
    }

    /// Split the name on its last underscore into `(base, suffix)`.
    ///
    /// Returns `None` for names without an underscore.
    pub fn split_suffix(&self) -> Option<(&str, &str)> {
        self.name.rsplit_once('_')
    }
}

impl Validatable for Column {
    fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::validation("Column name cannot be empty"));
        }
        if self.db_type.trim().is_empty() {
            return Err(EngineError::validation(format!(
                "Column '{}' has no declared type",
                self.name
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_keyword() {
        assert_eq!(Column::not_null("id", "int(11)").null_keyword(), "NOT NULL");
        assert_eq!(Column::nullable("note", "text").null_keyword(), "NULL");
    }

    #[test]
    fn test_split_on_last_underscore() {
        let column = Column::not_null("page_title_en", "varchar(255)");
        assert_eq!(column.split_suffix(), Some(("page_title", "en")));

        let column = Column::not_null("id", "int(11)");
        assert_eq!(column.split_suffix(), None);

        let column = Column::not_null("title_", "varchar(255)");
        assert_eq!(column.split_suffix(), Some(("title", "")));
    }

    #[test]
    fn test_serde_names() {
        let column: Column =
            serde_json::from_str(r#"{"name":"title_en","type":"varchar(255)"}"#).unwrap();
        assert_eq!(column.db_type, "varchar(255)");
        assert!(!column.allow_null);

        let json = serde_json::to_string(&Column::nullable("note", "text")).unwrap();
        assert_eq!(json, r#"{"name":"note","type":"text","nullable":true}"#);
    }

    #[test]
    fn test_validation() {
        assert!(Column::not_null("id", "int").is_valid());
        assert!(!Column::not_null("", "int").is_valid());
        assert!(!Column::not_null("id", " ").is_valid());
    }
}
