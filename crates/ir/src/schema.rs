//! Schema snapshots and the schema provider contract

use crate::table::Table;
use lingo_core::{EngineError, EngineResult, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Anything able to list the tables of a database, columns in declaration
/// order
pub trait SchemaProvider {
    fn list_tables(&self) -> EngineResult<Vec<Table>>;
}

/// An in-memory schema snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Tables in provider order
    pub tables: Vec<Table>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema from tables
    pub fn from_tables(tables: impl IntoIterator<Item = Table>) -> Self {
        Self {
            tables: tables.into_iter().collect(),
        }
    }

    /// Add a table (builder style)
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Look up a table, failing with [`EngineError::TableNotFound`]
    pub fn require_table(&self, name: &str) -> EngineResult<&Table> {
        self.table(name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))
    }

    /// Keep only the named tables, preserving schema order
    pub fn retain_tables<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        if !names.is_empty() {
            self.tables
                .retain(|t| names.iter().any(|n| n.as_ref() == t.name));
        }
        self
    }

    /// Number of tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

impl SchemaProvider for Schema {
    fn list_tables(&self) -> EngineResult<Vec<Table>> {
        Ok(self.tables.clone())
    }
}

impl Validatable for Schema {
    fn validate(&self) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for table in &self.tables {
            table.validate()?;
            if !seen.insert(table.name.as_str()) {
                return Err(EngineError::validation(format!(
                    "Duplicate table '{}'",
                    table.name
                )));
            }
        }
        Ok(())
    }

    fn validation_errors(&self) -> Vec<String> {
        let mut errors: Vec<String> = self
            .tables
            .iter()
            .filter_map(|t| t.validate().err())
            .map(|e| e.to_string())
            .collect();
        let mut seen = HashSet::new();
        for table in &self.tables {
            if !seen.insert(table.name.as_str()) {
                errors.push(format!("Validation error: Duplicate table '{}'", table.name));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;

    fn schema() -> Schema {
        Schema::new()
            .with_table(Table::new("post").with_column(Column::not_null("id", "int(11)")))
            .with_table(Table::new("page").with_column(Column::not_null("id", "int(11)")))
    }

    #[test]
    fn test_provider_preserves_order() {
        let tables = schema().list_tables().unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["post", "page"]);
    }

    #[test]
    fn test_require_table() {
        let schema = schema();
        assert!(schema.require_table("post").is_ok());
        assert!(matches!(
            schema.require_table("user"),
            Err(EngineError::TableNotFound(name)) if name == "user"
        ));
    }

    #[test]
    fn test_retain_tables() {
        let only_page = schema().retain_tables(&["page"]);
        assert_eq!(only_page.table_count(), 1);
        assert_eq!(only_page.tables[0].name, "page");

        let none_selected: &[&str] = &[];
        assert_eq!(schema().retain_tables(none_selected).table_count(), 2);
    }

    #[test]
    fn test_duplicate_tables() {
        let schema = schema().with_table(Table::new("post"));
        assert!(!schema.is_valid());
        assert_eq!(schema.validation_errors().len(), 1);
    }
}
