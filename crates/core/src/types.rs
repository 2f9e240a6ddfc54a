//! Core types used throughout Field Lingo
//!
//! This module contains the small value types shared by the schema model,
//! the generators and the command line: database dialects, the position
//! policy for new columns, the apply mode and language descriptors.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::EngineError;

// ============================================================================
// Database Types
// ============================================================================

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    MySQL,
    PostgreSQL,
    SQLite,
}

impl DatabaseType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DatabaseType::MySQL => "MySQL",
            DatabaseType::PostgreSQL => "PostgreSQL",
            DatabaseType::SQLite => "SQLite",
        }
    }

    /// Whether `ADD COLUMN ... FIRST | AFTER <col>` is understood
    pub fn supports_column_positioning(&self) -> bool {
        matches!(self, DatabaseType::MySQL)
    }

    /// Quote an identifier for this dialect
    pub fn quote_identifier(&self, ident: &str) -> String {
        match self {
            DatabaseType::MySQL => format!("`{}`", ident.replace('`', "``")),
            DatabaseType::PostgreSQL | DatabaseType::SQLite => {
                format!("\"{}\"", ident.replace('"', "\"\""))
            }
        }
    }

    /// Get all database types
    pub fn all() -> &'static [DatabaseType] {
        &[
            DatabaseType::MySQL,
            DatabaseType::PostgreSQL,
            DatabaseType::SQLite,
        ]
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for DatabaseType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DatabaseType::MySQL),
            "postgres" | "postgresql" | "pgsql" => Ok(DatabaseType::PostgreSQL),
            "sqlite" => Ok(DatabaseType::SQLite),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown database dialect '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// Position Policy
// ============================================================================

/// Where a new localized column is inserted relative to its siblings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PositionPolicy {
    /// Before the whole family
    BeforeAll,
    /// After the last column of the family
    #[default]
    AfterAll,
    /// After the column with the given language suffix
    AfterLanguage(String),
}

impl PositionPolicy {
    /// Form value used in configuration files and on the command line
    pub fn value(&self) -> &str {
        match self {
            PositionPolicy::BeforeAll => "before_all",
            PositionPolicy::AfterAll => "after_all",
            PositionPolicy::AfterLanguage(code) => code,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> String {
        match self {
            PositionPolicy::BeforeAll => "Before all".to_string(),
            PositionPolicy::AfterAll => "After all".to_string(),
            PositionPolicy::AfterLanguage(code) => format!("After fields ending with _{}", code),
        }
    }

    /// The options an operator can choose from for the given base languages:
    /// before all, after each language in selection order, after all.
    pub fn options<S: AsRef<str>>(languages: &[S]) -> Vec<PositionPolicy> {
        let mut options = Vec::with_capacity(languages.len() + 2);
        options.push(PositionPolicy::BeforeAll);
        options.extend(
            languages
                .iter()
                .map(|lang| PositionPolicy::AfterLanguage(lang.as_ref().to_string())),
        );
        options.push(PositionPolicy::AfterAll);
        options
    }
}

impl std::fmt::Display for PositionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for PositionPolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(EngineError::attribute("position", "Position is required.")),
            "before_all" | "before-all" => Ok(PositionPolicy::BeforeAll),
            "after_all" | "after-all" => Ok(PositionPolicy::AfterAll),
            code => Ok(PositionPolicy::AfterLanguage(code.to_string())),
        }
    }
}

impl TryFrom<String> for PositionPolicy {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PositionPolicy> for String {
    fn from(policy: PositionPolicy) -> Self {
        policy.value().to_string()
    }
}

// ============================================================================
// Apply Mode
// ============================================================================

/// How new columns are added: statements run now, or migration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    DirectSql,
    #[default]
    Migration,
}

impl ApplyMode {
    /// Form value
    pub fn value(&self) -> &'static str {
        match self {
            ApplyMode::DirectSql => "direct_sql",
            ApplyMode::Migration => "migration",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ApplyMode::Migration => "Create migration (recommended)",
            ApplyMode::DirectSql => "Direct SQL (execute now)",
        }
    }

    /// Lenient parse: anything that is not direct SQL is a migration
    pub fn from_value(value: &str) -> Self {
        match value {
            "direct_sql" | "direct-sql" => ApplyMode::DirectSql,
            _ => ApplyMode::Migration,
        }
    }
}

impl std::fmt::Display for ApplyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

// ============================================================================
// Languages
// ============================================================================

/// A language known to the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Column suffix, e.g. "en"
    pub code: String,

    /// Display name, e.g. "English"
    pub full_name: String,

    /// Disabled languages are never offered for selection
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Operator-defined priority (ascending)
    #[serde(default)]
    pub order: i32,
}

fn default_enabled() -> bool {
    true
}

impl Language {
    /// Create an enabled language
    pub fn new(code: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            full_name: full_name.into(),
            enabled: true,
            order: 0,
        }
    }

    /// Set the order
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Mark as disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Label shown in selection lists: "en (English)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.code, self.full_name)
    }
}

// ============================================================================
// Tests
// ============================================================================
