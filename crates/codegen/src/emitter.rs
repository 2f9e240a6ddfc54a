//! # Column Spec Emitter
//!
//! Turns a localized family plus a position policy into a [`ColumnSpec`]:
//! the name, type and placement of the column to add. Both output adapters
//! render from the same `ColumnSpec`, which keeps them interchangeable.
//!
//! ## Placement
//!
//! ```text
//! columns: id, title_en, title_fr, created_at      family: title_en, title_fr
//!
//! BeforeAll         -> AFTER id        (column before the family)
//! AfterAll          -> AFTER title_fr  (last family column)
//! AfterLanguage(en) -> AFTER title_en  (resolved template column)
//! ```
//!
//! When the family starts the table, `BeforeAll` yields `FIRST`.

use lingo_core::{DatabaseType, EngineError, EngineResult, PositionPolicy};
use lingo_ir::Table;
use serde::Serialize;

use crate::discovery::LocalizedFamily;
use crate::resolver::resolve_source_column;

// ============================================================================
// PositionClause
// ============================================================================

/// Where the new column goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "column")]
pub enum PositionClause {
    /// Very first column of the table
    First,
    /// Immediately after the named column
    After(String),
}

impl PositionClause {
    /// Render as SQL, e.g. `` AFTER `title_fr` ``
    pub fn to_sql(&self, dialect: DatabaseType) -> String {
        match self {
            PositionClause::First => "FIRST".to_string(),
            PositionClause::After(column) => {
                format!("AFTER {}", dialect.quote_identifier(column))
            }
        }
    }
}

// ============================================================================
// ColumnSpec
// ============================================================================

/// Everything needed to add one localized column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    /// Table receiving the column
    pub table: String,

    /// New column name, `{base}_{suffix}`
    pub name: String,

    /// Declared type, copied from the template column
    pub db_type: String,

    /// Nullability, copied from the template column
    pub allow_null: bool,

    /// Placement of the new column
    pub position: PositionClause,

    /// Template column the type was copied from
    pub source_column: String,
}

impl ColumnSpec {
    /// `NULL` or `NOT NULL`
    pub fn null_keyword(&self) -> &'static str {
        if self.allow_null { "NULL" } else { "NOT NULL" }
    }

    /// Render the `ALTER TABLE ... ADD COLUMN` statement.
    ///
    /// The position clause is only emitted for dialects that understand it.
    pub fn to_alter_sql(&self, dialect: DatabaseType) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {} {}",
            dialect.quote_identifier(&self.table),
            dialect.quote_identifier(&self.name),
            self.db_type,
            self.null_keyword(),
        );
        if dialect.supports_column_positioning() {
            sql.push(' ');
            sql.push_str(&self.position.to_sql(dialect));
        }
        sql.push(';');
        sql
    }

    /// `DROP COLUMN` statement reverting [`to_alter_sql`](Self::to_alter_sql)
    pub fn to_drop_sql(&self, dialect: DatabaseType) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {};",
            dialect.quote_identifier(&self.table),
            dialect.quote_identifier(&self.name),
        )
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Build the [`ColumnSpec`] for adding `new_suffix` to `family`.
///
/// Fails with [`EngineError::SourceUnresolved`] when no template column can
/// be resolved or the resolved column is not part of the table.
pub fn emit(
    table: &Table,
    family: &LocalizedFamily,
    new_suffix: &str,
    policy: &PositionPolicy,
) -> EngineResult<ColumnSpec> {
    let source = resolve_source_column(table, family, policy)
        .and_then(|name| table.column(name))
        .ok_or_else(|| EngineError::source_unresolved(&table.name, &family.base_name))?;

    let position = match policy {
        PositionPolicy::BeforeAll => {
            let first = family.first().unwrap_or(source.name.as_str());
            match table.column_before(first) {
                Some(previous) => PositionClause::After(previous.name.clone()),
                None => PositionClause::First,
            }
        }
        PositionPolicy::AfterAll | PositionPolicy::AfterLanguage(_) => {
            PositionClause::After(source.name.clone())
        }
    };

    Ok(ColumnSpec {
        table: table.name.clone(),
        name: family.column_for(new_suffix),
        db_type: source.db_type.clone(),
        allow_null: source.allow_null,
        position,
        source_column: source.name.clone(),
    })
}

// ============================================================================
// Tests
// ============================================================================
