//! Migration adapter
//!
//! Produces one Yii migration class per family. File and class names follow
//! the migration runner's convention:
//!
//! ```text
//! m<YYMMDD_HHMMSS>_add_<column>_to_<table>
//! ```
//!
//! The timestamp comes from the session so that previewing a request and
//! then writing it yields the same names.

use chrono::DateTime;
use lingo_core::{
    ApplyMode, Clock, DatabaseType, EngineError, EngineResult, PositionPolicy, SessionStore,
};
use lingo_ir::Table;

use super::Adapter;
use crate::column_hint::migration_type_hint;
use crate::discovery::LocalizedFamily;
use crate::emitter::{ColumnSpec, emit};
use crate::session::TimestampCache;
use crate::{Artifact, GeneratorConfig};

/// Renders migration classes adding localized columns
pub struct MigrationAdapter<'a> {
    config: GeneratorConfig,
    timestamps: TimestampCache<'a>,
}

impl<'a> MigrationAdapter<'a> {
    pub fn new(
        config: GeneratorConfig,
        session: &'a mut dyn SessionStore,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            config,
            timestamps: TimestampCache::new(session, clock),
        }
    }
}

impl Adapter for MigrationAdapter<'_> {
    fn mode(&self) -> ApplyMode {
        ApplyMode::Migration
    }

    fn generate_for(
        &mut self,
        table: &Table,
        family: &LocalizedFamily,
        new_suffix: &str,
        policy: &PositionPolicy,
    ) -> EngineResult<Vec<Artifact>> {
        let spec = emit(table, family, new_suffix, policy)?;

        if table.has_column(&spec.name) {
            return Err(EngineError::target_exists(&table.name, &spec.name));
        }

        let ts = self.timestamps.timestamp_for(&table.name, &spec.name);
        let class_name = migration_class_name(&table.name, &spec.name, ts)?;
        let content = render_migration(&spec, &class_name, self.config.dialect);
        let path = self
            .config
            .migration_path
            .join(format!("{}.php", class_name));

        tracing::debug!(
            table = %table.name,
            column = %spec.name,
            class = %class_name,
            "prepared migration"
        );

        Ok(vec![Artifact::migration(
            &table.name,
            &spec.name,
            path,
            content,
            class_name,
        )])
    }
}

// ============================================================================
// Naming
// ============================================================================

/// `m<YYMMDD_HHMMSS>_add_<column>_to_<table>` for a unix timestamp (UTC).
///
/// Characters outside `[A-Za-z0-9_]` are replaced by `_`.
pub fn migration_class_name(table: &str, column: &str, timestamp: i64) -> EngineResult<String> {
    let at = DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
        EngineError::internal(format!("timestamp {} is out of range", timestamp))
    })?;

    Ok(format!(
        "m{}_add_{}_to_{}",
        at.format("%y%m%d_%H%M%S"),
        sanitize_identifier(column),
        sanitize_identifier(table)
    ))
}

/// Replace every character that is not `[A-Za-z0-9_]` so the name is safe
/// as a file name or class name
pub(crate) fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

// ============================================================================
// Rendering
// ============================================================================

/// Escape for a PHP single-quoted string
fn php_single(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Escape for a PHP double-quoted string
fn php_double(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
}

fn render_migration(spec: &ColumnSpec, class_name: &str, dialect: DatabaseType) -> String {
    let table = php_single(&spec.table);
    let column = php_single(&spec.name);
    let hint = migration_type_hint(Some(&spec.db_type));

    let up = if dialect.supports_column_positioning() {
        format!("$this->execute(\"{}\");", php_double(&spec.to_alter_sql(dialect)))
    } else {
        format!("$this->addColumn('{}', '{}', $this->string());", table, column)
    };

    format!(
        r#"<?php
declare(strict_types=1);

use yii\db\Migration;

/**
 * Class {class_name}
 * Generated by field-lingo: add column {name} to table {table_name}
 */
final class {class_name} extends Migration
{{
    public function safeUp(): void
    {{
        // Column hint (derived from {source}): {hint}
        // Adjust the expression below for an exact builder call like $this->string(255)->notNull()
        {up}
    }}

    public function safeDown(): void
    {{
        if ($this->db->getSchema()->getTableSchema('{table}', true)->getColumn('{column}') !== null) {{
            $this->dropColumn('{table}', '{column}');
        }}
    }}
}}
"#,
        class_name = class_name,
        name = spec.name,
        table_name = spec.table,
        source = spec.source_column,
        hint = hint,
        up = up,
        table = table,
        column = column,
    )
}

// ============================================================================
// Tests
// ============================================================================
