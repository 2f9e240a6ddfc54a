//! Direct SQL adapter
//!
//! Produces one ready-to-run `ALTER TABLE` statement per family. The
//! statement is only executed later, when the caller commits it.

use lingo_core::{ApplyMode, EngineResult, PositionPolicy};
use lingo_ir::Table;

use super::Adapter;
use super::migration::sanitize_identifier;
use crate::discovery::LocalizedFamily;
use crate::emitter::emit;
use crate::{Artifact, GeneratorConfig};

/// Renders `ALTER TABLE ... ADD COLUMN` statements
#[derive(Debug, Clone)]
pub struct DirectSqlAdapter {
    config: GeneratorConfig,
}

impl DirectSqlAdapter {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }
}

impl Adapter for DirectSqlAdapter {
    fn mode(&self) -> ApplyMode {
        ApplyMode::DirectSql
    }

    fn generate_for(
        &mut self,
        table: &Table,
        family: &LocalizedFamily,
        new_suffix: &str,
        policy: &PositionPolicy,
    ) -> EngineResult<Vec<Artifact>> {
        let spec = emit(table, family, new_suffix, policy)?;
        let sql = spec.to_alter_sql(self.config.dialect);

        // Still rendered so the statement can be inspected, but never run
        let skip = table.has_column(&spec.name);

        tracing::debug!(
            table = %table.name,
            column = %spec.name,
            skip,
            "prepared statement"
        );

        let path = self.config.sql_path.join(format!(
            "{}_{}.sql",
            sanitize_identifier(&table.name),
            sanitize_identifier(&spec.name)
        ));

        Ok(vec![Artifact::statement(
            &table.name,
            &spec.name,
            path,
            sql,
            skip,
        )])
    }
}
