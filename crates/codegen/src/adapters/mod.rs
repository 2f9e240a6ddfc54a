//! # Output Adapters
//!
//! Adapters render a [`ColumnSpec`](crate::ColumnSpec) into artifacts. Both
//! adapters start from the same `emit` call, so swapping one for the other
//! changes the artifact format and nothing else.
//!
//! | adapter | artifact | target column exists |
//! |---|---|---|
//! | [`DirectSqlAdapter`] | one `ALTER TABLE` statement | rendered with `skip = true` |
//! | [`MigrationAdapter`] | one migration class file | [`TargetAlreadyExists`](lingo_core::EngineError::TargetAlreadyExists) |

pub mod direct_sql;
pub mod migration;

pub use direct_sql::DirectSqlAdapter;
pub use migration::MigrationAdapter;

use lingo_core::{ApplyMode, Clock, EngineResult, PositionPolicy, SessionStore};
use lingo_ir::Table;

use crate::GeneratorConfig;
use crate::discovery::LocalizedFamily;
use crate::Artifact;

/// Renders the artifacts adding one localized column
pub trait Adapter {
    /// The apply mode this adapter implements
    fn mode(&self) -> ApplyMode;

    /// Render the artifacts for adding `new_suffix` to `family`.
    ///
    /// Errors are family-local (see [`EngineError::is_family_local`](lingo_core::EngineError::is_family_local)).
    fn generate_for(
        &mut self,
        table: &Table,
        family: &LocalizedFamily,
        new_suffix: &str,
        policy: &PositionPolicy,
    ) -> EngineResult<Vec<Artifact>>;
}

/// Create the adapter for `mode`.
///
/// The session store and clock are only used by the migration adapter.
pub fn create_adapter<'a>(
    mode: ApplyMode,
    config: &GeneratorConfig,
    session: &'a mut dyn SessionStore,
    clock: &'a dyn Clock,
) -> Box<dyn Adapter + 'a> {
    match mode {
        ApplyMode::DirectSql => Box::new(DirectSqlAdapter::new(config.clone())),
        ApplyMode::Migration => Box::new(MigrationAdapter::new(config.clone(), session, clock)),
    }
}
