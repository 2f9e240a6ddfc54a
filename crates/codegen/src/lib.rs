//! # Lingo Codegen
//!
//! Generation engine for Field Lingo.
//!
//! This crate finds localized column families (`title_en`, `title_fr`, ...)
//! in a schema and produces the artifacts that add a column for a new
//! language next to them.
//!
//! ## Features
//!
//! - **Discovery**: complete `{base}_{language}` families per table
//! - **Resolution**: template/anchor column under a position policy
//! - **Emission**: a [`ColumnSpec`] with `FIRST` / `AFTER <col>` placement
//! - **Adapters**: direct `ALTER TABLE` statements or migration classes
//! - **Orchestration**: skip bookkeeping, session-stable migration names,
//!   committing statements through a [`StatementExecutor`](lingo_core::StatementExecutor)
//!

// ============================================================================
// Modules
// ============================================================================

pub mod adapters;
pub mod column_hint;
pub mod commit;
pub mod discovery;
pub mod emitter;
pub mod generator;
pub mod resolver;
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use adapters::{Adapter, DirectSqlAdapter, MigrationAdapter, create_adapter};
pub use column_hint::migration_type_hint;
pub use commit::{CommitOutcome, CommitStatus, commit};
pub use discovery::{LocalizedFamily, TableFamilies, discover, discover_schema};
pub use emitter::{ColumnSpec, PositionClause, emit};
pub use generator::{GenerationRequest, GenerationSummary, Generator, summarize};
pub use resolver::resolve_source_column;
pub use session::{FileSession, MemorySession, TimestampCache};

use lingo_core::{ApplyMode, DatabaseType, EngineError, EngineResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Configuration for the generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Target database dialect
    pub dialect: DatabaseType,

    /// Directory (relative to the output root) for migration files
    pub migration_path: PathBuf,

    /// Directory (relative to the output root) for statement files
    pub sql_path: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dialect: DatabaseType::MySQL,
            migration_path: PathBuf::from("migrations"),
            sql_path: PathBuf::from("sql"),
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database dialect
    pub fn with_dialect(mut self, dialect: DatabaseType) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the migration directory
    pub fn with_migration_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.migration_path = path.into();
        self
    }

    /// Set the statement directory
    pub fn with_sql_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sql_path = path.into();
        self
    }
}

// ============================================================================
// Artifact
// ============================================================================

/// Kind of rendered artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ArtifactKind {
    /// A single `ALTER TABLE` statement
    Statement,
    /// A migration class
    Migration { class_name: String },
}

/// One rendered schema change for one table/column pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Table the column is added to
    pub table: String,

    /// Column being added
    pub column: String,

    /// Relative output path
    pub path: PathBuf,

    /// Rendered content
    pub content: String,

    /// Artifact kind
    pub kind: ArtifactKind,

    /// Rendered for inspection only, never executed or written
    pub skip: bool,
}

impl Artifact {
    /// Create a statement artifact
    pub fn statement(
        table: impl Into<String>,
        column: impl Into<String>,
        path: impl Into<PathBuf>,
        sql: impl Into<String>,
        skip: bool,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            path: path.into(),
            content: sql.into(),
            kind: ArtifactKind::Statement,
            skip,
        }
    }

    /// Create a migration artifact
    pub fn migration(
        table: impl Into<String>,
        column: impl Into<String>,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            path: path.into(),
            content: content.into(),
            kind: ArtifactKind::Migration {
                class_name: class_name.into(),
            },
            skip: false,
        }
    }

    /// File name component of the path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Whether this is a statement artifact
    pub fn is_statement(&self) -> bool {
        matches!(self.kind, ArtifactKind::Statement)
    }

    /// Short description, e.g. "Table post: add column title_de"
    pub fn describe(&self) -> String {
        format!("Table {}: add column {}", self.table, self.column)
    }
}

// ============================================================================
// GenerationOutput
// ============================================================================

/// Everything a generation run produced, plus its bookkeeping
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationOutput {
    /// Rendered artifacts, in table and family order
    pub artifacts: Vec<Artifact>,

    /// Content of every statement artifact
    pub prepared_statements: Vec<String>,

    /// `table.column` of every target column that already existed
    pub skipped_fields: Vec<String>,

    /// File names of generated migrations
    pub generated_migrations: Vec<String>,

    /// `table.base` of families without a usable template column
    pub dropped_families: Vec<String>,

    /// Number of tables inspected
    pub tables_scanned: usize,

    /// Number of complete families found
    pub families_found: usize,

    /// Non-fatal problems
    pub warnings: Vec<String>,
}

impl GenerationOutput {
    /// Create an empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an artifact and its bookkeeping
    pub fn add_artifact(&mut self, artifact: Artifact) {
        match &artifact.kind {
            ArtifactKind::Statement => self.prepared_statements.push(artifact.content.clone()),
            ArtifactKind::Migration { .. } => {
                self.generated_migrations.push(artifact.file_name());
            }
        }
        self.artifacts.push(artifact);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Number of artifacts
    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    /// True when the run produced and recorded nothing
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
            && self.skipped_fields.is_empty()
            && self.dropped_families.is_empty()
    }

    /// Message shown after a run
    pub fn success_message(&self, mode: ApplyMode) -> String {
        let skipped = self.skipped_fields.len();
        match mode {
            ApplyMode::Migration => format!(
                "Generated {} migration(s). Skipped {} fields (already existed).",
                self.generated_migrations.len(),
                skipped
            ),
            ApplyMode::DirectSql => format!(
                "Successfully prepared {} SQL statement(s). Skipped {} fields.",
                self.prepared_statements.len(),
                skipped
            ),
        }
    }

    /// Write the migration artifacts below `base_dir`, plus the statement
    /// artifacts when `include_statements` is set. Skipped artifacts are
    /// never written.
    ///
    /// Returns the paths written.
    pub fn write_to_disk(
        &self,
        base_dir: impl AsRef<Path>,
        include_statements: bool,
    ) -> EngineResult<Vec<PathBuf>> {
        let base_dir = base_dir.as_ref();
        let mut written = Vec::new();

        let selected = self
            .artifacts
            .iter()
            .filter(|a| !a.skip && (include_statements || !a.is_statement()));

        for artifact in selected {
            let full_path = base_dir.join(&artifact.path);

            // Create parent directories
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }

            // Write file
            std::fs::write(&full_path, &artifact.content).map_err(|e| EngineError::FileWrite {
                path: full_path.clone(),
                message: e.to_string(),
            })?;
            written.push(full_path);
        }

        Ok(written)
    }
}

// ============================================================================
// Tests
// ============================================================================
