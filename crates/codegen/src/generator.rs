//! # Generation Orchestrator
//!
//! The `Generator` walks a schema, finds the localized families for the
//! selected languages and hands each one to a single output [`Adapter`].
//!
//! ## Pipeline
//!
//! ```text
//! SchemaProvider + GenerationRequest
//!         │
//!         ▼
//!   list_tables()               (the only fatal step)
//!         │
//!         ├──► discover(table)  → families
//!         │        │
//!         │        ├── target exists   → skipped_fields
//!         │        ├── no template     → dropped_families
//!         │        └── adapter         → artifacts
//!         ▼
//!   GenerationOutput { artifacts, bookkeeping, warnings }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lingo_codegen::{GenerationRequest, Generator, MemorySession};
//! use lingo_core::SystemClock;
//!
//! let request = GenerationRequest::new(["en", "fr"], "de");
//! let mut session = MemorySession::new();
//!
//! let output = Generator::with_defaults().run(&schema, &request, &mut session, &SystemClock)?;
//! println!("{}", output.success_message(request.mode));
//! ```

use lingo_core::{
    ApplyMode, Clock, EngineError, EngineResult, PositionPolicy, SessionStore, Validatable,
};
use lingo_ir::SchemaProvider;

use crate::adapters::{Adapter, create_adapter};
use crate::discovery::discover;
use crate::{GenerationOutput, GeneratorConfig};

// ============================================================================
// GenerationRequest
// ============================================================================

/// What to generate: which families, which new language, where and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Base languages a family must be complete for
    pub languages: Vec<String>,

    /// Suffix of the language being added
    pub new_suffix: String,

    /// Placement of the new columns
    pub position: PositionPolicy,

    /// Output adapter to use
    pub mode: ApplyMode,

    /// Restrict generation to these tables (empty = all)
    pub tables: Vec<String>,
}

impl GenerationRequest {
    /// Create a request with the default position and mode
    pub fn new<I, S>(languages: I, new_suffix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
            new_suffix: new_suffix.into(),
            position: PositionPolicy::default(),
            mode: ApplyMode::default(),
            tables: Vec::new(),
        }
    }

    /// Set the position policy
    pub fn with_position(mut self, position: PositionPolicy) -> Self {
        self.position = position;
        self
    }

    /// Set the apply mode
    pub fn with_mode(mut self, mode: ApplyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Restrict the request to some tables
    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Trimmed copy with a lowercase suffix and no blank languages
    pub fn normalized(&self) -> Self {
        Self {
            languages: self
                .languages
                .iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
            new_suffix: self.new_suffix.trim().to_lowercase(),
            ..self.clone()
        }
    }

    /// Whether `table` is covered by the table filter
    pub fn includes_table(&self, table: &str) -> bool {
        self.tables.is_empty() || self.tables.iter().any(|t| t == table)
    }

    fn attribute_errors(&self) -> Vec<EngineError> {
        let mut errors = Vec::new();
        let suffix = self.new_suffix.trim();

        if suffix.is_empty() {
            errors.push(EngineError::attribute(
                "new_suffix",
                "Language suffix cannot be blank.",
            ));
        } else if suffix.len() != 2 || !suffix.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.push(EngineError::attribute(
                "new_suffix",
                "Language suffix must be 2 letters.",
            ));
        }

        if self.languages.iter().all(|l| l.trim().is_empty()) {
            errors.push(EngineError::attribute(
                "languages",
                "Please select at least one base language.",
            ));
        } else if self
            .languages
            .iter()
            .any(|l| l.trim().eq_ignore_ascii_case(suffix))
        {
            errors.push(EngineError::attribute(
                "new_suffix",
                format!("Language '{}' is already one of the base languages.", suffix),
            ));
        }

        errors
    }
}

impl Validatable for GenerationRequest {
    fn validate(&self) -> EngineResult<()> {
        match self.attribute_errors().into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn validation_errors(&self) -> Vec<String> {
        self.attribute_errors()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Runs a [`GenerationRequest`] against a schema.
///
/// The generator only holds configuration. All per-run state lives in the
/// returned [`GenerationOutput`] and, for migrations, in the session store.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Create a new generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(GeneratorConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    // ====================================================================
    // Generation
    // ====================================================================

    /// Run `request` through `adapter`.
    ///
    /// # Steps
    ///
    /// 1. **Normalize** the request. An empty language selection or suffix
    ///    yields an empty output without reading the schema.
    /// 2. **Read** the tables from `provider`.
    /// 3. **Discover** the complete families of every table.
    /// 4. **Skip** families whose target column already exists.
    /// 5. **Render** the rest through the adapter.
    ///
    /// # Errors
    ///
    /// Only a failure to read the schema is returned. Problems with a single
    /// family are recorded in the output and the run continues.
    pub fn generate(
        &self,
        provider: &dyn SchemaProvider,
        request: &GenerationRequest,
        adapter: &mut dyn Adapter,
    ) -> EngineResult<GenerationOutput> {
        let request = request.normalized();
        let mut output = GenerationOutput::new();

        // ── 1. Selection ─────────────────────────────────────────────────
        let rejection = if request.languages.is_empty() {
            Some(EngineError::invalid_selection("no base languages selected"))
        } else if request.new_suffix.is_empty() {
            Some(EngineError::invalid_selection("no language suffix given"))
        } else {
            None
        };
        if let Some(e) = rejection {
            tracing::warn!("{}", e);
            return Ok(output);
        }

        // ── 2. Schema ────────────────────────────────────────────────────
        let tables = provider.list_tables()?;

        for table in tables.iter().filter(|t| request.includes_table(&t.name)) {
            output.tables_scanned += 1;

            // ── 3. Discovery ─────────────────────────────────────────────
            let families = discover(table, &request.languages);
            output.families_found += families.len();

            for family in &families {
                let target = format!("{}_{}", family.base_name, request.new_suffix);

                // ── 4. Existing target ───────────────────────────────────
                if table.has_column(&target) {
                    tracing::debug!(table = %table.name, column = %target, "target exists, skipped");
                    output.skipped_fields.push(format!("{}.{}", table.name, target));
                    continue;
                }

                // ── 5. Adapter ───────────────────────────────────────────
                match adapter.generate_for(table, family, &request.new_suffix, &request.position) {
                    Ok(artifacts) => {
                        for artifact in artifacts {
                            output.add_artifact(artifact);
                        }
                    }
                    Err(EngineError::SourceUnresolved { table, base }) => {
                        tracing::debug!(table = %table, base = %base, "no template column, family dropped");
                        output.dropped_families.push(format!("{}.{}", table, base));
                    }
                    Err(EngineError::TargetAlreadyExists { table, column }) => {
                        output.skipped_fields.push(format!("{}.{}", table, column));
                    }
                    Err(e) => {
                        tracing::warn!(table = %table.name, base = %family.base_name, error = %e, "family failed");
                        output.add_warning(format!(
                            "{}.{}: {}",
                            table.name, family.base_name, e
                        ));
                    }
                }
            }
        }

        tracing::info!(
            mode = %adapter.mode(),
            tables = output.tables_scanned,
            families = output.families_found,
            artifacts = output.artifact_count(),
            skipped = output.skipped_fields.len(),
            dropped = output.dropped_families.len(),
            "generation complete",
        );

        Ok(output)
    }

    /// Run `request` with the adapter matching its mode, then flush the
    /// session so later runs see the same migration timestamps.
    pub fn run(
        &self,
        provider: &dyn SchemaProvider,
        request: &GenerationRequest,
        session: &mut dyn SessionStore,
        clock: &dyn Clock,
    ) -> EngineResult<GenerationOutput> {
        let output = {
            let mut adapter = create_adapter(request.mode, &self.config, &mut *session, clock);
            self.generate(provider, request, adapter.as_mut())?
        };
        session.flush()?;
        Ok(output)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// GenerationSummary - human-readable report
// ============================================================================

/// A human-readable summary of a completed generation run.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    /// Mode the run used.
    pub mode: ApplyMode,
    /// Tables inspected.
    pub tables_scanned: usize,
    /// Complete families found.
    pub families_found: usize,
    /// Statements or migrations produced.
    pub artifacts: usize,
    /// Target columns that already existed.
    pub skipped: usize,
    /// Families without a template column.
    pub dropped: usize,
    /// Number of warnings.
    pub warning_count: usize,
}

impl GenerationSummary {
    /// Build a summary from a generation output.
    pub fn from_output(output: &GenerationOutput, mode: ApplyMode) -> Self {
        Self {
            mode,
            tables_scanned: output.tables_scanned,
            families_found: output.families_found,
            artifacts: output.artifact_count(),
            skipped: output.skipped_fields.len(),
            dropped: output.dropped_families.len(),
            warning_count: output.warnings.len(),
        }
    }

    /// Format the summary as a human-readable string.
    pub fn display(&self) -> String {
        let mut out = String::with_capacity(512);

        out.push_str("╔══════════════════════════════════════════════════╗\n");
        out.push_str("║         Localized Columns Generated              ║\n");
        out.push_str("╠══════════════════════════════════════════════════╣\n");
        out.push_str(&format!("║  Mode:        {:<35}║\n", self.mode.label()));
        out.push_str(&format!("║  Tables:      {:<35}║\n", self.tables_scanned));
        out.push_str(&format!("║  Families:    {:<35}║\n", self.families_found));
        out.push_str(&format!("║  Generated:   {:<35}║\n", self.artifacts));
        out.push_str(&format!("║  Skipped:     {:<35}║\n", self.skipped));
        out.push_str(&format!("║  Dropped:     {:<35}║\n", self.dropped));
        out.push_str(&format!("║  Warnings:    {:<35}║\n", self.warning_count));
        out.push_str("╚══════════════════════════════════════════════════╝\n");

        out
    }
}

impl std::fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Produce a [`GenerationSummary`] from a [`GenerationOutput`].
pub fn summarize(output: &GenerationOutput, mode: ApplyMode) -> GenerationSummary {
    GenerationSummary::from_output(output, mode)
}

// ============================================================================
// Tests
// ============================================================================
