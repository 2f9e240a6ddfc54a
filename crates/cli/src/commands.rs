//! Command handlers

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use colored::*;
use lingo_codegen::{
    ArtifactKind, CommitOutcome, CommitStatus, FileSession, GenerationOutput, GenerationRequest,
    Generator, commit, discover_schema, summarize,
};
use lingo_core::{ApplyMode, LanguageRegistry, PositionPolicy, SystemClock, Validatable};
use lingo_ir::{LanguageList, Schema, load_schema};
use serde::Serialize;
use sqlx::mysql::MySqlPool;

use crate::config::Config;
use crate::mysql::{self, MySqlExecutor};
use crate::{GenerateArgs, SelectionArgs, SourceArgs};

// ============================================================================
// Shared helpers
// ============================================================================

/// Load the schema, keeping the connection when it came from a database
async fn load_source(source: &SourceArgs) -> Result<(Schema, Option<MySqlPool>)> {
    if let Some(path) = &source.schema {
        let schema = load_schema(path)
            .with_context(|| format!("loading schema {}", path.display()))?;
        return Ok((schema, None));
    }

    if let Some(url) = &source.database_url {
        let pool = mysql::connect(url).await?;
        let schema = mysql::introspect(&pool).await?;
        return Ok((schema, Some(pool)));
    }

    bail!("no schema source: pass --schema <file> or --database-url <url>")
}

/// Executor for `--execute`: the introspection connection when there is
/// one, otherwise a fresh connection to `database_url`.
async fn execution_target(
    pool: Option<MySqlPool>,
    database_url: Option<&str>,
) -> Result<MySqlExecutor> {
    let pool = match (pool, database_url) {
        (Some(pool), _) => pool,
        (None, Some(url)) => mysql::connect(url)
            .await
            .context("connecting for --execute")?,
        (None, None) => bail!("--execute requires --database-url"),
    };
    Ok(MySqlExecutor::new(pool))
}

/// Base languages: command line, then `[generator] languages`, then every
/// enabled language of the registry.
async fn resolve_languages(
    config: &Config,
    selection: &SelectionArgs,
    pool: Option<&MySqlPool>,
) -> Result<Vec<String>> {
    let explicit: Vec<String> = selection
        .languages
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    if !explicit.is_empty() {
        return Ok(explicit);
    }
    if !config.generator.languages.is_empty() {
        return Ok(config.generator.languages.clone());
    }

    let registry = match pool {
        Some(pool) => mysql::load_languages(pool).await?,
        None => config.language_registry(),
    };
    Ok(registry.enabled_codes())
}

fn needs_registry(config: &Config, selection: &SelectionArgs) -> bool {
    selection.languages.iter().all(|l| l.trim().is_empty()) && config.generator.languages.is_empty()
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// discover
// ============================================================================

pub async fn discover(
    config: &Config,
    source: &SourceArgs,
    selection: &SelectionArgs,
    json: bool,
) -> Result<()> {
    let (schema, pool) = load_source(source).await?;
    let languages = resolve_languages(config, selection, pool.as_ref()).await?;
    if languages.is_empty() {
        bail!("no base languages: pass --languages or configure [[languages]]");
    }

    let schema = schema.retain_tables(&selection.tables);
    let found = discover_schema(&schema, &languages)?;

    if json {
        return print_json(&found);
    }

    println!(
        "{}",
        format!("🔍 Localized families for [{}]", languages.join(", "))
            .cyan()
            .bold()
    );
    println!();

    if found.is_empty() {
        println!("  {}", "No complete families found".yellow());
        return Ok(());
    }

    for table in &found {
        println!("  {}", table.table.bold());
        for family in &table.families {
            println!(
                "    {:<24} {}",
                family.base_name.green(),
                family.columns.join(", ").dimmed()
            );
        }
    }

    let total: usize = found.iter().map(|t| t.families.len()).sum();
    println!();
    println!("  {} families in {} tables", total, found.len());
    Ok(())
}

// ============================================================================
// generate
// ============================================================================

#[derive(Serialize)]
struct GenerateReport<'a> {
    mode: ApplyMode,
    message: String,
    #[serde(flatten)]
    output: &'a GenerationOutput,
    written: Vec<PathBuf>,
    commits: Vec<CommitOutcome>,
}

pub async fn generate(config: &Config, args: &GenerateArgs) -> Result<()> {
    let mode = args.mode.map(ApplyMode::from).unwrap_or(config.generator.mode);

    if args.execute && mode != ApplyMode::DirectSql {
        bail!("--execute requires --mode direct-sql");
    }

    let (schema, pool) = load_source(&args.source).await?;
    let languages = resolve_languages(config, &args.selection, pool.as_ref()).await?;

    let position = args
        .position
        .clone()
        .unwrap_or_else(|| config.generator.position.clone());
    let request = GenerationRequest::new(languages, args.suffix.as_str())
        .with_position(position)
        .with_mode(mode)
        .with_tables(args.selection.tables.iter().cloned());

    let errors = request.validation_errors();
    if !errors.is_empty() {
        bail!("{}", errors.join("\n"));
    }

    let executor = match args.execute {
        true => Some(execution_target(pool, args.source.database_url.as_deref()).await?),
        false => None,
    };

    let mut engine_config = config.generator_config();
    if let Some(dialect) = args.dialect {
        engine_config = engine_config.with_dialect(dialect);
    }
    if let Some(path) = &args.migration_path {
        engine_config = engine_config.with_migration_path(path);
    }

    let mut session = FileSession::open(&config.session.dir, &args.session)?;
    let output = Generator::new(engine_config).run(&schema, &request, &mut session, &SystemClock)?;

    let written = if args.write {
        output.write_to_disk(&args.output, mode == ApplyMode::DirectSql)?
    } else {
        Vec::new()
    };

    let commits = match &executor {
        Some(executor) => commit(&output.artifacts, executor).await,
        None => Vec::new(),
    };
    let failed = commits.iter().filter(|c| c.is_failure()).count();

    if args.json {
        print_json(&GenerateReport {
            mode,
            message: output.success_message(mode),
            output: &output,
            written,
            commits,
        })?;
    } else {
        print_generation(&request, &output, &written, &commits, args.write);
    }

    if failed > 0 {
        bail!("{} statement(s) failed", failed);
    }
    Ok(())
}

fn print_generation(
    request: &GenerationRequest,
    output: &GenerationOutput,
    written: &[PathBuf],
    commits: &[CommitOutcome],
    write: bool,
) {
    println!(
        "{}",
        format!(
            "🌐 Adding language '{}' ({})",
            request.new_suffix.to_lowercase(),
            request.mode.label()
        )
        .cyan()
        .bold()
    );
    println!();

    for artifact in &output.artifacts {
        println!("  {} {}", "▸".green(), artifact.describe());
        match &artifact.kind {
            ArtifactKind::Statement => println!("    {}", artifact.content.dimmed()),
            ArtifactKind::Migration { .. } => {
                println!("    {}", artifact.path.display().to_string().dimmed())
            }
        }
    }
    for field in &output.skipped_fields {
        println!("  {} {} {}", "○".yellow(), field, "(already exists)".dimmed());
    }
    for family in &output.dropped_families {
        println!("  {} {} {}", "○".yellow(), family, "(no template column)".dimmed());
    }
    for warning in &output.warnings {
        println!("  {} {}", "⚠".yellow(), warning);
    }

    if !written.is_empty() {
        println!();
        for path in written {
            println!("  {} {}", "✓ Written:".green(), path.display());
        }
    }

    if !commits.is_empty() {
        println!();
        for outcome in commits {
            let target = format!("{}.{}", outcome.table, outcome.column);
            match &outcome.status {
                CommitStatus::Executed => println!("  {} {}", "✓ Executed:".green(), target),
                CommitStatus::Skipped => println!("  {} {}", "○ Skipped:".yellow(), target),
                CommitStatus::Failed(message) => {
                    println!("  {} {} {}", "✗ Failed:".red(), target, message.red())
                }
            }
        }
    }

    println!();
    println!("{}", summarize(output, request.mode));
    println!("{}", output.success_message(request.mode).green());

    if !write && !output.generated_migrations.is_empty() {
        println!(
            "Run again with {} to create the migration files.",
            "--write".cyan()
        );
    }
}

// ============================================================================
// languages / positions
// ============================================================================

async fn registry(config: &Config, database_url: Option<&str>) -> Result<LanguageList> {
    match database_url {
        Some(url) => {
            let pool = mysql::connect(url).await?;
            Ok(mysql::load_languages(&pool).await?)
        }
        None => Ok(config.language_registry()),
    }
}

pub async fn languages(config: &Config, database_url: Option<&str>, json: bool) -> Result<()> {
    let languages = registry(config, database_url).await?.list_enabled_languages();

    if json {
        return print_json(&languages);
    }

    if languages.is_empty() {
        println!("  {}", "No enabled languages".yellow());
        return Ok(());
    }
    for language in &languages {
        println!("  {:<6} {}", language.code.green().bold(), language.full_name);
    }
    Ok(())
}

pub async fn positions(
    config: &Config,
    selection: &SelectionArgs,
    database_url: Option<&str>,
) -> Result<()> {
    let languages = if needs_registry(config, selection) {
        registry(config, database_url).await?.enabled_codes()
    } else {
        resolve_languages(config, selection, None).await?
    };

    for option in PositionPolicy::options(&languages) {
        println!("  {:<12} {}", option.value().green(), option.label());
    }
    Ok(())
}

// ============================================================================
// session
// ============================================================================

pub fn clear_session(config: &Config, id: &str) -> Result<()> {
    if FileSession::destroy(&config.session.dir, id)? {
        println!("{} Session '{}' cleared", "✓".green(), id);
    } else {
        println!("{} Session '{}' has no stored state", "○".yellow(), id);
    }
    Ok(())
}
