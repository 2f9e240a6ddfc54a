//! # Lingo CLI
//!
//! Command-line interface for Field Lingo.
//!
//! ## Commands
//!
//! - `discover` - List the complete localized families per table
//! - `generate` - Prepare statements or migrations adding a language
//! - `languages` - List the enabled languages
//! - `positions` - List the position options for a language selection
//! - `session clear` - Forget the migration timestamps of a session
//!
//! The schema is read either from a JSON snapshot (`--schema`) or from a
//! MySQL database (`--database-url` / `DATABASE_URL`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use lingo_core::{ApplyMode, DatabaseType, PositionPolicy};

pub mod commands;
pub mod config;
pub mod logging;
pub mod mysql;

// Re-export dependencies for use in main.rs
pub use lingo_codegen;
pub use lingo_core;
pub use lingo_ir;

use config::Config;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Session used when `--session` is not given
pub const DEFAULT_SESSION: &str = "default";

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "lingo",
    version,
    about = "Add a column for a new language next to every localized column family"
)]
pub struct Cli {
    /// Configuration file (defaults to ./field-lingo.toml)
    #[arg(long, global = true, env = "FIELD_LINGO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the complete localized families per table
    Discover {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Prepare statements or migrations adding a new language column
    Generate(GenerateArgs),
    /// List the enabled languages
    Languages {
        /// Database holding the `language` table
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the position options for a language selection
    Positions {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Database holding the `language` table
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
    /// Session maintenance
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Forget the migration timestamps of a session
    Clear {
        /// Session id
        #[arg(long, default_value = DEFAULT_SESSION)]
        session: String,
    },
}

/// Where the schema comes from
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// JSON schema snapshot (read instead of introspecting the database)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// MySQL connection URL, also used by `generate --execute`
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Which languages and tables to look at
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// Base languages, comma separated (defaults to every enabled language)
    #[arg(short, long, value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Only these tables
    #[arg(short, long = "table")]
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Suffix of the language to add, e.g. "de"
    #[arg(short, long)]
    pub suffix: String,

    /// before_all, after_all or a base language code
    #[arg(short, long)]
    pub position: Option<PositionPolicy>,

    /// Output mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// SQL dialect (mysql, postgresql, sqlite)
    #[arg(long)]
    pub dialect: Option<DatabaseType>,

    /// Session keeping migration timestamps stable between runs
    #[arg(long, default_value = DEFAULT_SESSION)]
    pub session: String,

    /// Directory for migration files
    #[arg(long)]
    pub migration_path: Option<PathBuf>,

    /// Root directory for written files
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Write the generated files
    #[arg(long)]
    pub write: bool,

    /// Run the statements against the database (direct-sql mode)
    #[arg(long)]
    pub execute: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Migration,
    DirectSql,
}

impl From<ModeArg> for ApplyMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Migration => ApplyMode::Migration,
            ModeArg::DirectSql => ApplyMode::DirectSql,
        }
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse the command line, run it and map the result to an exit code
pub async fn main_entry() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Run a parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    logging::init(&config.logging, cli.verbose)?;

    match &config.source {
        Some(path) => tracing::debug!(path = %path.display(), "configuration loaded"),
        None => tracing::debug!("no configuration file, using defaults"),
    }

    match cli.command {
        Command::Discover {
            source,
            selection,
            json,
        } => commands::discover(&config, &source, &selection, json).await,
        Command::Generate(args) => commands::generate(&config, &args).await,
        Command::Languages { database_url, json } => {
            commands::languages(&config, database_url.as_deref(), json).await
        }
        Command::Positions {
            selection,
            database_url,
        } => commands::positions(&config, &selection, database_url.as_deref()).await,
        Command::Session { action } => match action {
            SessionCommand::Clear { session } => commands::clear_session(&config, &session),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::try_parse_from([
            "lingo",
            "generate",
            "--schema",
            "schema.json",
            "--languages",
            "en,fr",
            "--suffix",
            "de",
            "--position",
            "before-all",
            "--mode",
            "direct-sql",
            "--dialect",
            "postgresql",
        ])
        .unwrap();

        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.selection.languages, vec!["en", "fr"]);
        assert_eq!(args.suffix, "de");
        assert_eq!(args.position, Some(PositionPolicy::BeforeAll));
        assert_eq!(args.mode.map(ApplyMode::from), Some(ApplyMode::DirectSql));
        assert_eq!(args.dialect, Some(DatabaseType::PostgreSQL));
        assert_eq!(args.session, DEFAULT_SESSION);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lingo",
            "discover",
            "--schema",
            "schema.json",
            "--verbose",
            "--config",
            "lingo.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("lingo.toml")));
    }

    #[test]
    fn test_unknown_dialect_is_rejected() {
        let result = Cli::try_parse_from([
            "lingo", "generate", "--suffix", "de", "--dialect", "oracle",
        ]);
        assert!(result.is_err());
    }
}
