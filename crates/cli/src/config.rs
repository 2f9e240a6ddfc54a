//! `field-lingo.toml` configuration
//!
//! Every section is optional; a missing file means defaults everywhere.
//! Command line arguments override file values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use lingo_codegen::GeneratorConfig;
use lingo_core::{ApplyMode, DatabaseType, EngineError, EngineResult, Language, PositionPolicy};
use lingo_ir::LanguageList;
use serde::Deserialize;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "field-lingo.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Static language registry, used when no database is given
    #[serde(default)]
    pub languages: Vec<Language>,
    /// File the configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "GeneratorSettings::default_migration_path")]
    pub migration_path: PathBuf,
    #[serde(default = "GeneratorSettings::default_sql_path")]
    pub sql_path: PathBuf,
    #[serde(default)]
    pub dialect: DatabaseType,
    #[serde(default)]
    pub position: PositionPolicy,
    #[serde(default)]
    pub mode: ApplyMode,
    /// Base languages used when `--languages` is not given
    #[serde(default)]
    pub languages: Vec<String>,
}

impl GeneratorSettings {
    fn default_migration_path() -> PathBuf {
        PathBuf::from("migrations")
    }

    fn default_sql_path() -> PathBuf {
        PathBuf::from("sql")
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            migration_path: Self::default_migration_path(),
            sql_path: Self::default_sql_path(),
            dialect: DatabaseType::default(),
            position: PositionPolicy::default(),
            mode: ApplyMode::default(),
            languages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "SessionSettings::default_dir")]
    pub dir: PathBuf,
}

impl SessionSettings {
    fn default_dir() -> PathBuf {
        PathBuf::from(".field-lingo/sessions")
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LoggingConfig::default_level(),
        }
    }
}

impl Config {
    /// Load `path`, or `field-lingo.toml` when no path is given.
    ///
    /// An explicitly requested file must exist; the default one may be missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if !candidate.exists() {
            if path.is_some() {
                bail!("configuration file {} not found", candidate.display());
            }
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(&candidate)
            .with_context(|| format!("failed to read config {}", candidate.display()))?;
        let mut config = Config::parse(&raw)
            .with_context(|| format!("invalid config {}", candidate.display()))?;
        config.source = Some(candidate);
        Ok(config)
    }

    /// Parse a configuration document
    pub fn parse(raw: &str) -> EngineResult<Self> {
        let config: Config = toml::from_str(raw).map_err(EngineError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if let Some(language) = self.languages.iter().find(|l| l.code.trim().is_empty()) {
            return Err(EngineError::InvalidConfig(format!(
                "language '{}' has an empty code",
                language.full_name
            )));
        }
        if self.session.dir.as_os_str().is_empty() {
            return Err(EngineError::InvalidConfig(
                "session.dir cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Generator settings as an engine configuration
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .with_dialect(self.generator.dialect)
            .with_migration_path(&self.generator.migration_path)
            .with_sql_path(&self.generator.sql_path)
    }

    /// The `[[languages]]` entries as a registry
    pub fn language_registry(&self) -> LanguageList {
        LanguageList::new(self.languages.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::LanguageRegistry;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.generator.migration_path, PathBuf::from("migrations"));
        assert_eq!(config.generator.dialect, DatabaseType::MySQL);
        assert_eq!(config.generator.position, PositionPolicy::AfterAll);
        assert_eq!(config.generator.mode, ApplyMode::Migration);
        assert_eq!(config.session.dir, PathBuf::from(".field-lingo/sessions"));
        assert_eq!(config.logging.level, "info");
        assert!(config.languages.is_empty());
    }

    #[test]
    fn test_full_document() {
        let config = Config::parse(
            r#"
            [generator]
            migration_path = "console/migrations"
            dialect = "postgresql"
            position = "en"
            mode = "direct_sql"
            languages = ["en", "uk"]

            [session]
            dir = "/tmp/lingo"

            [logging]
            level = "debug"

            [[languages]]
            code = "uk"
            full_name = "Ukrainian"
            order = 2

            [[languages]]
            code = "en"
            full_name = "English"
            order = 1

            [[languages]]
            code = "pl"
            full_name = "Polish"
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.generator.dialect, DatabaseType::PostgreSQL);
        assert_eq!(
            config.generator.position,
            PositionPolicy::AfterLanguage("en".to_string())
        );
        assert_eq!(config.generator.mode, ApplyMode::DirectSql);
        assert_eq!(config.generator.languages, vec!["en", "uk"]);
        assert_eq!(config.logging.level, "debug");

        let engine = config.generator_config();
        assert_eq!(engine.migration_path, PathBuf::from("console/migrations"));
        assert_eq!(engine.dialect, DatabaseType::PostgreSQL);

        assert_eq!(config.language_registry().enabled_codes(), vec!["en", "uk"]);
    }

    #[test]
    fn test_position_aliases() {
        let config = Config::parse("[generator]\nposition = \"before-all\"\n").unwrap();
        assert_eq!(config.generator.position, PositionPolicy::BeforeAll);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(Config::parse("[generator]\ndialect = \"oracle\"\n").is_err());
        assert!(Config::parse("[generator]\nposition = \"\"\n").is_err());
        assert!(Config::parse("[[languages]]\ncode = \"\"\nfull_name = \"None\"\n").is_err());
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            Config::parse("[generator\n"),
            Err(EngineError::TomlParse(_))
        ));
        assert!(matches!(
            Config::parse("[session]\ndir = \"\"\n"),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lingo.toml");
        std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
