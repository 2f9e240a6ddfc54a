//! # Localized Field Discovery
//!
//! Groups the columns of a table into localization families: columns that
//! share a base name and differ only by a trailing `_{language}` suffix.
//!
//! Only *complete* families are returned, i.e. families that have exactly
//! one column for every selected base language. A table with `title_en`,
//! `title_fr` and `body_en` yields the single family `title` for the
//! selection `[en, fr]`.

use lingo_core::EngineResult;
use lingo_ir::{SchemaProvider, Table};
use serde::Serialize;

// ============================================================================
// LocalizedFamily
// ============================================================================

/// A complete group of localized columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedFamily {
    /// Column name without the language suffix, e.g. "page_title"
    pub base_name: String,

    /// Existing column names, in table declaration order
    pub columns: Vec<String>,
}

impl LocalizedFamily {
    /// Name of the column this family would get for `suffix`
    pub fn column_for(&self, suffix: &str) -> String {
        format!("{}_{}", self.base_name, suffix)
    }

    /// Earliest column of the family in the table
    pub fn first(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }

    /// Latest column of the family in the table
    pub fn last(&self) -> Option<&str> {
        self.columns.last().map(String::as_str)
    }
}

/// Families found in one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFamilies {
    pub table: String,
    pub families: Vec<LocalizedFamily>,
}

// ============================================================================
// Discovery
// ============================================================================

/// Find the complete localized families of `table` for the selected base
/// languages.
///
/// Column names are split on their **last** underscore, so `page_title_en`
/// belongs to base `page_title`. Suffixes are matched exactly and
/// case-sensitively. Families are returned in the order their base first
/// appears in the table. An empty selection yields no families.
pub fn discover<S: AsRef<str>>(table: &Table, languages: &[S]) -> Vec<LocalizedFamily> {
    let mut selected: Vec<&str> = Vec::with_capacity(languages.len());
    for lang in languages {
        let lang = lang.as_ref();
        if !selected.contains(&lang) {
            selected.push(lang);
        }
    }
    if selected.is_empty() {
        return Vec::new();
    }

    // base -> columns, in order of first appearance
    let mut candidates: Vec<(&str, Vec<&str>)> = Vec::new();
    for column in &table.columns {
        let Some((base, suffix)) = column.split_suffix() else {
            continue;
        };
        if !selected.contains(&suffix) {
            continue;
        }

        match candidates.iter_mut().find(|(b, _)| *b == base) {
            Some((_, names)) => {
                if !names.contains(&column.name.as_str()) {
                    names.push(column.name.as_str());
                }
            }
            None => candidates.push((base, vec![column.name.as_str()])),
        }
    }

    candidates
        .into_iter()
        .filter(|(_, names)| names.len() == selected.len())
        .map(|(base, mut names)| {
            names.sort_by_key(|name| table.position_of(name).unwrap_or(usize::MAX));
            LocalizedFamily {
                base_name: base.to_string(),
                columns: names.into_iter().map(str::to_string).collect(),
            }
        })
        .collect()
}

/// Run [`discover`] over every table of a schema, skipping tables without
/// complete families.
pub fn discover_schema<S: AsRef<str>>(
    provider: &dyn SchemaProvider,
    languages: &[S],
) -> EngineResult<Vec<TableFamilies>> {
    let tables = provider.list_tables()?;
    Ok(tables
        .iter()
        .map(|table| TableFamilies {
            table: table.name.clone(),
            families: discover(table, languages),
        })
        .filter(|tf| !tf.families.is_empty())
        .collect())
}

// ============================================================================
// Tests
// ============================================================================
