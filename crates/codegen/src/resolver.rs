//! # Source Column Resolution
//!
//! Picks the existing column of a localized family that serves both as the
//! type template for the new column and as its positional anchor.

use lingo_core::PositionPolicy;
use lingo_ir::Table;

use crate::discovery::LocalizedFamily;

/// Resolve the source (template) column of a family under `policy`.
///
/// - `BeforeAll`: the earliest family column in the table.
/// - `AfterAll`: the latest family column.
/// - `AfterLanguage(code)`: `{base}_{code}` when the table has it,
///   otherwise the latest family column. The requested language does not
///   have to be part of the family.
///
/// Pure: calling it twice with the same inputs yields the same column.
pub fn resolve_source_column<'a>(
    table: &'a Table,
    family: &'a LocalizedFamily,
    policy: &PositionPolicy,
) -> Option<&'a str> {
    match policy {
        PositionPolicy::BeforeAll => family.first(),
        PositionPolicy::AfterAll => family.last(),
        PositionPolicy::AfterLanguage(code) => {
            let candidate = family.column_for(code);
            table
                .column(&candidate)
                .map(|c| c.name.as_str())
                .or_else(|| family.last())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_ir::Column;

    fn setup() -> (Table, LocalizedFamily) {
        let table = Table::new("post").with_columns([
            Column::not_null("id", "int(11)"),
            Column::not_null("title_en", "varchar(255)"),
            Column::not_null("title_fr", "varchar(255)"),
            Column::nullable("title_de", "varchar(255)"),
            Column::nullable("created_at", "datetime"),
        ]);
        let family = LocalizedFamily {
            base_name: "title".to_string(),
            columns: vec!["title_en".to_string(), "title_fr".to_string()],
        };
        (table, family)
    }

    fn after(code: &str) -> PositionPolicy {
        PositionPolicy::AfterLanguage(code.to_string())
    }

    #[test]
    fn test_before_and_after_all() {
        let (table, family) = setup();
        assert_eq!(
            resolve_source_column(&table, &family, &PositionPolicy::BeforeAll),
            Some("title_en")
        );
        assert_eq!(
            resolve_source_column(&table, &family, &PositionPolicy::AfterAll),
            Some("title_fr")
        );
    }

    #[test]
    fn test_after_language_in_family() {
        let (table, family) = setup();
        assert_eq!(resolve_source_column(&table, &family, &after("fr")), Some("title_fr"));
        assert_eq!(resolve_source_column(&table, &family, &after("en")), Some("title_en"));
    }

    #[test]
    fn test_after_language_missing_falls_back_to_last() {
        let (table, family) = setup();
        assert_eq!(resolve_source_column(&table, &family, &after("es")), Some("title_fr"));
    }

    #[test]
    fn test_after_language_outside_family_but_in_table() {
        let (table, family) = setup();
        assert_eq!(resolve_source_column(&table, &family, &after("de")), Some("title_de"));
    }

    #[test]
    fn test_empty_family() {
        let (table, _) = setup();
        let empty = LocalizedFamily {
            base_name: "title".to_string(),
            columns: vec![],
        };
        assert_eq!(resolve_source_column(&table, &empty, &PositionPolicy::BeforeAll), None);
        assert_eq!(resolve_source_column(&table, &empty, &PositionPolicy::AfterAll), None);
        assert_eq!(resolve_source_column(&table, &empty, &after("uk")), None);
    }
}
