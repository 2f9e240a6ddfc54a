//! Descriptive migration type hints
//!
//! Maps a declared database type such as `varchar(255)` to the short
//! migration-builder expression it corresponds to (`string(255)`). The hint
//! only ends up in generated comments; nothing relies on it being exact.

use regex::Regex;
use std::sync::LazyLock;

static VARCHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^varchar\((\d+)\)$").expect("valid regex"));
static CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^char\((\d+)\)$").expect("valid regex"));
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^int(?:eger)?(?:\(\d+\))?$").expect("valid regex"));

/// Best-effort migration hint for a declared type
pub fn migration_type_hint(db_type: Option<&str>) -> String {
    let Some(db_type) = db_type else {
        return "string".to_string();
    };
    let db_type = db_type.trim();

    if let Some(caps) = VARCHAR.captures(db_type) {
        return format!("string({})", &caps[1]);
    }
    if let Some(caps) = CHAR.captures(db_type) {
        return format!("char({})", &caps[1]);
    }
    if INTEGER.is_match(db_type) {
        return "integer".to_string();
    }

    let lower = db_type.to_ascii_lowercase();
    if lower.contains("tinyint(1)") {
        "boolean".to_string()
    } else if lower.contains("text") {
        "text".to_string()
    } else if lower.contains("datetime") {
        "dateTime".to_string()
    } else if lower.contains("timestamp") {
        "timestamp".to_string()
    } else {
        db_type.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_hints() {
        let cases = [
            (None, "string"),
            (Some("varchar(255)"), "string(255)"),
            (Some("VARCHAR(64)"), "string(64)"),
            (Some("char(2)"), "char(2)"),
            (Some("int"), "integer"),
            (Some("int(11)"), "integer"),
            (Some("INTEGER"), "integer"),
            (Some("tinyint(1)"), "boolean"),
            (Some("mediumtext"), "text"),
            (Some("datetime"), "dateTime"),
            (Some("timestamp"), "timestamp"),
            (Some("  decimal(10,2) "), "decimal(10,2)"),
        ];

        for (input, expected) in cases {
            assert_eq!(migration_type_hint(input), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn test_int_with_unsigned_is_raw() {
        assert_eq!(migration_type_hint(Some("int(10) unsigned")), "int(10) unsigned");
    }
}
