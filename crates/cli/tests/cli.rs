//! End-to-end tests of the `lingo` binary on JSON schema snapshots.

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = r#"{
  "tables": [
    {
      "name": "post",
      "columns": [
        { "name": "id", "type": "int(11)", "nullable": false },
        { "name": "title_en", "type": "varchar(255)", "nullable": false },
        { "name": "title_fr", "type": "varchar(255)", "nullable": false },
        { "name": "body_en", "type": "text", "nullable": true },
        { "name": "body_fr", "type": "text", "nullable": true },
        { "name": "created_at", "type": "datetime", "nullable": true }
      ]
    },
    {
      "name": "page",
      "columns": [
        { "name": "id", "type": "int(11)", "nullable": false },
        { "name": "name_en", "type": "varchar(128)", "nullable": false },
        { "name": "name_fr", "type": "varchar(128)", "nullable": false },
        { "name": "name_de", "type": "varchar(128)", "nullable": false }
      ]
    }
  ]
}"#;

/// Helper: temp workspace containing `schema.json`.
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("schema.json"), SCHEMA).unwrap();
    dir
}

/// Helper: `lingo` running inside `dir` with a clean environment.
fn lingo(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lingo").unwrap();
    cmd.current_dir(dir)
        .env_remove("DATABASE_URL")
        .env_remove("FIELD_LINGO_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn json_of(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

#[test]
fn test_discover_lists_complete_families() {
    let dir = workspace();
    lingo(dir.path())
        .args(["discover", "--schema", "schema.json", "--languages", "en,fr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("title"))
        .stdout(predicate::str::contains("body_en, body_fr"))
        .stdout(predicate::str::contains("3 families in 2 tables"));
}

#[test]
fn test_discover_json() {
    let dir = workspace();
    let output = lingo(dir.path())
        .args(["discover", "--schema", "schema.json", "-l", "en,de", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = json_of(&output.stdout);
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["table"], "page");
    assert_eq!(value[0]["families"][0]["base_name"], "name");
}

#[test]
fn test_generate_direct_statements() {
    let dir = workspace();
    let output = lingo(dir.path())
        .args([
            "generate",
            "--schema",
            "schema.json",
            "--languages",
            "en,fr",
            "--suffix",
            "de",
            "--mode",
            "direct-sql",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = json_of(&output.stdout);
    assert_eq!(
        value["prepared_statements"][0],
        "ALTER TABLE `post` ADD COLUMN `title_de` varchar(255) NOT NULL AFTER `title_fr`;"
    );
    assert_eq!(
        value["prepared_statements"][1],
        "ALTER TABLE `post` ADD COLUMN `body_de` text NULL AFTER `body_fr`;"
    );
    assert_eq!(value["skipped_fields"][0], "page.name_de");
    assert_eq!(
        value["message"],
        "Successfully prepared 2 SQL statement(s). Skipped 1 fields."
    );
    assert!(!dir.path().join("sql").exists());
}

#[test]
fn test_generate_before_all_text_output() {
    let dir = workspace();
    lingo(dir.path())
        .args([
            "generate",
            "--schema",
            "schema.json",
            "-l",
            "en,fr",
            "-s",
            "de",
            "-p",
            "before_all",
            "-m",
            "direct-sql",
            "-t",
            "post",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("AFTER `id`;"))
        .stdout(predicate::str::contains("AFTER `title_fr`;"))
        .stdout(predicate::str::contains("Successfully prepared 2 SQL statement(s)."));
}

#[test]
fn test_generate_migrations_are_stable_within_a_session() {
    let dir = workspace();
    let args = [
        "generate",
        "--schema",
        "schema.json",
        "--languages",
        "en,fr",
        "--suffix",
        "de",
        "--session",
        "review",
        "--json",
    ];

    let preview = lingo(dir.path()).args(args).output().unwrap();
    assert!(preview.status.success());
    let preview = json_of(&preview.stdout);
    assert!(dir.path().join(".field-lingo/sessions/review.json").exists());

    let written = lingo(dir.path())
        .args(args)
        .arg("--write")
        .output()
        .unwrap();
    assert!(written.status.success());
    let written = json_of(&written.stdout);

    assert_eq!(preview["generated_migrations"], written["generated_migrations"]);

    let name = written["generated_migrations"][0].as_str().unwrap();
    assert!(name.starts_with('m'));
    assert!(name.ends_with("_add_title_de_to_post.php"));

    let content = fs::read_to_string(dir.path().join("migrations").join(name)).unwrap();
    assert!(content.contains("extends Migration"));
    assert!(content.contains("AFTER `title_fr`"));
}

#[test]
fn test_session_clear() {
    let dir = workspace();
    lingo(dir.path())
        .args([
            "generate", "--schema", "schema.json", "-l", "en,fr", "-s", "de", "--session", "s1",
        ])
        .assert()
        .success();
    let session_file = dir.path().join(".field-lingo/sessions/s1.json");
    assert!(session_file.exists());

    lingo(dir.path())
        .args(["session", "clear", "--session", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session 's1' cleared"));
    assert!(!session_file.exists());

    lingo(dir.path())
        .args(["session", "clear", "--session", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("has no stored state"));
}

#[test]
fn test_invalid_suffix_is_rejected() {
    let dir = workspace();
    lingo(dir.path())
        .args(["generate", "--schema", "schema.json", "-l", "en,fr", "-s", "deu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Language suffix must be 2 letters."));
}

#[test]
fn test_missing_schema_source() {
    let dir = TempDir::new().unwrap();
    lingo(dir.path())
        .args(["discover", "-l", "en"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no schema source"));
}

#[test]
fn test_execute_requires_direct_mode() {
    let dir = workspace();
    lingo(dir.path())
        .args([
            "generate", "--schema", "schema.json", "-l", "en,fr", "-s", "de", "--execute",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--execute requires --mode direct-sql"));
}

#[test]
fn test_execute_without_database_url() {
    let dir = workspace();
    lingo(dir.path())
        .args([
            "generate", "--schema", "schema.json", "-l", "en,fr", "-s", "de", "-m", "direct-sql",
            "--execute",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--execute requires --database-url"));
}

#[test]
fn test_execute_connects_with_schema_snapshot() {
    // The snapshot supplies the schema; the URL is still used to execute
    let dir = workspace();
    lingo(dir.path())
        .args([
            "generate",
            "--schema",
            "schema.json",
            "--database-url",
            "not-a-mysql-url",
            "-l",
            "en,fr",
            "-s",
            "de",
            "-m",
            "direct-sql",
            "--execute",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("connecting for --execute"))
        .stderr(predicate::str::contains("requires --database-url").not());
}

#[test]
fn test_malformed_schema_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("schema.json"),
        r#"{"schema_version": 1, "schema": {"tables": [{"name": "post", "columns": [{"name": "title_en"}]}]}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("other.json"), r#"{"foo": 1}"#).unwrap();

    for file in ["schema.json", "other.json"] {
        lingo(dir.path())
            .args(["generate", "--schema", file, "-l", "en,fr", "-s", "de"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("loading schema"));
    }
}

#[test]
fn test_positions() {
    let dir = TempDir::new().unwrap();
    lingo(dir.path())
        .args(["positions", "--languages", "en,fr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Before all"))
        .stdout(predicate::str::contains("After fields ending with _fr"))
        .stdout(predicate::str::contains("After all"));
}

#[test]
fn test_languages_from_config() {
    let dir = workspace();
    fs::write(
        dir.path().join("field-lingo.toml"),
        r#"
[[languages]]
code = "fr"
full_name = "French"
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

    let output = lingo(dir.path())
        .args(["languages", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value = json_of(&output.stdout);
    let codes: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["en", "fr"]);

    // The registry also supplies the default selection
    lingo(dir.path())
        .args(["discover", "--schema", "schema.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[en, fr]"));
}
