//! CLI integration tests for odbc-adapter.
//!
//! These tests run the binary without a database: schema operations go
//! through `migrate --dry-run`, which prints the SQL it would execute.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn cmd() -> Command {
    Command::cargo_bin("odbc-adapter").unwrap()
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const CONFIG: &str = r#"
connection:
  dialect: hana
  host: hana.local
  database: APP
  user: SYSTEM
  password: secret
"#;

const OPERATIONS: &str = r#"
- op: create_table
  name: users
  columns:
    - name: email
      type: string
      limit: 100
      null: false
- op: create_table
  name: audit_log
  storage: history
  id: false
  columns:
    - name: entry
      type: text
- op: rename_column
  table: users
  column: email
  new_name: mail
- op: drop_table
  name: audit_log
"#;

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn test_help_lists_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tables"))
        .stdout(predicate::str::contains("columns"))
        .stdout(predicate::str::contains("foreign-keys"))
        .stdout(predicate::str::contains("health-check"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("odbc-adapter"));
}

#[test]
fn test_migrate_help_shows_dry_run() {
    cmd()
        .args(["migrate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--file"));
}

#[test]
fn test_missing_subcommand_fails() {
    cmd().assert().failure();
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[test]
fn test_missing_config_file() {
    cmd()
        .args(["--config", "/nonexistent/config.yaml", "tables"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_invalid_config_rejected() {
    let config = write_temp("connection:\n  database: APP\n  user: SYSTEM\n");
    cmd()
        .arg("--config")
        .arg(config.path())
        .arg("tables")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("connection.host"));
}

#[test]
fn test_unknown_dialect_rejected() {
    let config = write_temp("connection:\n  dialect: oracle\n  host: h\n  database: D\n  user: u\n");
    cmd()
        .arg("--config")
        .arg(config.path())
        .arg("schemas")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("oracle"));
}

#[test]
fn test_malformed_operations_file() {
    let config = write_temp(CONFIG);
    let ops = write_temp("- op: truncate_everything\n");
    cmd()
        .arg("--config")
        .arg(config.path())
        .args(["migrate", "--dry-run", "--file"])
        .arg(ops.path())
        .assert()
        .code(1);
}

// =============================================================================
// Dry Run
// =============================================================================

#[test]
fn test_dry_run_prints_sql() {
    let config = write_temp(CONFIG);
    let ops = write_temp(OPERATIONS);
    cmd()
        .arg("--config")
        .arg(config.path())
        .args(["migrate", "--dry-run", "--file"])
        .arg(ops.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("SET SCHEMA \"APP\";"))
        .stdout(predicate::str::contains(
            "CREATE SEQUENCE \"users_seq\" INCREMENT BY 1 START WITH 1 NO CYCLE;",
        ))
        .stdout(predicate::str::contains(
            "CREATE COLUMN TABLE \"users\" (\"id\" INT NOT NULL PRIMARY KEY, \"email\" NVARCHAR(100) NOT NULL);",
        ))
        .stdout(predicate::str::contains(
            "CREATE HISTORY COLUMN TABLE \"audit_log\" (\"entry\" NCLOB);",
        ))
        .stdout(predicate::str::contains(
            "RENAME COLUMN \"users\".\"email\" TO \"mail\";",
        ))
        .stdout(predicate::str::contains("DROP SEQUENCE \"audit_log_seq\";"));
}

#[test]
fn test_dry_run_json_output() {
    let config = write_temp(CONFIG);
    let ops = write_temp("- op: create_schema\n  name: REPORTING\n");
    cmd()
        .arg("--config")
        .arg(config.path())
        .arg("--output-json")
        .args(["migrate", "--dry-run", "--file"])
        .arg(ops.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("["))
        .stdout(predicate::str::contains("\"CREATE SCHEMA \\\"REPORTING\\\"\""));
}

#[test]
fn test_dry_run_generic_dialect() {
    let config = write_temp("connection:\n  dialect: generic\n  host: h\n  database: D\n  user: u\n");
    let ops = write_temp("- op: create_table\n  name: t\n  storage: row\n");
    cmd()
        .arg("--config")
        .arg(config.path())
        .args(["migrate", "--dry-run", "--file"])
        .arg(ops.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("SET SCHEMA").not())
        .stdout(predicate::str::contains(
            "CREATE ROW TABLE \"t\" (\"id\" INTEGER NOT NULL PRIMARY KEY);",
        ));
}

#[test]
fn test_dry_run_logs_go_to_stderr() {
    let config = write_temp(CONFIG);
    let ops = write_temp("- op: drop_schema\n  name: OLD\n");
    cmd()
        .arg("--config")
        .arg(config.path())
        .args(["--verbosity", "debug"])
        .args(["migrate", "--dry-run", "--file"])
        .arg(ops.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("DROP SCHEMA \"OLD\";"))
        .stdout(predicate::str::contains("Executing").not());
}

// =============================================================================
// Live Commands Without ODBC
// =============================================================================

#[cfg(not(feature = "odbc"))]
#[test]
fn test_live_command_requires_odbc_build() {
    let config = write_temp(CONFIG);
    cmd()
        .arg("--config")
        .arg(config.path())
        .arg("tables")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--features odbc"));
}

#[cfg(not(feature = "odbc"))]
#[test]
fn test_live_migrate_requires_odbc_build() {
    let config = write_temp(CONFIG);
    let ops = write_temp(OPERATIONS);
    cmd()
        .arg("--config")
        .arg(config.path())
        .args(["migrate", "--file"])
        .arg(ops.path())
        .assert()
        .code(1);
}
