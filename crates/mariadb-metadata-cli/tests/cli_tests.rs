//! CLI integration tests for mariadb-metadata.
//!
//! These tests cover argument parsing, help output and the exit codes of
//! configuration errors. None of them needs a running server.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the mariadb-metadata binary.
fn cmd() -> Command {
    Command::cargo_bin("mariadb-metadata").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("catalogs"))
        .stdout(predicate::str::contains("tables"))
        .stdout(predicate::str::contains("columns"))
        .stdout(predicate::str::contains("primary-keys"))
        .stdout(predicate::str::contains("imported-keys"))
        .stdout(predicate::str::contains("exported-keys"))
        .stdout(predicate::str::contains("cross-reference"))
        .stdout(predicate::str::contains("index-info"))
        .stdout(predicate::str::contains("type-info"))
        .stdout(predicate::str::contains("health-check"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mariadb-metadata"));
}

#[test]
fn test_tables_subcommand_help() {
    cmd()
        .args(["tables", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--catalog"))
        .stdout(predicate::str::contains("--table"))
        .stdout(predicate::str::contains("--types"));
}

#[test]
fn test_columns_subcommand_help() {
    cmd()
        .args(["columns", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--column"));
}

#[test]
fn test_index_info_subcommand_help() {
    cmd()
        .args(["index-info", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--unique"));
}

#[test]
fn test_health_check_command_exists() {
    cmd()
        .args(["health-check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test the database connection"));
}

// =============================================================================
// Global Flags Tests
// =============================================================================

#[test]
fn test_global_flags_and_defaults() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-json"))
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"))
        .stdout(predicate::str::contains("[default: config.yaml]"));
}

#[test]
fn test_short_config_flag() {
    cmd()
        .args(["-c", "some_config.yaml", "--help"])
        .assert()
        .success();
}

// =============================================================================
// Argument Errors
// =============================================================================

#[test]
fn test_no_subcommand_shows_usage() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_unknown_subcommand_fails() {
    cmd()
        .arg("drop-everything")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_cross_reference_requires_both_tables() {
    cmd()
        .args(["cross-reference", "--parent-table", "orders"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--child-table"));
}

// =============================================================================
// Exit Code Tests - Config Errors (Exit Code 2)
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_2() {
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "catalogs"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_invalid_yaml_exits_with_code_2() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("YAML error"));
}

#[test]
fn test_missing_required_fields_exits_with_code_2() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "connection:").unwrap();
    writeln!(file, "  host: localhost").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "tables"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_ssl_mode_exits_with_code_2() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "connection:").unwrap();
    writeln!(file, "  host: localhost").unwrap();
    writeln!(file, "  user: app").unwrap();
    writeln!(file, "  password: secret").unwrap();
    writeln!(file, "  ssl_mode: sometimes").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "type-info"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("secret").not());
}

// =============================================================================
// Connection Errors and Log Filtering
// =============================================================================

/// A valid config pointing at a port nothing listens on.
fn unreachable_config() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "connection:").unwrap();
    writeln!(file, "  host: 127.0.0.1").unwrap();
    writeln!(file, "  port: 1").unwrap();
    writeln!(file, "  user: app").unwrap();
    writeln!(file, "  ssl_mode: disabled").unwrap();
    writeln!(file, "  acquire_timeout_secs: 1").unwrap();
    file
}

#[test]
fn test_unreachable_server_exits_with_code_3() {
    let file = unreachable_config();

    cmd()
        .env_remove("RUST_LOG")
        .args(["--config", file.path().to_str().unwrap(), "catalogs"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Pool error"))
        .stderr(predicate::str::contains("Loaded configuration"));
}

#[test]
fn test_verbosity_filters_info_logs() {
    let file = unreachable_config();

    cmd()
        .env_remove("RUST_LOG")
        .args([
            "--config",
            file.path().to_str().unwrap(),
            "--verbosity",
            "error",
            "catalogs",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Loaded configuration").not());
}

#[test]
fn test_rust_log_overrides_verbosity() {
    let file = unreachable_config();

    cmd()
        .env("RUST_LOG", "warn")
        .args(["--config", file.path().to_str().unwrap(), "catalogs"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Loaded configuration").not());
}
