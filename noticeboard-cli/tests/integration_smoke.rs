//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_top_level_help() {
    let mut cmd = Command::cargo_bin("noticeboard").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("init-db"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("noticeboard").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Port to bind"));
}

#[test]
fn test_init_db_fails_without_configuration() {
    let mut cmd = Command::cargo_bin("noticeboard").unwrap();
    cmd.arg("init-db");
    // No DATABASE_URL and no DB_* variables
    cmd.env_remove("DATABASE_URL")
        .env_remove("DB_NAME")
        .env_remove("DB_USER")
        .env_remove("DB_PASSWORD");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("database configuration incomplete"));
}
