#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary with a clean authority environment; tests opt into a token
/// source and mock authority address per case.
fn tokenwatch(dir: &TempDir, vault_addr: &str) -> Command {
    let mut cmd = Command::cargo_bin("tokenwatch").unwrap();
    cmd.current_dir(dir.path())
        .env("VAULT_ADDR", vault_addr)
        .env("VAULT_TOKEN", "integration-test")
        .env(
            "TOKENWATCH_TOKENS_FILE",
            dir.path().join("tokens.yaml"),
        )
        .env("TOKENWATCH_TIMEOUT_SECS", "2");
    cmd
}

fn write_tokens(dir: &TempDir, yaml: &str) {
    std::fs::write(dir.path().join("tokens.yaml"), yaml).unwrap();
}

// ---------------------------------------------------------------------------
// configuration
// ---------------------------------------------------------------------------

#[test]
fn missing_vault_token_is_a_clear_error() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("tokenwatch").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("VAULT_TOKEN")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("VAULT_TOKEN is not set"));
}

#[test]
fn help_lists_all_subcommands() {
    Command::cargo_bin("tokenwatch")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("renew"))
        .stdout(predicate::str::contains("revoke"))
        .stdout(predicate::str::contains("serve"));
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[test]
fn list_with_missing_source_warns_and_prints_empty_table() {
    let dir = TempDir::new().unwrap();
    // No tokens.yaml written; address is never contacted for zero tokens.
    tokenwatch(&dir, "http://127.0.0.1:1")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("ACCESSOR"))
        .stderr(predicate::str::contains("unreadable"));
}

#[test]
fn list_reports_statuses_from_authority() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1/auth/token/lookup-accessor")
        .with_status(200)
        .with_body(r#"{"data":{"policies":["default"],"expire_time":"2030-01-01T00:00:00Z"}}"#)
        .create();

    let dir = TempDir::new().unwrap();
    write_tokens(&dir, "tokens:\n  - accessor: acc-1\n    name: ci deploy\n");

    tokenwatch(&dir, &server.url())
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"ci deploy\""))
        .stdout(predicate::str::contains("\"state\": \"active\""));
}

#[test]
fn list_isolates_a_failing_entry() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1/auth/token/lookup-accessor")
        .with_status(403)
        .with_body(r#"{"errors":["permission denied"]}"#)
        .expect_at_least(1)
        .create();

    let dir = TempDir::new().unwrap();
    write_tokens(&dir, "tokens:\n  - accessor: acc-1\n  - name: orphan\n");

    tokenwatch(&dir, &server.url())
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("permission_denied"))
        .stdout(predicate::str::contains("missing_accessor"));
}

// ---------------------------------------------------------------------------
// renew / revoke
// ---------------------------------------------------------------------------

#[test]
fn renew_prints_success_message() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1/auth/token/renew-accessor")
        .with_status(200)
        .with_body(r#"{"auth":{}}"#)
        .create();

    let dir = TempDir::new().unwrap();
    tokenwatch(&dir, &server.url())
        .args(["renew", "acc-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renewed token acc-1"));
}

#[test]
fn revoke_unknown_accessor_fails_with_invalid_accessor_message() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1/auth/token/revoke-accessor")
        .with_status(400)
        .with_body(r#"{"errors":["invalid accessor"]}"#)
        .create();

    let dir = TempDir::new().unwrap();
    tokenwatch(&dir, &server.url())
        .args(["revoke", "gone"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid accessor gone"));
}

#[test]
fn renew_requires_an_accessor_argument() {
    let dir = TempDir::new().unwrap();
    tokenwatch(&dir, "http://127.0.0.1:1")
        .arg("renew")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ACCESSOR"));
}

#[test]
fn renew_rejects_out_of_range_increment() {
    let dir = TempDir::new().unwrap();
    tokenwatch(&dir, "http://127.0.0.1:1")
        .args(["renew", "acc-1", "--increment-hours", "99999999999999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
