//! CLI integration tests for the moots command-line interface.
//!
//! Parsing tests need no backend. The sign-in tests run the binary against a
//! mock backend, one process per phase, sharing a temporary config directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get a command for the moots binary with an isolated config directory.
fn moots(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("moots").unwrap();
    cmd.env("MOOTS_CONFIG_DIR", config_dir.path())
        .env_remove("MOOTS_SERVER_URL")
        .env_remove("MOOTS_ID_TOKEN");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Argument Parsing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    moots(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("me"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    moots(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("moots"));
}

#[test]
fn test_finish_requires_callback() {
    let dir = TempDir::new().unwrap();
    moots(&dir).args(["auth", "finish"]).assert().failure();
}

#[test]
fn test_finish_rejects_url_and_flags_together() {
    let dir = TempDir::new().unwrap();
    moots(&dir)
        .args([
            "auth",
            "finish",
            "?state=abc&code=xyz",
            "--state",
            "abc",
            "--code",
            "xyz",
        ])
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Local State
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_status_without_pending_sign_in() {
    let dir = TempDir::new().unwrap();
    moots(&dir)
        .args(["--json", "auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pending\": false"));
}

#[test]
fn test_finish_without_begin_fails_offline() {
    let dir = TempDir::new().unwrap();
    // Nothing listens here; the command must fail before any call is made.
    moots(&dir)
        .args(["--server", "http://127.0.0.1:9", "auth", "finish", "?state=abc&code=xyz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no pending authorization"));
}

#[test]
fn test_finish_missing_code_fails() {
    let dir = TempDir::new().unwrap();
    moots(&dir)
        .args(["auth", "finish", "?state=abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'code'"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Sign-in Against a Mock Backend
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_begin_then_finish() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mootslive.v1.UserService/BeginTwitterAuth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "redirectUrl": "https://idp.example/authorize?state=abc",
            "state": {"state": "abc", "pkceCodeVerifier": "def"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mootslive.v1.UserService/FinishTwitterAuth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"me": "user-token-123"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let uri = server.uri();

    moots(&dir)
        .args(["--server", uri.as_str(), "--json", "auth", "begin"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://idp.example/authorize?state=abc",
        ))
        .stdout(predicate::str::contains("\"state_persisted\": true"));

    moots(&dir)
        .args(["--json", "auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"usable\": true"));

    moots(&dir)
        .args([
            "--server",
            uri.as_str(),
            "--json",
            "auth",
            "finish",
            "http://localhost:3000/auth/twitter/callback?state=abc&code=xyz",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("user-token-123"));

    // The slot was consumed; a replayed callback cannot reach the backend.
    moots(&dir)
        .args([
            "--server",
            uri.as_str(),
            "auth",
            "finish",
            "--state",
            "abc",
            "--code",
            "xyz",
        ])
        .assert()
        .failure();
}
