//! Integration tests for the `venntry` CLI binary.
//!
//! Argument parsing, help output, completions and config handling run
//! without a backend; the session flow runs against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `venntry` binary with env isolation.
///
/// Clears all `VENNTRY_*` env vars and points config and data directories
/// at `home` so tests never touch the user's real configuration.
fn venntry_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("venntry");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("VENNTRY_API_URL")
        .env_remove("VENNTRY_UPLOAD_URL")
        .env_remove("VENNTRY_ENVIRONMENT")
        .env_remove("VENNTRY_TIMEOUT")
        .env_remove("VENNTRY_CA_CERT")
        .env_remove("VENNTRY_DATA_DIR")
        .env_remove("VENNTRY_OUTPUT")
        .env_remove("VENNTRY_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = venntry_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("inventories")
            .and(predicate::str::contains("products"))
            .and(predicate::str::contains("warehouses"))
            .and(predicate::str::contains("auth")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("venntry"));
}

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = venntry_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("foobar"), "Expected error naming the subcommand:\n{text}");
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = venntry_cmd(home.path())
        .args(["--output", "xml", "products", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("possible values"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_without_file() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(unset)"));
}

#[test]
fn test_config_init_writes_file() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path())
        .args([
            "config",
            "init",
            "--api-url",
            "https://api.example.com/api",
            "--environment",
            "production",
        ])
        .assert()
        .success();

    venntry_cmd(home.path())
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://api.example.com/api")
                .and(predicate::str::contains("production")),
        );

    // A second init without --force refuses to overwrite.
    venntry_cmd(home.path())
        .args(["config", "init", "--api-url", "https://other.example.com/api"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_config_init_rejects_bad_url() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path())
        .args(["config", "init", "--api-url", "ftp://files.example.com"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("api_url"));
}

#[test]
fn test_env_var_supplies_api_url() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path())
        .env("VENNTRY_API_URL", "https://env.example.com/api")
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://env.example.com/api"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_products_list_without_config() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path())
        .args(["products", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No API URL configured"));
}

#[test]
fn test_products_list_requires_login() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:9/api", "products", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_invalid_login_input_is_rejected_locally() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path())
        .args([
            "--api-url",
            "http://127.0.0.1:9/api",
            "auth",
            "login",
            "--email",
            "not-an-email",
            "--password",
            "secret1",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("email"));
}

#[test]
fn test_unreachable_server_is_a_connection_error() {
    let home = tempfile::tempdir().unwrap();
    venntry_cmd(home.path())
        .args([
            "--api-url",
            "http://127.0.0.1:9/api",
            "auth",
            "login",
            "--email",
            "ada@example.com",
            "--password",
            "secret1",
        ])
        .assert()
        .code(7);
}

// ── Session flow ────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_list_logout_flow() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();
    let api_url = format!("{}/api", server.uri());
    let user_id = "8f14e45f-ceea-467a-9575-3c5a2b6f0d11";
    let inv_id = "0b2f6c3e-7d0a-4c55-9a3e-2f7f5f1c9d21";
    let product_id = "5a4b3c2d-1e0f-4a9b-8c7d-6e5f4a3b2c1d";

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": user_id,
            "userName": "ada",
            "email": "ada@example.com",
            "avatar": null,
            "token": "jwt-1",
            "inventories": [{ "id": inv_id, "name": "Main", "userId": user_id }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/inventories/{inv_id}/products")))
        .and(header("authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": product_id,
            "name": "Bolt",
            "sku": "B-1",
            "quantity": 4,
            "cost": 0.1,
            "price": 0.25
        }])))
        .expect(1)
        .mount(&server)
        .await;

    venntry_cmd(home.path())
        .args([
            "--api-url",
            &api_url,
            "auth",
            "login",
            "--email",
            "ada@example.com",
            "--password",
            "secret1",
            "-o",
            "plain",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(user_id));

    venntry_cmd(home.path())
        .args(["--api-url", &api_url, "inventories", "current", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(inv_id));

    venntry_cmd(home.path())
        .args(["--api-url", &api_url, "products", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(product_id));

    venntry_cmd(home.path())
        .args(["--api-url", &api_url, "auth", "logout"])
        .assert()
        .success();

    venntry_cmd(home.path())
        .args(["--api-url", &api_url, "auth", "status", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"authenticated\": false"));

    venntry_cmd(home.path())
        .args(["--api-url", &api_url, "products", "list"])
        .assert()
        .code(3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_duplicate_registration_is_a_conflict() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();
    let api_url = format!("{}/api", server.uri());

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "type": "CONFLICT",
            "message": "User with this email already exists",
            "code": 409
        })))
        .mount(&server)
        .await;

    venntry_cmd(home.path())
        .args([
            "--api-url",
            &api_url,
            "auth",
            "register",
            "--username",
            "ada",
            "--email",
            "ada@example.com",
            "--password",
            "secret1",
        ])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("already exists"));

    venntry_cmd(home.path())
        .args(["--api-url", &api_url, "auth", "status", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"authenticated\": false"));
}
