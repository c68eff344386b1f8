//! End-to-end tests for the `fitgen-fn` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const ABC123: &str = "/v1/projects/fitgen-test/databases/(default)/documents/special_user/abc123";

const ENV_VARS: &[&str] = &[
    "FITGEN_PROJECT_ID",
    "GOOGLE_CLOUD_PROJECT",
    "FIRESTORE_DATABASE",
    "FIRESTORE_EMULATOR_HOST",
    "FIRESTORE_BASE_URL",
    "FIRESTORE_ACCESS_TOKEN",
    "FITGEN_COLLECTION",
    "PORT",
    "FITGEN_LOG",
    "RUST_LOG",
];

/// Command running in an empty directory with no ambient configuration
fn fitgen_fn(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fitgen-fn").unwrap();
    cmd.current_dir(dir.path());
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_invoke_dry_run_by_uid() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir)
        .args(["invoke", "--dry-run", "--uid", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("special_user/abc123"))
        .stdout(predicate::str::contains("already_absent"))
        .stdout(predicate::str::contains("nothing was deleted"));
}

#[test]
fn test_invoke_help_describes_dry_run() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir)
        .args(["invoke", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("empty in-memory store"));
}

#[test]
fn test_invoke_dry_run_json_report() {
    let dir = TempDir::new().unwrap();
    let output = fitgen_fn(&dir)
        .args(["invoke", "--dry-run", "--uid", "abc123", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["uid"], "abc123");
    assert_eq!(report["path"], "special_user/abc123");
    assert_eq!(report["outcome"], "already_absent");
}

#[test]
fn test_invoke_dry_run_reads_event_from_stdin() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir)
        .args(["invoke", "--dry-run"])
        .write_stdin(r#"{"eventId":"e-1","data":{"uid":"from-stdin"}}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("special_user/from-stdin"));
}

#[test]
fn test_invoke_dry_run_reads_event_file() {
    let dir = TempDir::new().unwrap();
    let event = dir.path().join("event.json");
    fs::write(&event, r#"{"uid":"from-file","email":"a@example.com"}"#).unwrap();

    fitgen_fn(&dir)
        .args(["invoke", "--dry-run", "--event"])
        .arg(&event)
        .assert()
        .success()
        .stdout(predicate::str::contains("special_user/from-file"));
}

#[test]
fn test_invoke_invalid_event_exit_code() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir)
        .args(["invoke", "--dry-run"])
        .write_stdin(r#"{"email":"a@example.com"}"#)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid event"));
}

#[test]
fn test_invoke_invalid_uid_exit_code() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir)
        .args(["invoke", "--dry-run", "--uid", "a/b"])
        .assert()
        .code(2);
}

#[test]
fn test_invoke_uid_and_event_conflict() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir)
        .args(["invoke", "--uid", "abc", "--event", "x.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_config_defaults() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("no config file found"))
        .stdout(predicate::str::contains("special_user"));
}

#[test]
fn test_config_file_and_env_layering() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".fitgen-functions.toml"),
        "[store]\nproject_id = \"fitgen-staging\"\n\n[cleanup]\ncollection = \"profiles\"\n",
    )
    .unwrap();

    let output = fitgen_fn(&dir)
        .env("FITGEN_COLLECTION", "special_user_v2")
        .args(["config", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let json_start = stdout.find('{').unwrap();
    let schema: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    assert_eq!(schema["store"]["project_id"], "fitgen-staging");
    assert_eq!(schema["cleanup"]["collection"], "special_user_v2");
}

#[test]
fn test_config_never_prints_token() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir)
        .env("FIRESTORE_ACCESS_TOKEN", "ya29.secret-token")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("ya29.secret-token").not());
}

#[test]
fn test_missing_explicit_config_exit_code() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir)
        .args(["--config", "does-not-exist.toml", "config"])
        .assert()
        .code(3);
}

#[test]
fn test_malformed_config_exit_code() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fitgen-functions.toml"), "[store\nproject_id = 1").unwrap();

    fitgen_fn(&dir).arg("config").assert().code(3);
}

#[test]
fn test_health_without_project_is_config_error() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir).arg("health").assert().code(3);
}

#[test]
fn test_invoke_unreachable_store_is_temporary_failure() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir)
        .env("FITGEN_PROJECT_ID", "fitgen-test")
        .env("FIRESTORE_BASE_URL", "http://127.0.0.1:9")
        .args(["invoke", "--uid", "abc123"])
        .assert()
        .code(75);
}

#[test]
fn test_config_warns_about_reserved_collection() {
    let dir = TempDir::new().unwrap();
    fitgen_fn(&dir)
        .env("FITGEN_PROJECT_ID", "fitgen-test")
        .env("FITGEN_COLLECTION", "__x__")
        .arg("config")
        .assert()
        .success()
        .stderr(predicate::str::contains("reserved"));
}

/// Run `invoke --uid abc123` against a mock store answering DELETE with `status`
async fn invoke_against(status: u16, body: serde_json::Value) -> std::process::Output {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(ABC123))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let base_url = format!("{}/v1", server.uri());
    tokio::task::spawn_blocking(move || {
        let dir = TempDir::new().unwrap();
        fitgen_fn(&dir)
            .env("FITGEN_PROJECT_ID", "fitgen-test")
            .env("FIRESTORE_BASE_URL", base_url)
            .args(["invoke", "--uid", "abc123"])
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invoke_deletes_through_rest_store() {
    let output = invoke_against(200, serde_json::json!({})).await;
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("special_user/abc123"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invoke_permission_denied_is_store_error() {
    let output = invoke_against(
        403,
        serde_json::json!({
            "error": { "code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED" }
        }),
    )
    .await;

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("E4002"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invoke_missing_database_is_store_error() {
    let output = invoke_against(
        404,
        serde_json::json!({
            "error": {
                "code": 404,
                "message": "The database (default) does not exist for project fitgen-test",
                "status": "NOT_FOUND"
            }
        }),
    )
    .await;

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("E4006"));
}
