#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

/// Command isolated from the caller's manifest and n8n settings
fn n8nform(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("n8nform").unwrap();
    cmd.current_dir(dir)
        .env_remove("N8NFORM_CONFIG_PATH")
        .env_remove("N8N_ENDPOINT")
        .env_remove("N8N_API_KEY")
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1");
    cmd
}

/// Help lists every subcommand
#[test]
fn test_cli_help() {
    let dir = tempfile::tempdir().unwrap();
    n8nform(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("refresh"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("schema"));
}

/// Version works without a manifest
#[test]
fn test_cli_version() {
    let dir = tempfile::tempdir().unwrap();
    n8nform(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("n8nform"))
        .stdout(predicate::str::contains("provider n8n"));
}

/// Schema lists the registered types
#[test]
fn test_schema() {
    let dir = tempfile::tempdir().unwrap();
    n8nform(dir.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("resource n8n_workflow"))
        .stdout(predicate::str::contains("resource n8n_workflow_activation"))
        .stdout(predicate::str::contains("resource n8n_credential"))
        .stdout(predicate::str::contains("resource n8n_user"))
        .stdout(predicate::str::contains("data n8n_user"))
        .stdout(predicate::str::contains("forces replacement"));
}

/// Schema JSON is machine readable
#[test]
fn test_schema_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = n8nform(dir.path())
        .args(["schema", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let schemas: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        schemas["provider"]["attributes"]["api_key"]["sensitive"],
        true
    );
    assert!(schemas["resources"]["n8n_credential"].is_object());
    assert!(schemas["data_sources"]["n8n_credential"].is_null());
}

/// Commands that need a manifest fail clearly without one
#[test]
fn test_plan_without_manifest() {
    let dir = tempfile::tempdir().unwrap();
    n8nform(dir.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no manifest found"));
}

/// Missing provider settings name their environment variables
#[test]
fn test_plan_without_settings() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("n8nform.yaml"), "resources: []\n").unwrap();

    n8nform(dir.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("N8N_ENDPOINT"))
        .stderr(predicate::str::contains("N8N_API_KEY"));
}

/// An empty manifest against empty state plans nothing
#[test]
fn test_plan_empty_manifest() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("n8nform.yaml"), "resources: []\n").unwrap();

    n8nform(dir.path())
        .env("N8N_ENDPOINT", "http://127.0.0.1:9")
        .env("N8N_API_KEY", "test-key")
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes"));
}

/// Plan shows creates and masks sensitive values
#[test]
fn test_plan_masks_credential_data() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("n8nform.yaml"),
        r#"
provider:
  endpoint: http://127.0.0.1:9
  api_key: test-key
resources:
  - type: n8n_credential
    name: slack
    attributes:
      name: Slack
      type: slackApi
      data: '{"accessToken": "xoxb-secret"}'
"#,
    )
    .unwrap();

    n8nform(dir.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("n8n_credential.slack"))
        .stdout(predicate::str::contains("1 to create"))
        .stdout(predicate::str::contains("(sensitive)"))
        .stdout(predicate::str::contains("xoxb-secret").not());
}

/// Apply without --yes changes nothing
#[test]
fn test_apply_requires_yes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("n8nform.yaml"),
        r#"
provider:
  endpoint: http://127.0.0.1:9
  api_key: test-key
resources:
  - type: n8n_user
    name: alice
    attributes:
      email: alice@example.com
"#,
    )
    .unwrap();

    n8nform(dir.path())
        .arg("apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    assert!(!dir.path().join(".n8nform/state.json").exists());
}

/// State commands read local state only
#[test]
fn test_state_list_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("n8nform.yaml"), "resources: []\n").unwrap();

    n8nform(dir.path())
        .args(["state", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No resources in state"));

    n8nform(dir.path())
        .args(["state", "show", "n8n_workflow.missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not in state"));
}

/// Every manifest command is dispatched after loading the manifest
#[test]
fn test_data_without_declarations() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("n8nform.yaml"), "resources: []\n").unwrap();

    n8nform(dir.path())
        .arg("data")
        .assert()
        .success()
        .stdout(predicate::str::contains("No data sources declared"));

    n8nform(dir.path())
        .arg("refresh")
        .assert()
        .failure()
        .stderr(predicate::str::contains("N8N_ENDPOINT"));
}
