use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's config directory and environment
fn backoffice(data_dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("backoffice");
    cmd.env("BACKOFFICE_CLI_DATA_DIR", data_dir.path())
        .env_remove("BACKOFFICE_API_URL")
        .env_remove("BACKOFFICE_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    backoffice(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("audit"));
}

#[test]
fn config_shows_effective_api_url() {
    let dir = TempDir::new().unwrap();
    backoffice(&dir)
        .args(["--api-url", "http://backoffice.test:9000/", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://backoffice.test:9000"))
        .stdout(predicate::str::contains("session.json"));
}

#[test]
fn config_reads_api_url_from_env() {
    let dir = TempDir::new().unwrap();
    backoffice(&dir)
        .env("BACKOFFICE_API_URL", "http://from-env:8000")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://from-env:8000"));
}

#[test]
fn audit_list_requires_login() {
    let dir = TempDir::new().unwrap();
    backoffice(&dir)
        .args(["audit", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn logout_without_session_succeeds() {
    let dir = TempDir::new().unwrap();
    backoffice(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));
}

#[test]
fn whoami_without_session() {
    let dir = TempDir::new().unwrap();
    backoffice(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn diff_shows_changed_fields_only() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.json");
    let new = dir.path().join("new.json");
    std::fs::write(&old, r#"{"stake": 10, "status": "open", "odds": 2}"#).unwrap();
    std::fs::write(&new, r#"{"stake": 20, "status": "open", "odds": 2.0}"#).unwrap();

    backoffice(&dir)
        .args(["audit", "diff", "--old"])
        .arg(&old)
        .arg("--new")
        .arg(&new)
        .assert()
        .success()
        .stdout(predicate::str::contains("Field Changes (1)"))
        .stdout(predicate::str::contains("Stake [Changed]"))
        .stdout(predicate::str::contains("Status").not())
        .stdout(predicate::str::contains("Odds").not());
}

#[test]
fn diff_all_includes_unchanged() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.json");
    let new = dir.path().join("new.json");
    std::fs::write(&old, r#"{"stake": 10, "status": "open"}"#).unwrap();
    std::fs::write(&new, r#"{"stake": 20, "status": "open"}"#).unwrap();

    backoffice(&dir)
        .args(["audit", "diff", "--all", "--old"])
        .arg(&old)
        .arg("--new")
        .arg(&new)
        .assert()
        .success()
        .stdout(predicate::str::contains("Status [Unchanged]"));
}

#[test]
fn diff_creation_lists_every_field_as_added() {
    let dir = TempDir::new().unwrap();
    let new = dir.path().join("new.json");
    std::fs::write(&new, r#"{"name": "Football", "active": true}"#).unwrap();

    backoffice(&dir)
        .args(["audit", "diff", "--new"])
        .arg(&new)
        .assert()
        .success()
        .stdout(predicate::str::contains("Field Changes (2)"))
        .stdout(predicate::str::contains("Active [Added]"))
        .stdout(predicate::str::contains("Name [Added]"));
}

#[test]
fn diff_without_snapshots() {
    let dir = TempDir::new().unwrap();
    backoffice(&dir)
        .args(["audit", "diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No data to compare"));
}

#[test]
fn diff_identical_snapshots() {
    let dir = TempDir::new().unwrap();
    let snap = dir.path().join("snap.json");
    std::fs::write(&snap, r#"{"tags": ["a", "b"], "meta": {"x": 1}}"#).unwrap();

    backoffice(&dir)
        .args(["audit", "diff", "--old"])
        .arg(&snap)
        .arg("--new")
        .arg(&snap)
        .assert()
        .success()
        .stdout(predicate::str::contains("No field changes detected"));
}

#[test]
fn invalid_operation_filter_is_rejected() {
    let dir = TempDir::new().unwrap();
    backoffice(&dir)
        .args(["audit", "list", "--operation", "upsert"])
        .assert()
        .failure();
}

#[test]
fn diff_of_empty_and_malformed_snapshots_reports_no_changes() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.json");
    let new = dir.path().join("new.json");
    std::fs::write(&old, "{}").unwrap();
    std::fs::write(&new, "not json").unwrap();

    backoffice(&dir)
        .args(["audit", "diff", "--old"])
        .arg(&old)
        .arg("--new")
        .arg(&new)
        .assert()
        .success()
        .stdout("No field changes detected\n");
}

#[test]
fn diff_of_two_empty_objects_reports_no_changes() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty.json");
    std::fs::write(&empty, "{}").unwrap();

    backoffice(&dir)
        .args(["audit", "diff", "--old"])
        .arg(&empty)
        .arg("--new")
        .arg(&empty)
        .assert()
        .success()
        .stdout(predicate::str::contains("No field changes detected"))
        .stdout(predicate::str::contains("No data to compare").not());
}

#[test]
fn config_set_persists_setting() {
    let dir = TempDir::new().unwrap();
    backoffice(&dir)
        .args(["config", "set", "page_size", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated page_size"));

    assert!(dir.path().join("config.json").exists());

    backoffice(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page size:       25"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    backoffice(&dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));

    assert!(!dir.path().join("config.json").exists());
}
