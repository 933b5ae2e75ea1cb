use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn swdocs(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("swdocs").unwrap();
    cmd.env("SWDOCS_HOME", home)
        .env_remove("SWDOCS_SERVER")
        .env_remove("SWDOCS_DB")
        .env_remove("SWDOCS_USER")
        .env_remove("SWDOCS_PORT")
        .env("SWDOCS_LOGLEVEL", "off")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn create_get_list_delete() {
    let home = tempfile::tempdir().unwrap();

    swdocs(home.path())
        .args(["create", "--name", "kafka", "--description", "Event broker"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Document created: kafka"));

    swdocs(home.path())
        .args(["get", "kafka"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kafka").and(predicate::str::contains("Event broker")));

    swdocs(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("kafka"));

    swdocs(home.path())
        .args(["delete", "kafka"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Document deleted: kafka"));

    swdocs(home.path())
        .args(["get", "kafka"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Document not found: kafka"));

    assert!(home.path().join("swdocs.db").exists());
}

#[test]
fn duplicate_create_fails() {
    let home = tempfile::tempdir().unwrap();

    swdocs(home.path())
        .args(["create", "--name", "kafka"])
        .assert()
        .success();

    swdocs(home.path())
        .args(["create", "--name", "kafka"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn create_with_sections_file() {
    let home = tempfile::tempdir().unwrap();
    let sections = home.path().join("sections.json");
    std::fs::write(
        &sections,
        r#"[{"header": "Dashboards", "links": [{"url": "http://kibana", "description": "Kibana"}]}]"#,
    )
    .unwrap();

    swdocs(home.path())
        .args(["create", "--name", "kafka", "--file"])
        .arg(&sections)
        .assert()
        .success();

    swdocs(home.path())
        .args(["get", "kafka"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboards").and(predicate::str::contains("http://kibana")));
}

#[test]
fn apply_from_stdin_creates_then_updates() {
    let home = tempfile::tempdir().unwrap();

    swdocs(home.path())
        .args(["apply", "--file", "-"])
        .write_stdin(r#"{"name": "kafka", "description": "broker"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Document created: kafka"));

    swdocs(home.path())
        .args(["--user", "ana", "apply", "-f", "-"])
        .write_stdin(r#"{"name": "kafka", "description": "broker v2"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Document updated: kafka"));

    let output = swdocs(home.path())
        .args(["get", "kafka", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["description"], "broker v2");
    assert_eq!(doc["user"], "ana");
    assert_ne!(doc["created"], doc["updated"]);
}

#[test]
fn apply_rejects_bad_json() {
    let home = tempfile::tempdir().unwrap();

    swdocs(home.path())
        .args(["apply", "--file", "-"])
        .write_stdin("{name:")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid document"));
}

#[test]
fn search_uses_wildcards() {
    let home = tempfile::tempdir().unwrap();
    for name in ["kafka", "kafka-connect", "zookeeper"] {
        swdocs(home.path())
            .args(["create", "--name", name])
            .assert()
            .success();
    }

    swdocs(home.path())
        .args(["search", "kafka"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kafka-connect").and(predicate::str::contains("zookeeper").not()));

    swdocs(home.path())
        .args(["search", "none-such%"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No documents match"));
}

#[test]
fn config_set_and_show() {
    let home = tempfile::tempdir().unwrap();

    swdocs(home.path())
        .args(["config", "port", "9090"])
        .assert()
        .success()
        .stdout(predicate::str::contains("port set to 9090"));

    swdocs(home.path())
        .args(["config", "port"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9090"));

    swdocs(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("port = 9090").and(predicate::str::contains("host = 127.0.0.1")));

    swdocs(home.path())
        .args(["config", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key: colour"));
}

#[test]
fn db_env_override() {
    let home = tempfile::tempdir().unwrap();
    let db = home.path().join("elsewhere").join("docs.db");

    swdocs(home.path())
        .env("SWDOCS_DB", &db)
        .args(["create", "--name", "kafka"])
        .assert()
        .success();

    assert!(db.exists());
    assert!(!home.path().join("swdocs.db").exists());
}
