use assert_cmd::Command;
use predicates::prelude::*;

fn judex() -> Command {
    Command::cargo_bin("judex").unwrap()
}

#[test]
fn test_classes_lists_known_codes() {
    judex()
        .arg("classes")
        .assert()
        .success()
        .stdout(predicate::str::contains("RE"))
        .stdout(predicate::str::contains("Recurso Extraordinário"));
}

#[test]
fn test_classes_json() {
    let output = judex().args(["classes", "--json"]).output().unwrap();
    assert!(output.status.success());

    let classes: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(classes.len(), 45);
    assert!(classes.iter().any(|c| c["code"] == "ADI"));
}

#[test]
fn test_scrape_rejects_unknown_class() {
    let dir = tempfile::tempdir().unwrap();
    judex()
        .args(["scrape", "-c", "XYZ", "-i", "1", "-f", "3", "-d"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid case class: XYZ"));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_scrape_rejects_inverted_range() {
    let dir = tempfile::tempdir().unwrap();
    judex()
        .args(["scrape", "-c", "RE", "-i", "10", "-f", "3", "-d"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid range"));
}

#[test]
fn test_scrape_rejects_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    judex()
        .args(["scrape", "-c", "RE", "-i", "1", "-f", "3", "-o", "xml", "-d"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output format: xml"));
}

#[test]
fn test_config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("judex").join("config.json");
    let path = path.to_str().unwrap();

    judex()
        .args(["--config", path, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    judex()
        .args(["--config", path, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    judex()
        .args(["--config", path, "config", "get", "batch.max_gap_rounds"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5"));

    judex()
        .args(["--config", path, "config", "set", "batch.max_gap_rounds", "2"])
        .assert()
        .success();

    judex()
        .args(["--config", path, "config", "get", "batch.max_gap_rounds"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));

    judex()
        .args(["--config", path, "config", "set", "browser.backend", "browserless"])
        .assert()
        .success();

    judex()
        .args(["--config", path, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"backend\": \"browserless\""));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let path = path.to_str().unwrap();

    judex()
        .args(["--config", path, "config", "set", "batch.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_set_rejects_unbounded_wait() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let path = path.to_str().unwrap();

    judex()
        .args(["--config", path, "config", "set", "loader.poll_interval_secs", "1e300"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loader.poll_interval_secs"));

    assert!(!std::path::Path::new(path).exists());
}

#[test]
fn test_config_path_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    judex()
        .arg("--config")
        .arg(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));
}
