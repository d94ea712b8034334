#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mnumi.toml"), "").unwrap();
        Self { dir }
    }

    fn with_config(config: &str) -> Self {
        let env = Self::new();
        fs::write(env.config_path(), config).unwrap();
        env
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn config_path(&self) -> std::path::PathBuf {
        self.path().join("mnumi.toml")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("mnumi"));
        cmd.env("NO_COLOR", "1")
            .env_remove("MNUMI_LOG")
            .arg("--config")
            .arg(self.config_path())
            .arg("--data-dir")
            .arg(self.path().join("uploads"));
        cmd
    }
}

#[test]
fn test_calendar_create_list_get_delete() {
    let env = Env::new();

    env.cmd()
        .args([
            "calendars", "create", "Birthdays", "--type", "name-day", "--locale", "en",
            "--event", "03-14=Alice",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("birthdays.name-day.en"))
        .stdout(predicate::str::contains("Alice"));

    assert!(env
        .path()
        .join("uploads/mnumidesigner-calendars/birthdays.name-day.en.json")
        .is_file());

    env.cmd()
        .args(["calendars", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("birthdays.name-day.en"))
        .stdout(predicate::str::contains("1 events"));

    let output = env
        .cmd()
        .args(["calendars", "get", "birthdays.name-day.en", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["id"], "birthdays.name-day.en");
    assert_eq!(doc["events"][0]["cyclic"], true);
    assert_eq!(doc["events"][0]["name"], "Alice");
    assert!(doc["_links"]["events"][0]["embeddable"].as_bool().unwrap());

    env.cmd()
        .args(["calendars", "delete", "birthdays.name-day.en"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    env.cmd()
        .args(["calendars", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No calendars found."));
}

#[test]
fn test_list_include_prints_pagination_headers() {
    let env = Env::new();
    for name in ["one", "two", "three"] {
        env.cmd()
            .args(["calendars", "create", name, "--type", "national-day", "--locale", "pl"])
            .assert()
            .success();
    }

    env.cmd()
        .args(["calendars", "list", "--type", "national-day", "--per-page", "1", "--page", "2", "-i", "--fields", "id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("X-WP-Total: 3"))
        .stdout(predicate::str::contains("X-WP-TotalPages: 3"))
        .stdout(predicate::str::contains("rel=\"prev\""))
        .stdout(predicate::str::contains("rel=\"next\""));
}

#[test]
fn test_get_missing_prints_empty_object() {
    let env = Env::new();
    env.cmd()
        .args(["translations", "get", "missing.editor.en", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{}"));
}

#[test]
fn test_invalid_input_exits_with_usage_code() {
    let env = Env::new();
    env.cmd()
        .args(["calendars", "get", "not-an-id"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid resource id"));

    env.cmd()
        .args(["calendars", "list", "--per-page", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("per_page"));
}

#[test]
fn test_translation_update_with_stale_version_is_refused() {
    let env = Env::new();
    let output = env
        .cmd()
        .args(["translations", "create", "shop", "--locale", "en", "--entry", "save=Save", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let version = doc["version"].as_str().unwrap().to_string();

    env.cmd()
        .args(["translations", "update", "shop.editor.en", "--entry", "save=Store", "--if-version", &version])
        .assert()
        .success();

    env.cmd()
        .args(["translations", "update", "shop.editor.en", "--entry", "save=Keep", "--if-version", &version])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Version conflict"));

    let stored = fs::read_to_string(
        env.path()
            .join("uploads/mnumidesigner-translations/shop.editor.en.json"),
    )
    .unwrap();
    assert_eq!(stored, r#"{"save":"Store"}"#);
}

#[test]
fn test_translations_merge_with_dictionary_dir() {
    let dict = TempDir::new().unwrap();
    fs::write(
        dict.path().join("en.json"),
        r#"{"locale":"en","translations":{"en":{"editor":{"hello":"Hello","bye":"Bye"}}}}"#,
    )
    .unwrap();
    let env = Env::with_config(&format!(
        "dictionary_dir = {:?}\n",
        dict.path().to_str().unwrap()
    ));

    env.cmd()
        .args(["translations", "create", "greeting", "--locale", "en", "--entry", "hello=Hi"])
        .assert()
        .success();

    let output = env
        .cmd()
        .args(["translations", "get", "greeting.editor.en", "--json", "--fields", "translations"])
        .output()
        .unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        doc["translations"],
        serde_json::json!([
            {"id": "hello", "original": "Hello", "translation": "Hi"},
            {"id": "bye", "original": "Bye", "translation": "Bye"}
        ])
    );
}
