use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dragsort(config_dir: &Path) -> Command {
    let config = config_dir.join("config.toml");
    if !config.exists() {
        fs::write(&config, "[logging]\nlevel = \"off\"\n").expect("write config");
    }
    let mut cmd = Command::cargo_bin("dragsort").expect("binary exists");
    cmd.env_remove("DRAGSORT_OVERLAP_POLICY")
        .env_remove("DRAGSORT_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn help_displays_usage() {
    Command::cargo_bin("dragsort")
        .expect("binary exists")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("replay"));
}

#[test]
fn replay_prints_instructions_as_json() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("move.yaml");
    fs::write(
        &script,
        r#"
lists:
  - name: todo
    items: [foo, bar, baz]
events:
  - { kind: start, list: todo, item: 0 }
  - { kind: hover, list: todo, item: 1 }
  - { kind: end }
"#,
    )
    .unwrap();

    dragsort(temp.path())
        .arg("replay")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""dragged_item": "foo""#))
        .stdout(predicate::str::contains(r#""target_index": 1"#))
        .stdout(predicate::str::contains(r#""emitted""#));
}

#[test]
fn overlap_flag_overrides_config() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("overlap.json");
    fs::write(
        &script,
        r#"{
  "lists": [{"name": "a", "items": ["x", "y"]}],
  "events": [
    {"kind": "start", "list": "a", "item": 0},
    {"kind": "start", "list": "a", "item": 1},
    {"kind": "end"}
  ]
}"#,
    )
    .unwrap();

    dragsort(temp.path())
        .args(["replay", "--overlap", "restart"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("restarted a[1]"));

    dragsort(temp.path())
        .args(["replay", "--overlap", "replace"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("restarted a[1]"));

    dragsort(temp.path())
        .arg("replay")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("ignored (overlapping-start)"));
}

#[test]
fn replay_rejects_unknown_extension() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("scenario.txt");
    fs::write(&script, "").unwrap();

    dragsort(temp.path())
        .arg("replay")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported script extension"));
}

#[test]
fn config_prints_effective_settings() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.toml"),
        "[engine]\noverlap_policy = \"restart\"\n[logging]\nlevel = \"off\"\n",
    )
    .unwrap();

    dragsort(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("overlap_policy = \"restart\""));
}
