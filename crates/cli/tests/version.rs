use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

struct Fixture {
    _temp: TempDir,
    project: PathBuf,
    builds: PathBuf,
    forks: PathBuf,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = tempdir().unwrap();
        let project = temp.path().join("project");
        for dir in ["modules/system/classes", "themes/demo", "config"] {
            fs::create_dir_all(project.join(dir)).unwrap();
        }
        fs::write(project.join("config/app.php"), "<?php return [];\n").unwrap();
        fs::write(project.join("config/cms.php"), "<?php return [];\n").unwrap();
        fs::write(project.join("modules/system/a.php"), "<?php // a\n").unwrap();
        fs::write(project.join("modules/system/b.php"), "<?php // b\n").unwrap();
        fs::write(project.join("modules/system/classes/c.php"), "<?php // c\n").unwrap();

        let builds = temp.path().join("builds.json");
        let forks = temp.path().join("forks.json");
        let config = temp.path().join("config.toml");
        fs::write(&forks, r#"{"forks":{}}"#).unwrap();
        fs::write(&config, "").unwrap();

        Self {
            _temp: temp,
            project,
            builds,
            forks,
            config,
        }
    }

    #[allow(deprecated)]
    fn winter(&self) -> Command {
        let mut cmd = Command::cargo_bin("winter").expect("binary");
        cmd.env_remove("WINTER_MANIFEST_URL")
            .env_remove("WINTER_FORKS_URL")
            .env_remove("WINTER_HTTP_TIMEOUT_SECS")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config)
            .arg("--manifest-url")
            .arg(&self.builds)
            .arg("--forks-url")
            .arg(&self.forks);
        cmd
    }

    fn fingerprint(&self) -> Value {
        let output = self
            .winter()
            .arg("fingerprint")
            .arg(&self.project)
            .args(["--files", "--json"])
            .output()
            .expect("command run");
        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("valid json")
    }

    /// Write a two-build history whose second build is the fixture project as created.
    fn write_history(&self) {
        let fingerprint = self.fingerprint();
        let files = fingerprint["files"].clone();
        let manifest = json!({
            "manifest": [
                {
                    "build": "1.0.0",
                    "parent": null,
                    "modules": {"system": "stale"},
                    "files": {
                        "added": {"/modules/system/a.php": "old-a"},
                        "modified": [],
                        "removed": []
                    }
                },
                {
                    "build": "1.0.1",
                    "parent": "1.0.0",
                    "modules": fingerprint["modules"].clone(),
                    "files": {"added": files, "modified": [], "removed": []}
                }
            ]
        });
        fs::write(&self.builds, manifest.to_string()).unwrap();
    }
}

fn project_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn fingerprint_reports_detected_modules() {
    let fixture = Fixture::new();
    let fingerprint = fixture.fingerprint();

    assert_eq!(fingerprint["schema_version"], 1);
    let modules = fingerprint["modules"].as_object().expect("modules object");
    assert_eq!(modules.keys().collect::<Vec<_>>(), vec!["system"]);
    let files = fingerprint["files"].as_object().expect("files object");
    assert!(files.contains_key("/modules/system/classes/c.php"));
    assert_eq!(files.len(), 3);
}

#[test]
fn pristine_project_is_detected_exactly() {
    let fixture = Fixture::new();
    fixture.write_history();

    fixture
        .winter()
        .args(["version", project_arg(&fixture.project)])
        .assert()
        .success()
        .stdout("Detected Winter CMS build 1.0.1.\n");

    fixture
        .winter()
        .args(["project:version", project_arg(&fixture.project), "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""modified": false"#));
}

#[test]
fn added_file_is_listed_in_detailed_output() {
    let fixture = Fixture::new();
    fixture.write_history();
    fs::write(fixture.project.join("modules/system/new.php"), "<?php // new\n").unwrap();

    fixture
        .winter()
        .args(["version", project_arg(&fixture.project), "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Detected a modified version of Winter CMS build 1.0.1.\n",
        ))
        .stdout(predicate::str::contains(
            "Files added:\n - /modules/system/new.php\n",
        ))
        .stdout(predicate::str::contains("Files modified:").not())
        .stdout(predicate::str::contains("Files removed:").not());

    let output = fixture
        .winter()
        .args(["version", project_arg(&fixture.project), "--detailed", "--json"])
        .output()
        .expect("command run");
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["build"], "1.0.1");
    assert_eq!(report["modified"], true);
    assert_eq!(report["confident"], true);
    assert_eq!(report["score"], 66.67);
    assert!(report["changes"]["added"]["/modules/system/new.php"].is_string());
}

#[test]
fn builds_are_listed_in_version_order() {
    let fixture = Fixture::new();
    fixture.write_history();

    fixture
        .winter()
        .arg("builds")
        .assert()
        .success()
        .stdout("1.0.0\n1.0.1\n");
}

#[test]
fn state_of_first_build_is_its_own_diff() {
    let fixture = Fixture::new();
    fixture.write_history();

    let output = fixture
        .winter()
        .args(["state", "1.0.0", "--json"])
        .output()
        .expect("command run");
    assert!(output.status.success());
    let state: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state, json!({"/modules/system/a.php": "old-a"}));
}

#[test]
fn unknown_build_yields_json_error_envelope() {
    let fixture = Fixture::new();
    fixture.write_history();

    let output = fixture
        .winter()
        .args(["state", "9.9.9", "--json"])
        .output()
        .expect("command run");
    assert!(!output.status.success());
    let envelope: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(envelope["code"], "unknown_build");
}

#[test]
fn non_installation_directory_is_rejected() {
    let fixture = Fixture::new();
    fixture.write_history();
    let empty = tempdir().unwrap();

    let output = fixture
        .winter()
        .args(["version", project_arg(empty.path()), "--json"])
        .output()
        .expect("command run");
    assert!(!output.status.success());
    let envelope: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(envelope["code"], "invalid_installation");

    fixture
        .winter()
        .args(["version", project_arg(empty.path())])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not appear to be a Winter CMS installation"));
}

#[test]
fn missing_manifest_is_a_manifest_error() {
    let fixture = Fixture::new();

    let output = fixture
        .winter()
        .args(["builds", "--json"])
        .output()
        .expect("command run");
    assert!(!output.status.success());
    let envelope: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(envelope["code"], "manifest_error");
}

#[test]
fn unknown_config_keys_fail_fast() {
    let fixture = Fixture::new();
    fs::write(&fixture.config, "[manifest]\nurl = \"x\"\n").unwrap();

    fixture
        .winter()
        .arg("builds")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field"));
}
