//! CLI Integration Tests for pyfold
//!
//! These tests execute the binary and verify correct behavior for:
//! - Outline output (text and JSON)
//! - Fold-range output
//! - Cross-module superclass resolution via --modules
//! - Error handling

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test directory with sample modules
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();

    fs::write(
        temp_dir.path().join("app.py"),
        "class Calculator(base.Widget):\n    def add(self, a, b):\n        return a + b\n\n    def sub(self, a, b):\n        return a - b\n\ndef main():\n    return 0\n",
    )
    .unwrap();

    fs::write(
        temp_dir.path().join("base.py"),
        "class Widget:\n    pass\n",
    )
    .unwrap();

    temp_dir
}

#[test]
fn test_outline_text_output() {
    let project = create_test_project();

    Command::cargo_bin("pyfold")
        .unwrap()
        .arg("outline")
        .arg(project.path().join("app.py"))
        .assert()
        .success()
        .stdout(predicate::str::contains("class Calculator 1-6"))
        .stdout(predicate::str::contains("    add 2-3"))
        .stdout(predicate::str::contains("    sub 5-6"))
        .stdout(predicate::str::contains("def main 8-9"));
}

#[test]
fn test_outline_json_output() {
    let project = create_test_project();

    let output = Command::cargo_bin("pyfold")
        .unwrap()
        .arg("outline")
        .arg(project.path().join("app.py"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["module"], "app");
    assert_eq!(json["line_count"], 9);
    assert_eq!(json["outline"][0]["kind"], "class");
    assert_eq!(json["outline"][0]["name"], "Calculator");
    assert_eq!(json["outline"][1]["kind"], "function");
    assert_eq!(json["outline"][1]["lines"]["start"], 8);
}

#[test]
fn test_folds_text_output() {
    let project = create_test_project();

    Command::cargo_bin("pyfold")
        .unwrap()
        .arg("folds")
        .arg(project.path().join("app.py"))
        .assert()
        .success()
        .stdout("2 3\n5 6\n8 9\n");
}

#[test]
fn test_folds_json_output() {
    let project = create_test_project();

    let output = Command::cargo_bin("pyfold")
        .unwrap()
        .arg("folds")
        .arg(project.path().join("app.py"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 3);
    assert_eq!(json[0]["start"], 2);
    assert_eq!(json[0]["end"], 3);
}

#[test]
fn test_modules_flag_resolves_cross_module_bases() {
    let project = create_test_project();

    let output = Command::cargo_bin("pyfold")
        .unwrap()
        .arg("outline")
        .arg(project.path().join("app.py"))
        .arg("--format")
        .arg("json")
        .arg("--modules")
        .arg(project.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let base = &json["outline"][0]["bases"][0];
    assert_eq!(base["external"]["module"], "base");
    assert_eq!(base["external"]["name"], "Widget");
}

#[test]
fn test_unresolved_base_without_modules_flag() {
    let project = create_test_project();

    let output = Command::cargo_bin("pyfold")
        .unwrap()
        .arg("outline")
        .arg(project.path().join("app.py"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["outline"][0]["bases"][0]["name"], "base.Widget");
}

#[test]
fn test_missing_file_fails_with_context() {
    Command::cargo_bin("pyfold")
        .unwrap()
        .arg("outline")
        .arg("definitely-not-here.py")
        .assert()
        .failure()
        .stderr(predicate::str::contains("definitely-not-here.py"));
}

#[test]
fn test_tab_size_flag_is_accepted() {
    let project = create_test_project();
    fs::write(
        project.path().join("tabs.py"),
        "def f():\n\treturn 1\n",
    )
    .unwrap();

    Command::cargo_bin("pyfold")
        .unwrap()
        .arg("outline")
        .arg(project.path().join("tabs.py"))
        .arg("--tab-size")
        .arg("4")
        .assert()
        .success()
        .stdout(predicate::str::contains("def f 1-2"));
}
