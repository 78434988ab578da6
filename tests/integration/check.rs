//! Integration tests for the `typeinfer check` command

use crate::fixtures::{BAD_RETURN, IDENTITY, IDENTITY_USED_TWICE};
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn typeinfer_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_typeinfer"))
}

/// Helper function to create a test file
fn create_test_file(
    dir: &TempDir,
    name: &str,
    content: &str,
) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_check_valid_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(&temp_dir, "identity.json", IDENTITY);

    let output = Command::new(typeinfer_bin())
        .arg("check")
        .arg(&file)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#3: Integer"));
    assert!(stdout.contains("#4: Integer -> Integer"));
}

#[test]
fn test_check_invalid_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(&temp_dir, "bad.json", BAD_RETURN);

    let output = Command::new(typeinfer_bin())
        .arg("check")
        .arg(&file)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[E2001]"));
    assert!(stderr.contains(":3:5"));
}

#[test]
fn test_check_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(&temp_dir, "identity.json", IDENTITY);

    let output = Command::new(typeinfer_bin())
        .arg("check")
        .arg(&file)
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["annotations"].as_array().unwrap().len(), 5);
    assert!(value["diagnostics"].as_array().unwrap().is_empty());
}

#[test]
fn test_check_with_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(&temp_dir, "poly.json", IDENTITY_USED_TWICE);
    let config = create_test_file(
        &temp_dir,
        "typeinfer.toml",
        "[inference]\ngeneralize_functions = false\n",
    );

    let output = Command::new(typeinfer_bin())
        .arg("check")
        .arg(&file)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("`Integer` is not compatible with `Bool`"));
}

#[test]
fn test_check_nonexistent_file() {
    let output = Command::new(typeinfer_bin())
        .arg("check")
        .arg("/nonexistent/tree.json")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read file"));
}

#[test]
fn test_version() {
    let output = Command::new(typeinfer_bin())
        .arg("version")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("typeinfer "));
}
