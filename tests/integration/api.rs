//! Integration tests for the library entry points

use crate::fixtures::{BAD_RETURN, IDENTITY, IDENTITY_USED_TWICE, THREE_UNKNOWN};
use std::fs;
use tempfile::TempDir;
use typeinfer::frontend::core::ast::NodeId;
use typeinfer::util::config::Config;
use typeinfer::{check_file, check_source, parse_source_unit};

#[test]
fn test_check_valid_source() {
    let report = check_source(IDENTITY, "identity.json", &Config::default()).unwrap();
    assert!(!report.has_errors());
    let lines = report.annotation_lines().unwrap();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3], (NodeId(3), "Integer".to_string()));
    assert_eq!(lines[4], (NodeId(4), "Integer -> Integer".to_string()));
}

#[test]
fn test_check_reports_located_diagnostic() {
    let report = check_source(BAD_RETURN, "bad.json", &Config::default()).unwrap();
    assert!(report.has_errors());
    assert_eq!(
        report.render_diagnostics(),
        "error[E2001]: type mismatch: `Bool` is not compatible with `Integer`\n  --> bad.json:3:5\n"
    );
}

#[test]
fn test_diagnostic_limit() {
    let config = Config::from_toml_str("[diagnostics]\nlimit = 1\n").unwrap();
    let report = check_source(THREE_UNKNOWN, "unknown.json", &config).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.suppressed, 2);
    assert!(report.render_diagnostics().ends_with("... and 2 more\n"));
}

#[test]
fn test_generalization_switch() {
    let report = check_source(IDENTITY_USED_TWICE, "poly.json", &Config::default()).unwrap();
    assert!(!report.has_errors());

    let config = Config::from_toml_str("[inference]\ngeneralize_functions = false\n").unwrap();
    let report = check_source(IDENTITY_USED_TWICE, "poly.json", &config).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].code, "E2001");
}

#[test]
fn test_json_report() {
    let report = check_source(BAD_RETURN, "bad.json", &Config::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(value["source"], "bad.json");
    assert_eq!(value["diagnostics"][0]["code"], "E2001");
    assert_eq!(value["diagnostics"][0]["severity"], "error");
    assert_eq!(value["annotations"][0]["node"], 0);
    assert_eq!(value["annotations"][0]["type"], "Bool");
}

#[test]
fn test_malformed_tree_is_an_error() {
    let err = parse_source_unit("{ \"declarations\": [ { \"kind\": \"Nope\" } ] }").unwrap_err();
    assert!(err.to_string().contains("Failed to parse syntax tree"));
}

#[test]
fn test_check_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("identity.json");
    fs::write(&path, IDENTITY).unwrap();
    let report = check_file(&path, &Config::default()).unwrap();
    assert!(!report.has_errors());
    assert_eq!(report.source_name, path.display().to_string());

    let missing = dir.path().join("missing.json");
    let err = check_file(&missing, &Config::default()).unwrap_err();
    assert!(err.to_string().contains("Failed to read file"));
}
