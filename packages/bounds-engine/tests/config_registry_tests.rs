//! Configuration loading and checker registration

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

use bounds_engine::config::{ConfigError, CHECKER_CSTRING_BOUNDS};
use bounds_engine::features::symbolic::ProgramState;
use bounds_engine::shared::models::DiagnosticCategory;
use bounds_engine::{
    AnalyzerConfig, AnalyzerError, BufferUnderAccessChecker, CStringBoundsChecker, CheckerRegistry,
};

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(yaml.as_bytes()).expect("write config");
    file
}

#[test]
fn test_yaml_file_selects_checkers() {
    let file = write_config(
        "version: 1\n\
         checkers: [misrac-2012-21.17, cwe-127]\n\
         cstring:\n  max_scan_elements: 256\n",
    );
    let config = AnalyzerConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.cstring.max_scan_elements, 256);
    assert_eq!(config.cstring.length_bound_divisor, 4);

    let manager = CheckerRegistry::build(&config).unwrap();
    assert_eq!(
        manager.checker_names(),
        vec![CStringBoundsChecker::NAME, BufferUnderAccessChecker::NAME]
    );
}

#[test]
fn test_unknown_field_is_rejected() {
    let result = AnalyzerConfig::from_yaml_str("version: 1\nverbose: true\n");
    assert!(matches!(result, Err(ConfigError::Yaml(_))));
}

#[test]
fn test_unknown_checker_surfaces_as_analyzer_error() {
    let config = AnalyzerConfig::with_checkers(["misrac-2012-21.17", "cwe-121"]);
    let err = CheckerRegistry::build(&config).err().expect("unknown checker rejected");
    assert!(matches!(err, AnalyzerError::Config(ConfigError::UnknownChecker { .. })));
    assert!(err.to_string().contains("cwe-121"));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = AnalyzerConfig::from_yaml_file(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_diagnostics_export_as_json() {
    let mut manager = manager_with(&[CHECKER_CSTRING_BOUNDS]);
    let dst = char_buffer(1, "dst", 2);
    let call = CallBuilder::new(3, "strcpy")
        .ptr(decay(&dst))
        .ptr(literal(1, "xy"))
        .build();
    manager.run_eval_call(&call, ProgramState::new());
    assert_category_count(&manager, DiagnosticCategory::BufferOverflowWrite, 1);

    let json = manager.reporter().to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["category"], "buffer-overflow-write");
    assert_eq!(parsed[0]["checker"], "misrac-2012-21.17");
    assert_eq!(parsed[0]["span"]["start_line"], 3);
}

#[test]
fn test_runs_are_isolated() {
    let dst = char_buffer(1, "dst", 2);
    let call = CallBuilder::new(3, "strcpy")
        .ptr(decay(&dst))
        .ptr(literal(1, "xy"))
        .build();

    let mut first = full_manager();
    first.run_eval_call(&call, ProgramState::new());
    let second = full_manager();
    assert_eq!(first.diagnostics().len(), 1);
    assert_no_diagnostics(&second);
}
