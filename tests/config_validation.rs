// tests/config_validation.rs

use std::error::Error;
use std::io::Write;

use shipwright::config::{ProjectKind, load_and_validate};
use shipwright::errors::ShipwrightError;
use tempfile::NamedTempFile;

type TestResult = Result<(), Box<dyn Error>>;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_parses_with_declaration_order_preserved() -> TestResult {
    let file = config_file(
        r#"
[layout]
dist_dir = "out"

[[project]]
name = "capture"
dir = "capture"
kind = "cmake"
preset = "release"

[[project]]
name = "daemon"
dir = "daemon"
kind = "cargo"
features = ["libcamera"]

[[project]]
name = "frontend"
dir = "frontend"
kind = "web"
public_url = "/admin/"
install_to = "www/admin"

[[project]]
name = "models"
dir = "models"
kind = "assets"
source_dir = "models"
install_to = "models"
deploy = false

[[model]]
url = "https://example.com/files/detector.onnx"

[runtime]
member_prefix = "libonnxruntime.so"
install_name = "libonnxruntime.so"

[runtime.source]
linux-x86_64 = "https://example.com/runtime-linux-x64.tgz/download"
"#,
    );

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.layout.dist_dir, "out");
    assert_eq!(cfg.layout.var_dir, "var");

    let names: Vec<&str> = cfg.project.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["capture", "daemon", "frontend", "models"]);

    match &cfg.project[0].kind {
        ProjectKind::Cmake { preset } => assert_eq!(preset, "release"),
        other => panic!("Expected cmake kind, got {:?}", other),
    }
    match &cfg.project[1].kind {
        ProjectKind::Cargo { features, .. } => assert_eq!(features, &["libcamera".to_string()]),
        other => panic!("Expected cargo kind, got {:?}", other),
    }

    let deployable: Vec<&str> = cfg.deployable_projects().map(|p| p.name.as_str()).collect();
    assert_eq!(deployable, vec!["capture", "daemon", "frontend"]);

    assert_eq!(cfg.model.len(), 1);
    let runtime = cfg.runtime.as_ref().expect("runtime section");
    assert!(runtime.source.contains_key("linux-x86_64"));

    Ok(())
}

#[test]
fn duplicate_project_names_are_rejected() {
    let file = config_file(
        r#"
[[project]]
name = "daemon"
dir = "daemon"
kind = "cargo"

[[project]]
name = "daemon"
dir = "daemon2"
kind = "cargo"
"#,
    );

    match load_and_validate(file.path()) {
        Err(ShipwrightError::ConfigError(msg)) => {
            assert!(msg.contains("duplicate"));
            assert!(msg.contains("daemon"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other.err()),
    }
}

#[test]
fn empty_config_is_rejected() {
    let file = config_file("");

    match load_and_validate(file.path()) {
        Err(ShipwrightError::ConfigError(msg)) => {
            assert!(msg.contains("at least one"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other.err()),
    }
}

#[test]
fn unknown_project_kind_fails_deserialization() {
    let file = config_file(
        r#"
[[project]]
name = "daemon"
dir = "daemon"
kind = "makefile"
"#,
    );

    match load_and_validate(file.path()) {
        Err(ShipwrightError::Toml(_)) => {}
        other => panic!("Expected Toml error, got: {:?}", other.err()),
    }
}

#[test]
fn web_project_requires_install_destination() {
    let file = config_file(
        r#"
[[project]]
name = "frontend"
dir = "frontend"
kind = "web"
public_url = "/admin/"
install_to = ""
"#,
    );

    match load_and_validate(file.path()) {
        Err(ShipwrightError::ConfigError(msg)) => {
            assert!(msg.contains("install_to"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other.err()),
    }
}

#[test]
fn runtime_requires_a_source_platform() {
    let file = config_file(
        r#"
[[project]]
name = "daemon"
dir = "daemon"
kind = "cargo"

[runtime]
member_prefix = "libonnxruntime.so"
install_name = "libonnxruntime.so"
"#,
    );

    match load_and_validate(file.path()) {
        Err(ShipwrightError::ConfigError(msg)) => {
            assert!(msg.contains("[runtime.source]") || msg.contains("platform"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other.err()),
    }
}
