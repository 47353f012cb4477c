use std::{fs, path::PathBuf};

use serde_json::Value;
use tempfile::tempdir;

use plansheet::{PlansheetError, key::LayerKind};
use plansheet_cli::{Args, Command, execute};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("metadata.json")
}

fn args(input: impl Into<String>, command: Command) -> Args {
    Args {
        input: input.into(),
        config: None,
        log_level: "off".to_string(),
        command,
    }
}

/// Runs `command` against the fixture and returns stdout.
fn run_fixture(command: Command) -> Result<String, PlansheetError> {
    let args = args(fixture_path().to_string_lossy(), command);
    let mut out = Vec::new();
    execute(&args, &mut out)?;
    Ok(String::from_utf8(out).expect("output should be UTF-8"))
}

#[test]
fn e2e_validate_fixture() {
    let out = run_fixture(Command::Validate).expect("fixture should validate");
    assert_eq!(out, "valid: 2 drawings, 0 warnings\n");
}

#[test]
fn e2e_validate_reports_warnings() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut value: Value =
        serde_json::from_str(&fs::read_to_string(fixture_path()).unwrap()).unwrap();
    value["drawings"]["101"]["disciplines"]["건축"]["imageTransform"]["relativeTo"] =
        Value::from("missing.png");

    let input = temp_dir.path().join("metadata.json");
    fs::write(&input, value.to_string()).unwrap();

    let mut out = Vec::new();
    execute(&args(input.to_string_lossy(), Command::Validate), &mut out).expect("warnings do not fail");
    let out = String::from_utf8(out).unwrap();

    assert!(out.starts_with("valid: 2 drawings, 1 warnings\n"));
    assert!(out.contains("- drawings.101.disciplines.건축.imageTransform.relativeTo :: "));
}

#[test]
fn e2e_normalize_writes_output_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("normalized.json");

    let out = run_fixture(Command::Normalize {
        output: Some(output.to_string_lossy().to_string()),
    })
    .expect("normalize should succeed");
    assert!(out.is_empty());

    let json: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let layers = json["layersByKey"].as_object().expect("layersByKey object");
    assert_eq!(layers.len(), 8);
    assert_eq!(json["childrenByParent"]["00"], serde_json::json!(["101"]));
    assert_eq!(
        layers["discipline:101:건축"]["image"],
        "/drawings/101_arch_rev1.png"
    );
}

#[test]
fn e2e_list_filters_by_kind() {
    let out = run_fixture(Command::List {
        kind: Some(LayerKind::Revision),
    })
    .unwrap();

    let keys: Vec<&str> = out
        .lines()
        .map(|line| line.split('\t').next().unwrap())
        .collect();
    assert_eq!(keys.len(), 3);
    assert!(keys.contains(&"revision:101:건축::REV1"));
    assert!(keys.contains(&"revision:101:구조:A:REV1A"));
    assert!(keys.contains(&"revision:101:구조::REV2"));

    let all = run_fixture(Command::List { kind: None }).unwrap();
    assert_eq!(all.lines().count(), 8);
    assert!(all.lines().last().unwrap().starts_with("drawing:"));
}

#[test]
fn e2e_show_and_unknown_layer() {
    let out = run_fixture(Command::Show {
        key: "region:101:구조:A".to_string(),
    })
    .unwrap();
    let node: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(node["kind"], "region");
    assert_eq!(node["image"], "/drawings/101_struct.png");

    let err = run_fixture(Command::Show {
        key: "drawing:404".to_string(),
    })
    .unwrap_err();
    assert!(matches!(err, PlansheetError::UnknownLayer(_)));

    let err = run_fixture(Command::Show {
        key: "sheet:404".to_string(),
    })
    .unwrap_err();
    assert!(matches!(err, PlansheetError::Key(_)));
}

#[test]
fn e2e_overlays_and_children() {
    let out = run_fixture(Command::Overlays {
        key: "drawing:101".to_string(),
    })
    .unwrap();
    assert!(out.lines().any(|line| line.starts_with("discipline:101:구조\t")));
    assert!(out.lines().all(|line| !line.starts_with("drawing:101\t")));

    let roots = run_fixture(Command::Children { parent: None }).unwrap();
    assert_eq!(roots, "00\tSite Plan\n");

    let children = run_fixture(Command::Children {
        parent: Some("00".to_string()),
    })
    .unwrap();
    assert_eq!(children, "101\tGround Floor\n");
}

#[test]
fn e2e_decode_key_needs_no_input() {
    let mut out = Vec::new();
    let args = args(
        "/nonexistent/metadata.json",
        Command::DecodeKey {
            key: "revision:101:구조::REV2".to_string(),
        },
    );
    execute(&args, &mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "kind\trevision\ndrawing\t101\ndiscipline\t구조\nrevision\tREV2\n"
    );
}

#[test]
fn e2e_invalid_document_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("broken.json");
    fs::write(&input, r#"{ "project": { "name": "x" } }"#).unwrap();

    let result = execute(&args(input.to_string_lossy(), Command::Validate), &mut Vec::new());
    match result {
        Err(PlansheetError::Validation(err)) => {
            assert!(err.is_shape_error());
            assert!(err.errors().count() >= 3);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn e2e_missing_input_is_io_error() {
    let result = execute(
        &args("/nonexistent/metadata.json", Command::Validate),
        &mut Vec::new(),
    );
    assert!(matches!(result, Err(PlansheetError::Io(_))));
}
