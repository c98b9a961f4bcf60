//! Integration tests for geoshape CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::path::PathBuf;
use std::process::{Command, Output};

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_geoshape"))
}

/// Get the path to the small world topology fixture.
fn world_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // Go up from geoshape-cli to the workspace root
    path.push("test_assets/world-mini.topo.json");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn projections_command_lists_catalog() {
    let output = run(&["projections"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mercator"), "Should list mercator");
    assert!(stdout.contains("albers-usa"), "Should list albers-usa");
    assert!(stdout.contains("orthographic"), "Should list orthographic");

    // Header plus one line per projection
    let line_count = stdout.lines().count();
    assert_eq!(line_count, 15, "Should list 14 projections, got {}", line_count);
}

#[test]
fn projections_command_json() {
    let output = run(&["projections", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let rows: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(rows.as_array().map(Vec::len), Some(14));
}

#[test]
fn render_command_produces_svg() {
    let world = world_path();
    if !world.exists() {
        eprintln!("Skipping test - fixture not found at {:?}", world);
        return;
    }

    let output = run(&["render", world.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<?xml"), "Should have XML declaration");
    assert!(stdout.contains("<svg"), "Should have SVG element");
    assert!(stdout.contains(r#"id="Geo Shape""#), "Should have the root group");
    assert!(stdout.contains("<path"), "Should have path elements");
    assert!(stdout.contains("</svg>"), "Should close SVG element");
}

#[test]
fn render_json_reports_projection_and_stroke() {
    let world = world_path();
    if !world.exists() {
        eprintln!("Skipping test - fixture not found at {:?}", world);
        return;
    }

    let output = run(&["render", world.to_str().unwrap(), "--continent", "EU", "-p", "equal-earth", "--json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["projection"], "equal-earth");
    assert_eq!(json["paths"].as_array().map(Vec::len), Some(1), "France and Germany merge");
    let scale = json["scale"].as_f64().unwrap();
    let stroke = json["strokeWidth"].as_f64().unwrap();
    assert!((scale * stroke - 1.0).abs() < 1e-9, "stroke keeps its apparent width");
}

#[test]
fn request_command_groups_countries_by_continent() {
    let world = world_path();
    if !world.exists() {
        eprintln!("Skipping test - fixture not found at {:?}", world);
        return;
    }

    let output = run(&["request", world.to_str().unwrap(), "--continent", "NA", "--borders"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#""mode": "grouped""#), "{}", stdout);
    assert!(stdout.contains(r#""groupName": "North America""#), "{}", stdout);
    assert!(stdout.contains(r#""groupName": "Canada""#), "{}", stdout);
    assert!(stdout.contains(r#""fillRule": "EVENODD""#), "{}", stdout);
}

#[test]
fn state_file_restores_last_selection() {
    let world = world_path();
    if !world.exists() {
        eprintln!("Skipping test - fixture not found at {:?}", world);
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");
    let state = state.to_str().unwrap();

    let first = run(&["request", world.to_str().unwrap(), "--state-file", state, "--country", "392"]);
    assert!(first.status.success(), "stderr: {}", String::from_utf8_lossy(&first.stderr));

    let saved = std::fs::read_to_string(state).unwrap();
    assert!(saved.contains("geoshape.selection"), "{}", saved);

    // No selection flags: the saved country comes back
    let second = run(&["request", world.to_str().unwrap(), "--state-file", state]);
    assert!(second.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn preview_command_writes_png() {
    let world = world_path();
    if !world.exists() {
        eprintln!("Skipping test - fixture not found at {:?}", world);
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("preview.png");

    let output = run(&[
        "preview", world.to_str().unwrap(), "-o", png.to_str().unwrap(), "--width", "200", "--height", "100",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let bytes = std::fs::read(&png).unwrap();
    assert_eq!(&bytes[1..4], b"PNG", "PNG signature");
}

#[test]
fn bad_arguments_exit_with_error() {
    let output = run(&["render", "--projection", "nope"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: unknown projection"), "{}", stderr);

    let output = run(&["frobnicate"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn mismatched_country_is_refused() {
    let world = world_path();
    if !world.exists() {
        eprintln!("Skipping test - fixture not found at {:?}", world);
        return;
    }

    let output = run(&["render", world.to_str().unwrap(), "--continent", "EU", "--country", "840"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not in Europe"), "{}", stderr);
}
