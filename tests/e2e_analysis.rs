// ModSleuth - tests/e2e_analysis.rs
//
// End-to-end tests for the log analysis pipeline.
//
// These tests exercise the real filesystem, real walkdir traversal, and the
// real classifiers against on-disk fixtures: a game directory holding a
// standard timestamped log, a clean log, and a redscript log.

use modsleuth::app::analyze::{run_analysis, AnalysisRequest};
use modsleuth::core::discovery::{discover_files, DiscoveryConfig};
use modsleuth::core::export::{export_csv, export_json};
use std::path::PathBuf;
use std::process::Command;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn game_dir() -> PathBuf {
    fixture("game")
}

fn analyse_game_dir() -> modsleuth::app::analyze::AnalysisRun {
    let request = AnalysisRequest {
        root: Some(game_dir()),
        ..Default::default()
    };
    run_analysis(&request).expect("fixture analysis should succeed")
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn e2e_discovers_only_log_files_in_path_order() {
    let (files, warnings) =
        discover_files(&game_dir(), &DiscoveryConfig::default(), |_, _| {}).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let names: Vec<_> = files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["clean.log", "cyber_engine_tweaks.log", "redscript_rCURRENT.log"],
        "README.txt must be skipped and files sorted by path"
    );
}

// =============================================================================
// Analysis
// =============================================================================

#[test]
fn e2e_analysis_totals() {
    let run = analyse_game_dir();
    let report = &run.report;

    assert_eq!(report.total_files, 3);
    assert_eq!(report.clean_count, 1);
    assert_eq!(report.error_count, 2);
    assert_eq!(report.warning_count, 3);
    assert!(report.missing.is_empty());
    assert!(run.warnings.is_empty(), "unexpected warnings: {:?}", run.warnings);
}

#[test]
fn e2e_standard_log_entries_are_classified_with_continuations() {
    let report = analyse_game_dir().report;

    assert_eq!(
        report.errors[0].text,
        "[2024-03-01 18:02:12] Failed to load mod 'brokenmod'\n  stack traceback:\n    [C]: in ?",
        "continuation lines belong to the preceding entry"
    );
    assert_eq!(
        report.errors[1].text, "[2024-03-01 18:02:13] Warning: Archive override detected",
        "capitalised Warning misses the warning substring and hits the exception keyword"
    );
    assert_eq!(
        report.warnings[0].text,
        "[2024-03-01 18:02:12] warning: mod 'nativeSettings' uses deprecated API"
    );
}

#[test]
fn e2e_redscript_blocks_are_warnings_only() {
    let report = analyse_game_dir().report;

    let redscript: Vec<_> = report
        .warnings
        .iter()
        .filter(|r| r.source_file.ends_with("redscript_rCURRENT.log"))
        .collect();
    assert_eq!(redscript.len(), 2);
    assert_eq!(
        redscript[0].text,
        "[WARN - Sat, 2 Mar 2024 10:00:01] At mods\\hud.reds:12:5:\n    let x = y;"
    );
    assert_eq!(
        redscript[1].text,
        "[WARN - Sat, 2 Mar 2024 10:00:03] Unused variable 'error'"
    );
    assert!(
        report
            .errors
            .iter()
            .all(|r| !r.source_file.ends_with("redscript_rCURRENT.log")),
        "redscript logs never produce errors"
    );
}

#[test]
fn e2e_clean_file_is_listed_by_name() {
    let report = analyse_game_dir().report;
    assert_eq!(report.clean_files.len(), 1);
    assert_eq!(report.clean_files[0].name, "clean.log");
}

#[test]
fn e2e_missing_listed_file_is_reported_not_fatal() {
    let request = AnalysisRequest {
        root: Some(game_dir()),
        files: vec![fixture("no_such.log")],
        ..Default::default()
    };
    let run = run_analysis(&request).unwrap();
    assert_eq!(run.report.total_files, 3);
    assert_eq!(run.report.missing, vec![fixture("no_such.log")]);
}

#[test]
fn e2e_repeated_runs_give_identical_reports() {
    let first = analyse_game_dir().report;
    let second = analyse_game_dir().report;
    assert_eq!(first, second);
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_export_to_disk() {
    let report = analyse_game_dir().report;
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("report.csv");
    let rows = export_csv(
        &report,
        std::fs::File::create(&csv_path).unwrap(),
        &csv_path,
    )
    .unwrap();
    assert_eq!(rows, 5);
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("verdict,source_file,text"));

    let json_path = dir.path().join("report.json");
    export_json(
        &report,
        std::fs::File::create(&json_path).unwrap(),
        &json_path,
    )
    .unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["total_files"], 3);
    assert_eq!(value["clean_count"], 1);
}

// =============================================================================
// CLI
// =============================================================================

#[test]
fn e2e_cli_analyze_prints_summary_and_remembers_directory() {
    let config_dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_modsleuth"))
        .arg("--config-dir")
        .arg(config_dir.path())
        .arg("analyze")
        .arg(game_dir())
        .arg("--details")
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should run");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Logs processed       3"), "stdout: {stdout}");
    assert!(stdout.contains("Errors               2"), "stdout: {stdout}");
    assert!(stdout.contains("[ERR] [2024-03-01 18:02:13]"), "stdout: {stdout}");

    let session = std::fs::read_to_string(config_dir.path().join("session.json")).unwrap();
    assert!(session.contains("game"), "session: {session}");
}

#[test]
fn e2e_cli_analyze_bad_directory_exits_with_error() {
    let config_dir = tempfile::tempdir().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_modsleuth"))
        .arg("--config-dir")
        .arg(config_dir.path())
        .arg("analyze")
        .arg(fixture("no_such_dir"))
        .status()
        .expect("binary should run");
    assert_eq!(status.code(), Some(1));
}

#[test]
fn e2e_cli_analyze_without_directory_names_the_config_key() {
    let config_dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_modsleuth"))
        .arg("--config-dir")
        .arg(config_dir.path())
        .arg("analyze")
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: No game directory given"), "stderr: {stderr}");
    assert!(stderr.contains("[analysis] game_directory"), "stderr: {stderr}");
}
