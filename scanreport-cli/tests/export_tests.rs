//! Integration tests for the export coordinator and config layering.
//!
//! Renders real artifacts into temporary directories.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use serial_test::serial;
use tempfile::TempDir;

use scanreport_cli::cli::Cli;
use scanreport_cli::export::{ExportJob, plan_jobs, renderer_for, resolve_outputs, run_exports};
use scanreport_cli::{load_config, read_report, run};
use scanreport_core::config::ReportConfig;
use scanreport_core::types::Report;
use scanreport_render::ArtifactKind;

const REPORT_JSON: &str = r#"{
    "ArtifactName": "app:latest",
    "ArtifactType": "container_image",
    "Results": [
        {
            "Target": "app:latest (alpine 3.19)",
            "Class": "os-pkgs",
            "Type": "alpine",
            "Vulnerabilities": [
                {"VulnerabilityID": "CVE-A", "PkgName": "libx", "Severity": "HIGH", "InstalledVersion": "1.0"},
                {"VulnerabilityID": "CVE-B", "PkgName": "liby", "Severity": "CRITICAL", "InstalledVersion": "2.0", "FixedVersion": "2.1"}
            ]
        }
    ]
}"#;

fn sample_report() -> Arc<Report> {
    Arc::new(Report::parse(REPORT_JSON).expect("sample report should parse"))
}

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("scanreport").chain(args.iter().copied()))
        .expect("arguments should parse")
}

#[tokio::test]
async fn test_exports_all_formats_without_extension() {
    let dir = TempDir::new().expect("should create temp dir");
    let base = dir.path().join("scan");
    let plan = resolve_outputs(base.to_str().expect("utf-8 temp path")).unwrap();

    let jobs = plan_jobs(&plan, &ReportConfig::default());
    let summary = run_exports(sample_report(), Utc::now(), jobs).await;

    assert!(summary.is_complete(), "unexpected failures: {:?}", summary.failed);
    assert_eq!(summary.produced.len(), 3);
    for ext in ["xlsx", "pdf", "csv"] {
        let path = dir.path().join(format!("scan.{ext}"));
        assert!(path.exists(), "{} should exist", path.display());
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}

#[tokio::test]
async fn test_one_failure_does_not_block_others() {
    let dir = TempDir::new().expect("should create temp dir");
    let config = ReportConfig::default();

    let good = dir.path().join("ok.csv");
    let bad = dir.path().join("no-such-dir").join("broken.pdf");
    let jobs = vec![
        ExportJob {
            kind: ArtifactKind::Document,
            path: bad.clone(),
            renderer: renderer_for(ArtifactKind::Document, &config),
        },
        ExportJob {
            kind: ArtifactKind::Tabular,
            path: good.clone(),
            renderer: renderer_for(ArtifactKind::Tabular, &config),
        },
    ];

    let summary = run_exports(sample_report(), Utc::now(), jobs).await;

    assert_eq!(summary.produced.len(), 1);
    assert_eq!(summary.produced[0].path, good);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].path, bad);
    assert!(summary.failed[0].error.starts_with("io error"));
    assert_eq!(summary.ensure_complete().unwrap_err().exit_code(), 4);
    assert!(good.exists());
}

#[tokio::test]
async fn test_run_reads_input_file() {
    let dir = TempDir::new().expect("should create temp dir");
    let input = dir.path().join("scan.json");
    fs::write(&input, REPORT_JSON).unwrap();
    let output = dir.path().join("result.csv");

    let cli = cli(&[
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);
    let mut config = ReportConfig::default();
    cli.apply_overrides(&mut config);

    let summary = run(&cli, &config).await.expect("run should succeed");
    assert_eq!(summary.produced.len(), 1);
    assert_eq!(summary.produced[0].format, "csv");

    let csv = fs::read_to_string(&output).unwrap();
    let ids: Vec<_> = csv
        .lines()
        .skip(1)
        .map(|line| line.split(',').nth(2).unwrap_or_default().to_owned())
        .collect();
    assert_eq!(ids, ["CVE-A", "CVE-B"]);
}

#[tokio::test]
async fn test_run_rejects_unsupported_extension_before_reading_input() {
    let cli = cli(&["-i", "does-not-exist.json", "-o", "report.docx"]);
    let mut config = ReportConfig::default();
    cli.apply_overrides(&mut config);

    let err = run(&cli, &config).await.unwrap_err();
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_read_report_rejects_non_json_file() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("scan.txt");
    fs::write(&path, REPORT_JSON).unwrap();

    let err = read_report(Some(path.as_path())).unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_read_report_rejects_malformed_json() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("scan.json");
    fs::write(&path, "{ not json").unwrap();

    let err = read_report(Some(path.as_path())).unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
#[serial]
async fn test_explicit_missing_config_is_an_error() {
    let cli = cli(&["-c", "/nonexistent/scanreport.toml"]);
    let err = load_config(&cli).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
#[serial]
async fn test_config_file_then_cli_override() {
    let dir = TempDir::new().expect("should create temp dir");
    let config_path = dir.path().join("scanreport.toml");
    fs::write(
        &config_path,
        r#"
[output]
base_name = "from-file"
stylize = false

[document]
title = "Nightly Scan"
"#,
    )
    .unwrap();

    let path = config_path.to_str().unwrap();
    let config = load_config(&cli(&["-c", path])).await.unwrap();
    assert_eq!(config.output.base_name, "from-file");
    assert!(!config.output.stylize);
    assert_eq!(config.document.title, "Nightly Scan");

    let config = load_config(&cli(&["-c", path, "-o", "cli.pdf", "-b"])).await.unwrap();
    assert_eq!(config.output.base_name, "cli.pdf");
    assert!(config.output.stylize);
    assert_eq!(config.document.title, "Nightly Scan");
}

#[tokio::test]
#[serial]
async fn test_env_override_sits_between_file_and_cli() {
    let dir = TempDir::new().expect("should create temp dir");
    let config_path = dir.path().join("scanreport.toml");
    fs::write(&config_path, "[output]\nbase_name = \"from-file\"\n").unwrap();
    let path = config_path.to_str().unwrap();

    // SAFETY: serialized test, no other thread reads the environment
    unsafe { std::env::set_var("SCANREPORT_OUTPUT_BASE_NAME", "from-env") };

    let from_env = load_config(&cli(&["-c", path])).await;
    let from_cli = load_config(&cli(&["-c", path, "-o", "from-cli"])).await;

    unsafe { std::env::remove_var("SCANREPORT_OUTPUT_BASE_NAME") };

    assert_eq!(from_env.unwrap().output.base_name, "from-env");
    assert_eq!(from_cli.unwrap().output.base_name, "from-cli");
}

#[test]
fn test_default_plan_paths() {
    let plan = resolve_outputs("report").unwrap();
    let paths: Vec<PathBuf> = plan.kinds.iter().map(|k| plan.path_for(*k)).collect();
    assert_eq!(
        paths,
        [
            PathBuf::from("report.xlsx"),
            PathBuf::from("report.pdf"),
            PathBuf::from("report.csv"),
        ]
    );
}
