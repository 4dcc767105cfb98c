//! scanreport CLI library.
//!
//! The binary in `main.rs` is a thin wrapper around [`load_config`] and [`run`].
//!
//! - [`cli`]: argument parsing
//! - [`error`]: `CliError` and exit codes
//! - [`export`]: output resolution and the concurrent export coordinator
//! - [`logging`]: tracing subscriber setup
//! - [`output`]: summary printing (text / JSON)

pub mod cli;
pub mod error;
pub mod export;
pub mod logging;
pub mod output;

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use scanreport_core::config::ReportConfig;
use scanreport_core::types::Report;

use crate::cli::Cli;
use crate::error::CliError;
use crate::export::{ExportSummary, plan_jobs, resolve_outputs, run_exports};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "scanreport.toml";

/// Build the effective configuration: defaults, file, environment, then CLI.
///
/// A missing file is only an error when its path was given explicitly.
pub async fn load_config(cli: &Cli) -> Result<ReportConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => ReportConfig::load(path).await?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if tokio::fs::try_exists(default_path).await.unwrap_or(false) {
                ReportConfig::load(default_path).await?
            } else {
                ReportConfig::from_env()?
            }
        }
    };

    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Decode the scan report from a `.json` file, or from stdin when `path` is `None`.
pub fn read_report(path: Option<&Path>) -> Result<Report, CliError> {
    let report = match path {
        Some(path) => Report::from_file(path)?,
        None => Report::from_reader(std::io::stdin().lock())?,
    };
    Ok(report)
}

/// Decode the input and export every selected artifact.
pub async fn run(cli: &Cli, config: &ReportConfig) -> Result<ExportSummary, CliError> {
    let plan = resolve_outputs(&config.output.base_name)?;

    let input = cli.input_path().map(Path::to_path_buf);
    let report = tokio::task::spawn_blocking(move || read_report(input.as_deref()))
        .await
        .map_err(|e| CliError::Command(format!("input task failed: {e}")))??;

    info!(
        artifact = %report.artifact_name,
        results = report.results.len(),
        findings = report.finding_count(),
        "generating reports"
    );

    let jobs = plan_jobs(&plan, config);
    Ok(run_exports(Arc::new(report), Utc::now(), jobs).await)
}
