//! Export coordination -- output selection and concurrent rendering.
//!
//! [`resolve_outputs`] turns the `--output` value into a base path plus the
//! artifact kinds to produce. [`run_exports`] then runs one blocking job per
//! artifact over a shared, read-only report and waits for every job.
//! A failed artifact never cancels the others.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use scanreport_core::config::ReportConfig;
use scanreport_core::error::ReportError;
use scanreport_core::types::Report;
use scanreport_render::{
    ArtifactKind, DocumentRenderer, RenderInput, ReportRenderer, SpreadsheetRenderer,
    TabularRenderer,
};

use crate::error::CliError;

/// Base name used when the output name has no stem.
pub const DEFAULT_BASE_NAME: &str = "report";

/// Resolved output selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    /// Output path without extension.
    pub base: PathBuf,
    /// Artifacts to produce, in [`ArtifactKind::ALL`] order.
    pub kinds: Vec<ArtifactKind>,
}

impl OutputPlan {
    /// Destination path for one artifact kind.
    pub fn path_for(&self, kind: ArtifactKind) -> PathBuf {
        let mut name = self.base.clone().into_os_string();
        name.push(".");
        name.push(kind.extension());
        PathBuf::from(name)
    }
}

/// Resolve an output name into a base path and the formats to write.
///
/// `.xlsx`, `.pdf` and `.csv` (any case) select one format; no extension
/// selects all three; anything else is rejected. An empty stem becomes
/// [`DEFAULT_BASE_NAME`].
pub fn resolve_outputs(output: &str) -> Result<OutputPlan, CliError> {
    let path = Path::new(output);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let (stem, extension) = match file_name.rfind('.') {
        Some(idx) => (&file_name[..idx], Some(&file_name[idx + 1..])),
        None => (file_name, None),
    };

    let kinds = match extension {
        None => ArtifactKind::ALL.to_vec(),
        Some(ext) => match ArtifactKind::from_extension(ext) {
            Some(kind) => vec![kind],
            None => {
                return Err(CliError::Command(format!(
                    "unsupported file extension: .{ext} (use .xlsx, .pdf or .csv)"
                )));
            }
        },
    };

    let stem = if stem.is_empty() { DEFAULT_BASE_NAME } else { stem };
    let base = match path.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    };

    Ok(OutputPlan { base, kinds })
}

/// One artifact to produce.
pub struct ExportJob {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub renderer: Arc<dyn ReportRenderer>,
}

/// Build the renderer for `kind` from the effective configuration.
pub fn renderer_for(kind: ArtifactKind, config: &ReportConfig) -> Arc<dyn ReportRenderer> {
    let stylize = config.output.stylize;
    match kind {
        ArtifactKind::Spreadsheet => Arc::new(SpreadsheetRenderer::new(
            config.spreadsheet.sheet_name.clone(),
            stylize,
        )),
        ArtifactKind::Document => {
            Arc::new(DocumentRenderer::new(config.document.title.clone(), stylize))
        }
        ArtifactKind::Tabular => Arc::new(TabularRenderer::new()),
    }
}

/// Jobs for every artifact in `plan`.
pub fn plan_jobs(plan: &OutputPlan, config: &ReportConfig) -> Vec<ExportJob> {
    plan.kinds
        .iter()
        .map(|&kind| ExportJob {
            kind,
            path: plan.path_for(kind),
            renderer: renderer_for(kind, config),
        })
        .collect()
}

/// A produced artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ProducedArtifact {
    pub format: String,
    pub path: PathBuf,
}

/// An artifact that could not be produced.
#[derive(Debug, Clone, Serialize)]
pub struct FailedArtifact {
    pub format: String,
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of one export run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSummary {
    pub produced: Vec<ProducedArtifact>,
    pub failed: Vec<FailedArtifact>,
}

impl ExportSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// `Err(CliError::Export)` when any artifact failed.
    pub fn ensure_complete(&self) -> Result<(), CliError> {
        if self.is_complete() {
            return Ok(());
        }
        let failed: Vec<String> = self
            .failed
            .iter()
            .map(|f| f.path.display().to_string())
            .collect();
        Err(CliError::Export(format!(
            "{} of {} artifacts failed: {}",
            self.failed.len(),
            self.failed.len() + self.produced.len(),
            failed.join(", ")
        )))
    }
}

/// Run every job concurrently and wait for all of them.
///
/// Each job renders on the blocking pool with its own [`RenderInput`] over the
/// shared report. Render failures are recorded as their [`CliError`] message.
pub async fn run_exports(
    report: Arc<Report>,
    generated_at: DateTime<Utc>,
    jobs: Vec<ExportJob>,
) -> ExportSummary {
    let handles: Vec<_> = jobs
        .into_iter()
        .map(|job| {
            let report = Arc::clone(&report);
            let renderer = Arc::clone(&job.renderer);
            let path = job.path.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let input = RenderInput::new(&report, generated_at);
                renderer.render(&input, &path)
            });
            (job.kind, job.path, handle)
        })
        .collect();

    let mut summary = ExportSummary::default();
    for (kind, path, handle) in handles {
        let outcome = match handle.await {
            Ok(result) => result.map_err(|e| CliError::from(ReportError::from(e))),
            Err(join_err) => Err(CliError::Export(format!("export task failed: {join_err}"))),
        };
        match outcome {
            Ok(()) => {
                info!(format = kind.extension(), path = %path.display(), "created");
                summary.produced.push(ProducedArtifact {
                    format: kind.extension().to_owned(),
                    path,
                });
            }
            Err(err) => {
                error!(
                    format = kind.extension(),
                    path = %path.display(),
                    error = %err,
                    exit_code = err.exit_code(),
                    "failed to export"
                );
                summary.failed.push(FailedArtifact {
                    format: kind.extension().to_owned(),
                    path,
                    error: err.to_string(),
                });
            }
        }
    }

    info!(
        produced = summary.produced.len(),
        failed = summary.failed.len(),
        "completed"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_extension_selects_all_formats() {
        let plan = resolve_outputs("report").unwrap();
        assert_eq!(plan.kinds, ArtifactKind::ALL);
        assert_eq!(plan.path_for(ArtifactKind::Document), PathBuf::from("report.pdf"));
    }

    #[test]
    fn single_extension_selects_one_format() {
        let plan = resolve_outputs("out/scan.XLSX").unwrap();
        assert_eq!(plan.kinds, [ArtifactKind::Spreadsheet]);
        assert_eq!(plan.base, PathBuf::from("out/scan"));
        assert_eq!(
            plan.path_for(ArtifactKind::Spreadsheet),
            PathBuf::from("out/scan.xlsx")
        );
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = resolve_outputs("report.html").unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains(".html"));
    }

    #[test]
    fn empty_stem_falls_back_to_default() {
        assert_eq!(resolve_outputs("").unwrap().base, PathBuf::from("report"));
        let plan = resolve_outputs(".csv").unwrap();
        assert_eq!(plan.base, PathBuf::from("report"));
        assert_eq!(plan.kinds, [ArtifactKind::Tabular]);
    }

    #[test]
    fn plan_jobs_follows_plan_order() {
        let plan = resolve_outputs("r").unwrap();
        let jobs = plan_jobs(&plan, &ReportConfig::default());
        let kinds: Vec<_> = jobs.iter().map(|j| j.renderer.kind()).collect();
        assert_eq!(kinds, ArtifactKind::ALL);
        assert_eq!(jobs[2].path, PathBuf::from("r.csv"));
    }

    #[tokio::test]
    async fn format_failure_is_recorded_as_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.xlsx");
        let jobs = vec![ExportJob {
            kind: ArtifactKind::Spreadsheet,
            path: path.clone(),
            renderer: Arc::new(SpreadsheetRenderer::new("bad[name]", true)),
        }];

        let summary = run_exports(Arc::new(Report::default()), Utc::now(), jobs).await;

        assert!(summary.produced.is_empty());
        let failed = &summary.failed[0];
        assert_eq!(failed.path, path);
        assert!(failed.error.starts_with("export failed: render error: xlsx"));
        assert!(!path.exists());
    }

    #[test]
    fn summary_reports_failures() {
        let summary = ExportSummary {
            produced: vec![ProducedArtifact {
                format: "csv".to_owned(),
                path: PathBuf::from("r.csv"),
            }],
            failed: vec![FailedArtifact {
                format: "pdf".to_owned(),
                path: PathBuf::from("r.pdf"),
                error: "denied".to_owned(),
            }],
        };
        let err = summary.ensure_complete().unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("1 of 2"));
    }
}
