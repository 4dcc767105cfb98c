//! CLI argument parsing using clap derive API
//!
//! Purely declarative. Values given here take precedence over the environment,
//! the config file and built-in defaults (see [`Cli::apply_overrides`]).

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use scanreport_core::config::ReportConfig;

/// Export a vulnerability scan report to spreadsheet, document and CSV files.
///
/// Reads the scanner's JSON report from `--input` or stdin.
#[derive(Parser, Debug)]
#[command(name = "scanreport", version, about, long_about = None)]
pub struct Cli {
    /// JSON scan report to read. Reads stdin when omitted or `-`.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file name (e.g. report.xlsx, report.pdf, report.csv).
    /// Without an extension all three formats are written.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Enable severity coloring (xlsx and pdf).
    #[arg(
        short,
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub beautify: Option<bool>,

    /// Path to the scanreport.toml configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Format of the export summary printed to stdout.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Supported summary formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl Cli {
    /// Apply command-line values on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut ReportConfig) {
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(output) = &self.output {
            config.output.base_name = output.clone();
        }
        if let Some(beautify) = self.beautify {
            config.output.stylize = beautify;
        }
    }

    /// Input path, or `None` when the report comes from stdin.
    pub fn input_path(&self) -> Option<&std::path::Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("scanreport").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = parse(&[]);
        let mut config = ReportConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.output.base_name, "report");
        assert!(config.output.stylize);
        assert_eq!(config.general.log_level, "info");
        assert!(cli.input_path().is_none());
    }

    #[test]
    fn beautify_accepts_bare_flag_and_explicit_value() {
        assert_eq!(parse(&["-b"]).beautify, Some(true));
        assert_eq!(parse(&["--beautify", "false"]).beautify, Some(false));
        assert_eq!(parse(&["--beautify=true"]).beautify, Some(true));
        assert_eq!(parse(&[]).beautify, None);
    }

    #[test]
    fn overrides_take_precedence() {
        let cli = parse(&["-o", "out/scan.pdf", "-b", "false", "--log-level", "debug"]);
        let mut config = ReportConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.output.base_name, "out/scan.pdf");
        assert!(!config.output.stylize);
        assert_eq!(config.general.log_level, "debug");
    }

    #[test]
    fn dash_input_means_stdin() {
        assert!(parse(&["-i", "-"]).input_path().is_none());
        assert_eq!(
            parse(&["-i", "scan.json"]).input_path(),
            Some(std::path::Path::new("scan.json"))
        );
    }

    #[test]
    fn invalid_summary_format_is_rejected() {
        let result = Cli::try_parse_from(["scanreport", "--format", "yaml"]);
        assert!(result.is_err());
    }
}
