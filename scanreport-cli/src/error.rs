//! CLI-specific error types and exit code mapping

use scanreport_core::error::ReportError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid invocation (e.g. unsupported output extension).
    #[error("{0}")]
    Command(String),

    /// The scan report could not be decoded.
    #[error("input error: {0}")]
    Decode(String),

    /// One or more artifacts could not be produced.
    #[error("export failed: {0}")]
    Export(String),

    /// JSON serialisation failed while printing the summary.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdin read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 0    | Success                         |
    /// | 1    | General / command error         |
    /// | 2    | Configuration error             |
    /// | 3    | Input decode error              |
    /// | 4    | Partial or total export failure |
    /// | 10   | IO error                        |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Decode(_) => 3,
            Self::Export(_) => 4,
            Self::Io(_) => 10,
            Self::Command(_) | Self::JsonSerialize(_) => 1,
        }
    }
}

impl From<ReportError> for CliError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Config(e) => Self::Config(e.to_string()),
            ReportError::Decode(e) => Self::Decode(e.to_string()),
            ReportError::Io(e) => Self::Io(e),
            other @ ReportError::Render { .. } => Self::Export(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanreport_core::error::{ConfigError, DecodeError};

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Command("x".to_owned()).exit_code(), 1);
        assert_eq!(CliError::Config("x".to_owned()).exit_code(), 2);
        assert_eq!(CliError::Decode("x".to_owned()).exit_code(), 3);
        assert_eq!(CliError::Export("x".to_owned()).exit_code(), 4);
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(CliError::Io(io_err).exit_code(), 10);
    }

    #[test]
    fn test_from_config_error() {
        let err: CliError = ReportError::Config(ConfigError::FileNotFound {
            path: "missing.toml".to_owned(),
        })
        .into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_from_decode_error() {
        let err: CliError = ReportError::Decode(DecodeError::NotJson {
            path: "scan.txt".to_owned(),
        })
        .into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().starts_with("input error"));
    }

    #[test]
    fn test_from_render_error() {
        let err: CliError = ReportError::Render {
            format: "pdf".to_owned(),
            reason: "font".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_error_display_command() {
        let err = CliError::Command("unsupported file extension".to_owned());
        assert_eq!(err.to_string(), "unsupported file extension");
    }
}
