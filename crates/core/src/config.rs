//! 설정 관리 -- scanreport.toml 파싱 및 런타임 설정
//!
//! [`ReportConfig`]는 로깅, 출력, 형식별 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SCANREPORT_OUTPUT_STYLIZE=false` 형식)
//! 3. 설정 파일 (`scanreport.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), scanreport_core::error::ReportError> {
//! use scanreport_core::config::ReportConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = ReportConfig::load("scanreport.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = ReportConfig::parse("[output]\nstylize = false")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ReportError};

/// 엑셀 시트 이름 최대 길이
const MAX_SHEET_NAME_LEN: usize = 31;

/// 시트 이름에 쓸 수 없는 문자
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// scanreport 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 출력 설정
    #[serde(default)]
    pub output: OutputConfig,
    /// PDF 문서 설정
    #[serde(default)]
    pub document: DocumentConfig,
    /// 스프레드시트 설정
    #[serde(default)]
    pub spreadsheet: SpreadsheetConfig,
}

impl ReportConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일 없이 기본값 + 환경변수 오버라이드로 설정을 만듭니다.
    pub fn from_env() -> Result<Self, ReportError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReportError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ReportError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, ReportError> {
        toml::from_str(toml_str).map_err(|e| {
            ReportError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SCANREPORT_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "SCANREPORT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SCANREPORT_GENERAL_LOG_FORMAT");

        override_string(&mut self.output.base_name, "SCANREPORT_OUTPUT_BASE_NAME");
        override_bool(&mut self.output.stylize, "SCANREPORT_OUTPUT_STYLIZE");

        override_string(&mut self.document.title, "SCANREPORT_DOCUMENT_TITLE");

        override_string(
            &mut self.spreadsheet.sheet_name,
            "SCANREPORT_SPREADSHEET_SHEET_NAME",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ReportError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.document.title.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "document.title".to_owned(),
                reason: "title must not be empty".to_owned(),
            }
            .into());
        }

        let sheet_name = &self.spreadsheet.sheet_name;
        let sheet_len = sheet_name.chars().count();
        if sheet_len == 0 || sheet_len > MAX_SHEET_NAME_LEN {
            return Err(ConfigError::InvalidValue {
                field: "spreadsheet.sheet_name".to_owned(),
                reason: format!("must be 1-{MAX_SHEET_NAME_LEN} characters"),
            }
            .into());
        }
        if sheet_name.contains(&INVALID_SHEET_CHARS[..]) {
            return Err(ConfigError::InvalidValue {
                field: "spreadsheet.sheet_name".to_owned(),
                reason: "must not contain any of [ ] : * ? / \\".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 출력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 확장자 없는 출력 파일 기본 이름
    pub base_name: String,
    /// 심각도 색상 적용 여부
    pub stylize: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_name: "report".to_owned(),
            stylize: true,
        }
    }
}

/// PDF 문서 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// 문서 제목
    pub title: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "Vulnerability Scan Report".to_owned(),
        }
    }
}

/// 스프레드시트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadsheetConfig {
    /// 시트 이름 (최대 31자)
    pub sheet_name: String,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Vulnerability Scan Report".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = ReportConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.output.base_name, "report");
        assert!(config.output.stylize);
        assert_eq!(config.document.title, "Vulnerability Scan Report");
        assert_eq!(config.spreadsheet.sheet_name, "Vulnerability Scan Report");
    }

    #[test]
    fn default_config_passes_validation() {
        ReportConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = ReportConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert!(config.output.stylize);
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[output]
stylize = false

[document]
title = "Nightly Image Scan"
"#;
        let config = ReportConfig::parse(toml).unwrap();
        assert!(!config.output.stylize);
        assert_eq!(config.output.base_name, "report");
        assert_eq!(config.document.title, "Nightly Image Scan");
        assert_eq!(config.general.log_format, "pretty");
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let err = ReportConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            ReportError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = ReportConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = ReportConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_blank_title() {
        let mut config = ReportConfig::default();
        config.document.title = "   ".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("document.title"));
    }

    #[test]
    fn validate_rejects_long_sheet_name() {
        let mut config = ReportConfig::default();
        config.spreadsheet.sheet_name = "x".repeat(32);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sheet_name"));

        config.spreadsheet.sheet_name = "x".repeat(31);
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_sheet_name_with_reserved_chars() {
        let mut config = ReportConfig::default();
        config.spreadsheet.sheet_name = "scan:2024".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("TEST_SCANREPORT_STR", "overridden") };
        override_string(&mut val, "TEST_SCANREPORT_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_SCANREPORT_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("TEST_SCANREPORT_BOOL_BAD", "maybe") };
        override_bool(&mut val, "TEST_SCANREPORT_BOOL_BAD");
        assert!(val);
        unsafe { std::env::remove_var("TEST_SCANREPORT_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn apply_env_overrides_updates_sections() {
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe {
            std::env::set_var("SCANREPORT_OUTPUT_STYLIZE", "false");
            std::env::set_var("SCANREPORT_DOCUMENT_TITLE", "From Env");
        }
        let mut config = ReportConfig::default();
        config.apply_env_overrides();
        assert!(!config.output.stylize);
        assert_eq!(config.document.title, "From Env");
        unsafe {
            std::env::remove_var("SCANREPORT_OUTPUT_STYLIZE");
            std::env::remove_var("SCANREPORT_DOCUMENT_TITLE");
        }
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_SCANREPORT_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = ReportConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = ReportConfig::parse(&toml_str).unwrap();
        assert_eq!(config.output.base_name, parsed.output.base_name);
        assert_eq!(config.spreadsheet.sheet_name, parsed.spreadsheet.sheet_name);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = ReportConfig::from_file("/nonexistent/path/scanreport.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
