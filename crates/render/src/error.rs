//! 렌더러 에러 타입
//!
//! [`RenderError`]는 산출물 하나를 만드는 동안 발생할 수 있는 에러를 나타냅니다.
//! 내용은 데이터 모델이 보장하므로 실패 원인은 사실상 출력 대상 쓰기뿐이며,
//! 나머지 변형은 형식 라이브러리가 내부 버퍼를 만들다 실패한 경우입니다.
//!
//! `From<RenderError> for ReportError` 구현으로 상위 에러로 전파됩니다.

use scanreport_core::error::ReportError;

/// 렌더링 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// 출력 파일 생성/쓰기 실패 (디스크 부족, 권한, 잘못된 경로)
    #[error("io error: {path}: {source}")]
    Io {
        /// 출력 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// xlsx 작성기 에러
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    /// pdf 작성기 에러
    #[error("document error: {0}")]
    Document(String),

    /// csv 작성기 에러
    #[error("tabular error: {0}")]
    Tabular(String),
}

impl RenderError {
    /// 경로 정보를 붙여 I/O 에러를 감쌉니다.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// 에러가 속한 출력 형식
    pub fn format_name(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Spreadsheet(_) => "xlsx",
            Self::Document(_) => "pdf",
            Self::Tabular(_) => "csv",
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for RenderError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

impl From<csv::Error> for RenderError {
    fn from(err: csv::Error) -> Self {
        Self::Tabular(err.to_string())
    }
}

impl From<RenderError> for ReportError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Io { source, .. } => ReportError::Io(source),
            other => ReportError::Render {
                format: other.format_name().to_owned(),
                reason: other.to_string(),
            },
        }
    }
}
