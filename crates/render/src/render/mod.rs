//! 렌더러 -- 집계된 리포트를 산출물 파일 하나로 씁니다.
//!
//! 세 렌더러는 모두 [`ReportRenderer`]를 구현하며, 같은 [`RenderInput`]을
//! 읽기 전용으로 공유합니다. 렌더러 사이에 공유되는 가변 상태는 없으므로
//! 내보내기 조정자가 이들을 동시에 호출할 수 있습니다.
//!
//! | 렌더러 | 형식 | 대상 그룹 | 재정렬 | 스타일 |
//! |--------|------|-----------|--------|--------|
//! | [`SpreadsheetRenderer`] | xlsx | 없음 (단일 시트) | 없음 | 토글 |
//! | [`DocumentRenderer`] | pdf | 대상별 섹션 | 심각도순 | 토글 |
//! | [`TabularRenderer`] | csv | 없음 | 없음 | 없음 |

pub mod document;
pub mod spreadsheet;
pub mod tabular;

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use scanreport_core::types::Report;

use crate::aggregate::{self, Aggregate};
use crate::error::RenderError;

pub use document::DocumentRenderer;
pub use spreadsheet::SpreadsheetRenderer;
pub use tabular::TabularRenderer;

/// 생성 시각 표시 형식
const TIMESTAMP_FORMAT: &str = "%b %d, %Y %H:%M:%S UTC";

/// 산출물 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Spreadsheet,
    Document,
    Tabular,
}

impl ArtifactKind {
    /// 모든 종류 (내보내기 기본 선택 순서)
    pub const ALL: [ArtifactKind; 3] = [Self::Spreadsheet, Self::Document, Self::Tabular];

    /// 파일 확장자 (점 제외)
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Spreadsheet => "xlsx",
            Self::Document => "pdf",
            Self::Tabular => "csv",
        }
    }

    /// 확장자로 종류를 찾습니다. 대소문자는 구분하지 않습니다.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spreadsheet => write!(f, "spreadsheet"),
            Self::Document => write!(f, "document"),
            Self::Tabular => write!(f, "tabular"),
        }
    }
}

/// 렌더러 공통 입력
///
/// 집계는 생성 시 한 번만 수행되고, 이후 모든 렌더러가 같은 결과를 읽습니다.
#[derive(Debug, Clone)]
pub struct RenderInput<'a> {
    /// 원본 리포트
    pub report: &'a Report,
    /// 입력 순서의 레코드와 심각도 요약
    pub aggregate: Aggregate<'a>,
    /// 생성 시각 (문서 대시보드/바닥글)
    pub generated_at: DateTime<Utc>,
}

impl<'a> RenderInput<'a> {
    /// 리포트를 집계하여 렌더링 입력을 만듭니다.
    pub fn new(report: &'a Report, generated_at: DateTime<Utc>) -> Self {
        Self {
            report,
            aggregate: aggregate::aggregate(&report.results),
            generated_at,
        }
    }

    /// 표시용 생성 시각 문자열
    pub fn timestamp(&self) -> String {
        format_timestamp(self.generated_at)
    }
}

/// 생성 시각을 `Jan 02, 2006 15:04:05 UTC` 형태로 표시합니다.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// 렌더러 trait
///
/// 구현체는 `render`에서 산출물 전체를 메모리에 만든 뒤 `path`에 한 번 씁니다.
/// 쓰기 실패는 [`RenderError::Io`]로 보고합니다.
pub trait ReportRenderer: Send + Sync {
    /// 이 렌더러가 만드는 산출물 종류
    fn kind(&self) -> ArtifactKind;

    /// 리포트를 `path`에 렌더링합니다.
    fn render(&self, input: &RenderInput<'_>, path: &Path) -> Result<(), RenderError>;
}
