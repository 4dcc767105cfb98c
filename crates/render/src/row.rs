//! 행 포맷터 -- 주석된 레코드를 형식 공통의 고정 필드 집합으로 변환합니다.
//!
//! 정규화 규칙:
//! - 수정 버전이 없거나 비어 있으면 `-`
//! - 제목의 줄바꿈(`\r\n`, `\n`, `\r`)은 공백 하나로 치환
//! - 참고 URL 목록은 첫 번째 항목만 (없으면 빈 문자열)

use crate::aggregate::AnnotatedFinding;

/// 수정 버전이 없을 때 쓰는 자리표시자
pub const NO_FIX_PLACEHOLDER: &str = "-";

/// 스프레드시트/문서 헤더 (12열)
pub const SHEET_HEADERS: [&str; 12] = [
    "Target",
    "Type",
    "Class",
    "Vulnerability ID",
    "Title",
    "Severity Source",
    "Severity",
    "Package Name",
    "Installed Version",
    "Path",
    "Fixed Version",
    "Status",
];

/// 표 형식(csv) 헤더 (9열)
pub const TABULAR_HEADERS: [&str; 9] = [
    "Target",
    "Type",
    "Vulnerability ID",
    "Severity",
    "Pkg Name",
    "Installed Version",
    "Fixed Version",
    "Title",
    "Primary URL",
];

/// 취약점 하나를 출력 필드 순서로 투영한 행
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub target: String,
    pub target_type: String,
    pub class: String,
    pub vulnerability_id: String,
    pub title: String,
    pub severity_source: String,
    pub severity: String,
    pub pkg_name: String,
    pub installed_version: String,
    pub pkg_path: String,
    pub fixed_version: String,
    pub status: String,
    pub primary_url: String,
}

impl RenderedRow {
    /// 스프레드시트/문서 필드 ([`SHEET_HEADERS`] 순서)
    pub fn sheet_fields(&self) -> [&str; 12] {
        [
            self.target.as_str(),
            self.target_type.as_str(),
            self.class.as_str(),
            self.vulnerability_id.as_str(),
            self.title.as_str(),
            self.severity_source.as_str(),
            self.severity.as_str(),
            self.pkg_name.as_str(),
            self.installed_version.as_str(),
            self.pkg_path.as_str(),
            self.fixed_version.as_str(),
            self.status.as_str(),
        ]
    }

    /// 표 형식 필드 ([`TABULAR_HEADERS`] 순서)
    pub fn tabular_fields(&self) -> [&str; 9] {
        [
            self.target.as_str(),
            self.target_type.as_str(),
            self.vulnerability_id.as_str(),
            self.severity.as_str(),
            self.pkg_name.as_str(),
            self.installed_version.as_str(),
            self.fixed_version.as_str(),
            self.title.as_str(),
            self.primary_url.as_str(),
        ]
    }
}

/// 레코드 하나를 행으로 변환합니다. I/O도 실패 경로도 없는 순수 함수입니다.
pub fn format(record: &AnnotatedFinding<'_>) -> RenderedRow {
    let finding = record.finding;

    let fixed_version = match finding.fixed_version.as_deref() {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => NO_FIX_PLACEHOLDER.to_owned(),
    };

    RenderedRow {
        target: record.target.to_owned(),
        target_type: record.target_type.to_owned(),
        class: record.class.label().to_owned(),
        vulnerability_id: finding.vulnerability_id.clone(),
        title: flatten_newlines(&finding.title),
        severity_source: finding.severity_source.clone(),
        severity: finding.severity.clone(),
        pkg_name: finding.pkg_name.clone(),
        installed_version: finding.installed_version.clone(),
        pkg_path: finding.pkg_path.clone().unwrap_or_default(),
        fixed_version,
        status: finding.status.as_str().to_owned(),
        primary_url: finding.references.first().cloned().unwrap_or_default(),
    }
}

/// 줄바꿈 하나(`\r\n` 포함)를 공백 하나로 바꿉니다.
pub fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
