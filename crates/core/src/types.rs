//! 도메인 타입 -- 스캔 리포트 데이터 모델
//!
//! 스캐너의 JSON 출력(`Results[].Vulnerabilities[]`)을 그대로 역직렬화하는 구조체들입니다.
//! 렌더러는 이 타입들을 읽기 전용으로만 다룹니다.

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, ReportError};

/// 스캔 리포트 전체
///
/// 스캐너가 한 번의 실행으로 만든 결과입니다. 렌더링 호출 동안 호출자가 소유합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Report {
    /// 스캔 대상 아티팩트 이름 (예: `alpine:3.19`)
    #[serde(default)]
    pub artifact_name: String,
    /// 아티팩트 종류 (`container_image`, `filesystem` 등)
    #[serde(default)]
    pub artifact_type: String,
    /// 대상별 결과 (입력 순서 유지)
    #[serde(default)]
    pub results: Vec<ScanResult>,
}

impl Report {
    /// JSON 문자열에서 리포트를 파싱합니다.
    pub fn parse(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json).map_err(|e| {
            ReportError::Decode(DecodeError::InvalidJson {
                reason: e.to_string(),
            })
        })
    }

    /// 스트림(예: 표준 입력)에서 리포트 전체를 읽어 파싱합니다.
    pub fn from_reader(reader: impl Read) -> Result<Self, ReportError> {
        serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                ReportError::Io(std::io::Error::other(e))
            } else {
                ReportError::Decode(DecodeError::InvalidJson {
                    reason: e.to_string(),
                })
            }
        })
    }

    /// `.json` 파일에서 리포트를 로드합니다.
    ///
    /// 확장자가 `.json`이 아니면 `DecodeError::NotJson`을 반환합니다.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(ReportError::Decode(DecodeError::NotJson {
                path: path.display().to_string(),
            }));
        }

        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// 모든 대상의 취약점 수 합계
    pub fn finding_count(&self) -> usize {
        self.results.iter().map(|r| r.vulnerabilities.len()).sum()
    }

    /// 아티팩트 종류의 표시 이름
    pub fn artifact_type_label(&self) -> &str {
        match self.artifact_type.as_str() {
            "container_image" => "Container Image",
            "filesystem" => "Filesystem",
            "repository" => "Repository",
            other => other,
        }
    }
}

/// 하나의 스캔 대상 결과
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanResult {
    /// 대상 식별자 (이미지 레이어, lockfile 경로 등)
    pub target: String,
    /// 대상 종류 태그 (`debian`, `npm`, `gomod` 등)
    #[serde(default, rename = "Type")]
    pub target_type: String,
    /// 결과 분류
    #[serde(default)]
    pub class: ResultClass,
    /// 발견된 취약점 (입력 순서 유지)
    #[serde(default)]
    pub vulnerabilities: Vec<VulnerabilityFinding>,
}

impl ScanResult {
    /// 취약점이 하나라도 있는지 확인합니다.
    pub fn has_findings(&self) -> bool {
        !self.vulnerabilities.is_empty()
    }
}

/// 결과 분류
///
/// 알 수 없는 분류 문자열은 `Other`로 그대로 보존됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResultClass {
    /// OS 패키지 (`os-pkgs`)
    OsPackages,
    /// 언어 패키지 (`lang-pkgs`)
    LanguagePackages,
    /// 설정 파일 검사 (`config`)
    Configuration,
    /// 기타 분류
    Other(String),
    #[default]
    Unspecified,
}

impl ResultClass {
    /// JSON에 기록되는 원본 태그
    pub fn as_tag(&self) -> &str {
        match self {
            Self::OsPackages => "os-pkgs",
            Self::LanguagePackages => "lang-pkgs",
            Self::Configuration => "config",
            Self::Other(tag) => tag,
            Self::Unspecified => "",
        }
    }

    /// 사람이 읽는 레이블. 알 수 없는 분류는 원본 태그를 그대로 씁니다.
    pub fn label(&self) -> &str {
        match self {
            Self::OsPackages => "OS Packages",
            Self::LanguagePackages => "Language Packages",
            Self::Configuration => "Configuration",
            other => other.as_tag(),
        }
    }
}

impl From<String> for ResultClass {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "os-pkgs" => Self::OsPackages,
            "lang-pkgs" => Self::LanguagePackages,
            "config" => Self::Configuration,
            "" => Self::Unspecified,
            _ => Self::Other(tag),
        }
    }
}

impl From<ResultClass> for String {
    fn from(class: ResultClass) -> Self {
        class.as_tag().to_owned()
    }
}

impl fmt::Display for ResultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 조치 상태 코드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnStatus {
    NotAffected,
    Affected,
    Fixed,
    UnderInvestigation,
    WillNotFix,
    FixDeferred,
    EndOfLife,
    /// 알 수 없는 코드도 여기로 들어옴
    #[default]
    #[serde(other)]
    Unknown,
}

impl VulnStatus {
    /// 상태 코드 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::NotAffected => "not_affected",
            Self::Affected => "affected",
            Self::Fixed => "fixed",
            Self::UnderInvestigation => "under_investigation",
            Self::WillNotFix => "will_not_fix",
            Self::FixDeferred => "fix_deferred",
            Self::EndOfLife => "end_of_life",
        }
    }

    /// 상태 설명 (영문)
    pub fn description(&self) -> &'static str {
        match self {
            Self::Unknown => "Status is unknown.",
            Self::NotAffected => "Software is not affected by the vulnerability on this platform.",
            Self::Affected => "Software is affected, but no patch is available yet.",
            Self::Fixed => "A patch has been released for this software.",
            Self::UnderInvestigation => "Vulnerability status is currently being investigated.",
            Self::WillNotFix => "Software is affected, but there are currently no plans to fix it.",
            Self::FixDeferred => "Software is affected, and a fix may be released in the future.",
            Self::EndOfLife => {
                "Software is EOL; no further vulnerability analysis will be performed."
            }
        }
    }
}

impl fmt::Display for VulnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 탐지된 단일 취약점
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VulnerabilityFinding {
    /// 취약점 ID (CVE, GHSA 등). 대상+패키지 범위에서만 고유
    #[serde(rename = "VulnerabilityID")]
    pub vulnerability_id: String,
    /// 제목 (줄바꿈 포함 가능)
    #[serde(default)]
    pub title: String,
    /// 심각도 원본 문자열
    #[serde(default)]
    pub severity: String,
    /// 심각도 출처 (nvd, ghsa, 배포판 등)
    #[serde(default)]
    pub severity_source: String,
    /// 패키지 이름
    #[serde(default)]
    pub pkg_name: String,
    /// 패키지 경로 (언어 패키지일 때)
    #[serde(default)]
    pub pkg_path: Option<String>,
    /// 설치된 버전
    #[serde(default)]
    pub installed_version: String,
    /// 수정 버전. 없으면 아직 수정되지 않음
    #[serde(default)]
    pub fixed_version: Option<String>,
    /// 조치 상태
    #[serde(default)]
    pub status: VulnStatus,
    /// 참고 URL 목록
    #[serde(default)]
    pub references: Vec<String>,
}

impl fmt::Display for VulnerabilityFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} in {}@{}",
            self.severity, self.vulnerability_id, self.pkg_name, self.installed_version,
        )
    }
}
