//! 에러 타입 -- 도메인별 에러 정의

/// scanreport 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 입력 리포트 디코딩 에러
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// 렌더링 에러 (렌더러 크레이트에서 변환됨)
    #[error("render error: {format}: {reason}")]
    Render {
        /// 출력 형식 (xlsx, pdf, csv)
        format: String,
        /// 실패 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 입력 리포트 디코딩 에러
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// JSON 형식 오류 또는 스키마 불일치
    #[error("invalid report json: {reason}")]
    InvalidJson { reason: String },

    /// `.json` 파일이 아님
    #[error("not a json file: {path}")]
    NotJson { path: String },
}
