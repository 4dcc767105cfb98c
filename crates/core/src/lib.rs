#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod severity;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, DecodeError, ReportError};

// 설정
pub use config::ReportConfig;

// 심각도 모델
pub use severity::{Rgb, SeverityBucket};

// 도메인 타입
pub use types::{Report, ResultClass, ScanResult, VulnStatus, VulnerabilityFinding};
