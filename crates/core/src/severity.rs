//! 심각도 모델 -- 순위, 색상, 표시 레이블
//!
//! 스캐너가 보고하는 심각도는 문자열 그대로 전달됩니다 (`"CRITICAL"`, `"HIGH"` 등).
//! 알 수 없는 값도 그대로 통과하므로 이 모듈의 모든 함수는 임의의 문자열을 받아
//! 항상 결과를 돌려줍니다. 에러 경로는 없습니다.
//!
//! # 순위
//!
//! `CRITICAL(5) > HIGH(4) > MEDIUM(3) > LOW(2) > UNKNOWN 및 기타(1)`
//!
//! 비교는 대소문자를 구분하는 정확 일치입니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 정규 심각도 문자열
pub const CRITICAL: &str = "CRITICAL";
pub const HIGH: &str = "HIGH";
pub const MEDIUM: &str = "MEDIUM";
pub const LOW: &str = "LOW";
pub const UNKNOWN: &str = "UNKNOWN";

/// 8비트 RGB 색상
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// 채널 값으로 색상을 생성합니다.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB` 형식의 정수에서 색상을 생성합니다.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    /// `0xRRGGBB` 정수 표현을 반환합니다.
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// 흰색 쪽으로 `amount` 비율(0.0-1.0)만큼 섞은 밝은 색을 반환합니다.
    ///
    /// 범위를 벗어난 값은 0.0-1.0으로 잘립니다.
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| -> u8 {
            let c = f32::from(c);
            (c + (255.0 - c) * amount).round() as u8
        };
        Self {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
        }
    }

    /// 0.0-1.0 범위의 채널 값 `(r, g, b)`를 반환합니다.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// 정규 심각도 외 값에 사용하는 중립 색상
pub const NEUTRAL_COLOR: Rgb = Rgb::from_hex(0xFFFFFF);

/// 요약 대시보드의 심각도 버킷
///
/// `Ord` 구현은 순위와 같은 방향입니다 (`Unknown < Low < ... < Critical`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityBucket {
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityBucket {
    /// 대시보드 표시 순서 (높은 심각도부터)
    pub const ALL: [SeverityBucket; 5] = [
        Self::Critical,
        Self::High,
        Self::Medium,
        Self::Low,
        Self::Unknown,
    ];

    /// 원본 심각도 문자열을 버킷으로 분류합니다.
    ///
    /// 순위를 거쳐 분류하므로 알 수 없는 값은 모두 `Unknown`에 들어갑니다.
    pub fn from_severity(severity: &str) -> Self {
        match rank(severity) {
            5 => Self::Critical,
            4 => Self::High,
            3 => Self::Medium,
            2 => Self::Low,
            _ => Self::Unknown,
        }
    }

    /// 버킷에 대응하는 정규 심각도 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => CRITICAL,
            Self::High => HIGH,
            Self::Medium => MEDIUM,
            Self::Low => LOW,
            Self::Unknown => UNKNOWN,
        }
    }

    /// 버킷 색상
    pub fn color(&self) -> Rgb {
        color(self.as_str())
    }
}

impl fmt::Display for SeverityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(label(self.as_str()))
    }
}

/// 심각도 문자열의 정렬 순위를 반환합니다.
pub fn rank(severity: &str) -> u8 {
    match severity {
        CRITICAL => 5,
        HIGH => 4,
        MEDIUM => 3,
        LOW => 2,
        _ => 1,
    }
}

/// 심각도 문자열의 표시 색상을 반환합니다.
///
/// 정규 심각도 다섯 개만 고유 색을 가지며, 나머지는 [`NEUTRAL_COLOR`]입니다.
pub fn color(severity: &str) -> Rgb {
    match severity {
        CRITICAL => Rgb::from_hex(0xFF7675),
        HIGH => Rgb::from_hex(0xFAB1A0),
        MEDIUM => Rgb::from_hex(0xFFEAA7),
        LOW => Rgb::from_hex(0x74B9FF),
        UNKNOWN => Rgb::from_hex(0xDFE6E9),
        _ => NEUTRAL_COLOR,
    }
}

/// 심각도 문자열의 표시 레이블을 반환합니다.
///
/// 정규 심각도가 아니면 입력을 그대로 돌려줍니다.
pub fn label(severity: &str) -> &str {
    match severity {
        CRITICAL => "Critical",
        HIGH => "High",
        MEDIUM => "Medium",
        LOW => "Low",
        UNKNOWN => "Unknown",
        other => other,
    }
}
