//! 집계기 -- 스캔 결과를 한 번 순회하여 주석된 레코드와 심각도 요약을 만듭니다.
//!
//! # 순서
//!
//! 결과는 입력 순서대로, 각 결과 안의 취약점도 입력 순서대로 방문합니다.
//! 문서 렌더러의 재정렬은 [`sort_by_severity`]가 별도로 수행하며
//! 원본 순서는 건드리지 않습니다.

use std::cmp::Ordering;

use scanreport_core::severity::{self, SeverityBucket};
use scanreport_core::types::{ResultClass, ScanResult, VulnerabilityFinding};

/// 소속 대상 정보가 붙은 취약점 레코드
///
/// 원본 데이터를 빌려오기만 하므로 렌더링 호출 범위를 넘어 보관되지 않습니다.
#[derive(Debug, Clone, Copy)]
pub struct AnnotatedFinding<'a> {
    /// 소속 대상 식별자
    pub target: &'a str,
    /// 대상 종류 태그
    pub target_type: &'a str,
    /// 결과 분류
    pub class: &'a ResultClass,
    /// 원본 취약점
    pub finding: &'a VulnerabilityFinding,
}

impl AnnotatedFinding<'_> {
    /// 심각도 순위 (5-1)
    pub fn rank(&self) -> u8 {
        severity::rank(&self.finding.severity)
    }
}

/// 심각도 버킷별 개수
///
/// 렌더링마다 처음부터 다시 계산합니다. `total`은 항상 다섯 버킷의 합과 같습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCount {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
    pub total: usize,
}

impl SeverityCount {
    /// 버킷 하나의 개수를 반환합니다.
    pub fn get(&self, bucket: SeverityBucket) -> usize {
        match bucket {
            SeverityBucket::Critical => self.critical,
            SeverityBucket::High => self.high,
            SeverityBucket::Medium => self.medium,
            SeverityBucket::Low => self.low,
            SeverityBucket::Unknown => self.unknown,
        }
    }

    /// 다섯 버킷의 합
    pub fn bucket_sum(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.unknown
    }

    fn record(&mut self, severity: &str) {
        match SeverityBucket::from_severity(severity) {
            SeverityBucket::Critical => self.critical += 1,
            SeverityBucket::High => self.high += 1,
            SeverityBucket::Medium => self.medium += 1,
            SeverityBucket::Low => self.low += 1,
            SeverityBucket::Unknown => self.unknown += 1,
        }
        self.total += 1;
    }
}

/// 집계 결과
#[derive(Debug, Clone, Default)]
pub struct Aggregate<'a> {
    /// 입력 순서의 평탄화된 레코드
    pub records: Vec<AnnotatedFinding<'a>>,
    /// 심각도 요약
    pub summary: SeverityCount,
}

/// 스캔 결과를 집계합니다.
///
/// 취약점이 없는 결과는 `records`에 아무것도 더하지 않습니다.
pub fn aggregate(results: &[ScanResult]) -> Aggregate<'_> {
    let mut records = Vec::with_capacity(results.iter().map(|r| r.vulnerabilities.len()).sum());
    let mut summary = SeverityCount::default();

    for result in results {
        for finding in &result.vulnerabilities {
            summary.record(&finding.severity);
            records.push(annotate(result, finding));
        }
    }

    Aggregate { records, summary }
}

/// 결과 하나의 취약점을 주석된 레코드로 만듭니다 (입력 순서).
pub fn annotate_result(result: &ScanResult) -> Vec<AnnotatedFinding<'_>> {
    result
        .vulnerabilities
        .iter()
        .map(|finding| annotate(result, finding))
        .collect()
}

fn annotate<'a>(result: &'a ScanResult, finding: &'a VulnerabilityFinding) -> AnnotatedFinding<'a> {
    AnnotatedFinding {
        target: &result.target,
        target_type: &result.target_type,
        class: &result.class,
        finding,
    }
}

/// 문서 렌더러용 정렬 비교 함수
///
/// 순위 내림차순, 같은 순위는 패키지 이름 오름차순입니다.
pub fn severity_order(a: &AnnotatedFinding<'_>, b: &AnnotatedFinding<'_>) -> Ordering {
    b.rank()
        .cmp(&a.rank())
        .then_with(|| a.finding.pkg_name.cmp(&b.finding.pkg_name))
}

/// 레코드를 심각도 내림차순 + 패키지 이름 오름차순으로 안정 정렬합니다.
pub fn sort_by_severity(records: &mut [AnnotatedFinding<'_>]) {
    records.sort_by(severity_order);
}
