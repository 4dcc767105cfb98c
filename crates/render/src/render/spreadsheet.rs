//! 스프레드시트(xlsx) 렌더러
//!
//! 모든 대상의 취약점을 시트 하나에 씁니다. 첫 행은 고정된 굵은 헤더이고,
//! 이후 행은 집계 순서 그대로입니다 (재정렬 없음). 취약점이 없는 대상은 건너뜁니다.
//!
//! 셀 내용과 배경색은 먼저 [`SheetRow`] 목록으로 계산한 뒤 `rust_xlsxwriter`로
//! 옮겨 씁니다.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook};
use scanreport_core::severity::{self, Rgb};
use tracing::{debug, info};

use crate::error::RenderError;
use crate::render::{ArtifactKind, RenderInput, ReportRenderer};
use crate::row::{self, SHEET_HEADERS};

/// 열 너비 ([`SHEET_HEADERS`] 순서, 문자 단위)
pub const COLUMN_WIDTHS: [f64; 12] = [
    25.0, 15.0, 15.0, 20.0, 40.0, 15.0, 12.0, 20.0, 20.0, 30.0, 20.0, 15.0,
];

/// 스타일 적용 시 헤더 배경색
const HEADER_FILL: Rgb = Rgb::from_hex(0xD9D9D9);

/// 기본 시트 이름
pub const DEFAULT_SHEET_NAME: &str = "Vulnerability Scan Report";

/// 시트의 데이터 행 하나
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// 셀 값 ([`SHEET_HEADERS`] 순서)
    pub cells: Vec<String>,
    /// 배경색. 스타일을 끄면 항상 `None`
    pub fill: Option<Rgb>,
}

/// xlsx 렌더러
#[derive(Debug, Clone)]
pub struct SpreadsheetRenderer {
    /// 워크시트 이름
    pub sheet_name: String,
    /// 심각도 배경색 적용 여부
    pub stylize: bool,
}

impl Default for SpreadsheetRenderer {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_owned(),
            stylize: true,
        }
    }
}

impl SpreadsheetRenderer {
    pub fn new(sheet_name: impl Into<String>, stylize: bool) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            stylize,
        }
    }

    /// 데이터 행 목록을 계산합니다.
    pub fn rows(&self, input: &RenderInput<'_>) -> Vec<SheetRow> {
        input
            .aggregate
            .records
            .iter()
            .map(|record| {
                let row = row::format(record);
                let fill = self
                    .stylize
                    .then(|| severity::color(&record.finding.severity));
                SheetRow {
                    cells: row.sheet_fields().iter().map(|s| (*s).to_owned()).collect(),
                    fill,
                }
            })
            .collect()
    }

    /// 통합 문서를 메모리 버퍼로 만듭니다.
    pub fn to_buffer(&self, input: &RenderInput<'_>) -> Result<Vec<u8>, RenderError> {
        let rows = self.rows(input);
        let mut workbook = Workbook::new();

        {
            let sheet = workbook.add_worksheet();
            sheet.set_name(&self.sheet_name)?;

            for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
                sheet.set_column_width(col as u16, *width)?;
            }
            sheet.set_freeze_panes(1, 0)?;

            let mut header_format = Format::new()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Left);
            if self.stylize {
                header_format = with_fill(header_format, HEADER_FILL);
            }
            for (col, header) in SHEET_HEADERS.iter().enumerate() {
                sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
            }

            for (idx, sheet_row) in rows.iter().enumerate() {
                let row_num = idx as u32 + 1;
                let mut cell_format = Format::new()
                    .set_text_wrap()
                    .set_align(FormatAlign::Top)
                    .set_border(FormatBorder::Thin);
                if let Some(fill) = sheet_row.fill {
                    cell_format = with_fill(cell_format, fill);
                }
                for (col, value) in sheet_row.cells.iter().enumerate() {
                    sheet.write_string_with_format(row_num, col as u16, value, &cell_format)?;
                }
            }
        }

        debug!(rows = rows.len(), sheet = %self.sheet_name, "spreadsheet built");
        Ok(workbook.save_to_buffer()?)
    }
}

fn with_fill(format: Format, fill: Rgb) -> Format {
    format
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(fill.to_hex()))
}

impl ReportRenderer for SpreadsheetRenderer {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Spreadsheet
    }

    fn render(&self, input: &RenderInput<'_>, path: &Path) -> Result<(), RenderError> {
        let buffer = self.to_buffer(input)?;
        std::fs::write(path, &buffer).map_err(|e| RenderError::io(path, e))?;

        info!(path = %path.display(), bytes = buffer.len(), "spreadsheet report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scanreport_core::severity::NEUTRAL_COLOR;
    use scanreport_core::types::Report;

    const TWO_FINDINGS: &str = r#"{"Results":[
        {"Target":"app:latest","Type":"alpine","Class":"os-pkgs","Vulnerabilities":[
            {"VulnerabilityID":"CVE-A","Severity":"HIGH","PkgName":"libx"},
            {"VulnerabilityID":"CVE-B","Severity":"CRITICAL","PkgName":"liby"}
        ]},
        {"Target":"empty","Vulnerabilities":[]}
    ]}"#;

    #[test]
    fn rows_keep_input_order_and_skip_empty_targets() {
        let report = Report::parse(TWO_FINDINGS).unwrap();
        let input = RenderInput::new(&report, Utc::now());
        let rows = SpreadsheetRenderer::default().rows(&input);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells[3], "CVE-A");
        assert_eq!(rows[1].cells[3], "CVE-B");
        assert_eq!(rows[0].cells[0], "app:latest");
        assert_eq!(rows[0].cells[2], "OS Packages");
        assert_eq!(rows[0].cells.len(), SHEET_HEADERS.len());
    }

    #[test]
    fn stylize_controls_fill() {
        let report = Report::parse(TWO_FINDINGS).unwrap();
        let input = RenderInput::new(&report, Utc::now());

        let styled = SpreadsheetRenderer::new("s", true).rows(&input);
        assert_eq!(styled[0].fill, Some(severity::color("HIGH")));
        assert_eq!(styled[1].fill, Some(severity::color("CRITICAL")));

        let plain = SpreadsheetRenderer::new("s", false).rows(&input);
        assert!(plain.iter().all(|r| r.fill.is_none()));
    }

    #[test]
    fn unrecognized_severity_gets_neutral_fill() {
        let report = Report::parse(
            r#"{"Results":[{"Target":"t","Vulnerabilities":[{"VulnerabilityID":"X","Severity":"SEVERE"}]}]}"#,
        )
        .unwrap();
        let input = RenderInput::new(&report, Utc::now());
        let rows = SpreadsheetRenderer::default().rows(&input);
        assert_eq!(rows[0].fill, Some(NEUTRAL_COLOR));
        assert_eq!(rows[0].cells[6], "SEVERE");
    }

    #[test]
    fn buffer_is_a_zip_container_even_when_clean() {
        let report = Report::parse(r#"{"Results":[]}"#).unwrap();
        let input = RenderInput::new(&report, Utc::now());
        let buffer = SpreadsheetRenderer::default().to_buffer(&input).unwrap();
        assert!(buffer.starts_with(b"PK"));
    }

    #[test]
    fn invalid_sheet_name_is_a_spreadsheet_error() {
        let report = Report::default();
        let input = RenderInput::new(&report, Utc::now());
        let err = SpreadsheetRenderer::new("bad/name", true)
            .to_buffer(&input)
            .unwrap_err();
        assert_eq!(err.format_name(), "xlsx");
    }
}
