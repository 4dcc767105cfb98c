//! 페이지 문서(pdf) 렌더러
//!
//! 렌더링은 두 단계입니다.
//!
//! 1. [`DocumentRenderer::layout`] -- 리포트를 [`DocumentLayout`]으로 배치합니다.
//!    페이지 나눔, 행 높이, 색상, 셀 줄바꿈까지 모두 여기서 결정되며 I/O가 없습니다.
//! 2. `paint` -- 배치 결과를 `printpdf` 호출로 옮깁니다.
//!
//! # 문서 구성
//!
//! ```text
//! 제목 블록 (문서 제목, 아티팩트 이름/종류)
//! 요약 대시보드 (생성 시각, 심각도별 개수 상자 5개 + 합계)
//! 대상마다:
//!   배너 (Target / Type / Class)
//!   열 헤더 띠            <- 페이지가 넘어가면 다시 그림
//!   행 (심각도 내림차순, 같은 순위는 패키지 이름 오름차순)
//!                         <- 한 페이지보다 긴 행은 다음 페이지로 이어짐
//!   또는 "No vulnerabilities found" 안내 행
//!   구분선 + 여백
//! 모든 페이지: 바닥글 (생성 시각, 페이지 번호)
//! ```
//!
//! 좌표는 페이지 왼쪽 위를 원점으로 하는 mm 단위입니다.

use std::path::Path;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect,
};
use scanreport_core::severity::{self, NEUTRAL_COLOR, Rgb};
use scanreport_core::types::ScanResult;
use tracing::{debug, info};

use crate::aggregate::{annotate_result, sort_by_severity};
use crate::error::RenderError;
use crate::layout::{self, BASE_HEIGHT, LayoutField, PER_LINE_HEIGHT};
use crate::render::{ArtifactKind, RenderInput, ReportRenderer};
use crate::row::{self, RenderedRow};

/// A4 가로
pub const PAGE_WIDTH: f32 = 297.0;
pub const PAGE_HEIGHT: f32 = 210.0;
pub const MARGIN: f32 = 10.0;

const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const FOOTER_BAND: f32 = 8.0;
const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - MARGIN - FOOTER_BAND;

const TITLE_SIZE: f32 = 18.0;
const BANNER_SIZE: f32 = 10.0;
const BODY_SIZE: f32 = 7.0;
const FOOTER_SIZE: f32 = 7.0;

const BANNER_HEIGHT: f32 = 8.0;
const HEADER_BAND_HEIGHT: f32 = 7.0;
const DASHBOARD_BOX_HEIGHT: f32 = 16.0;
const DASHBOARD_GAP: f32 = 3.0;
const SEPARATOR_THICKNESS: f32 = 0.4;
const SECTION_SPACER: f32 = 6.0;

/// 본문 글자 하나의 대략적인 폭 (mm)
const CHAR_WIDTH: f32 = 1.6;
const CELL_PADDING: f32 = 1.0;

/// 행 배경에 섞을 흰색 비율
const ROW_TINT: f32 = 0.5;

const BANNER_FILL: Rgb = Rgb::from_hex(0xF0F0F0);
const HEADER_FILL: Rgb = Rgb::from_hex(0xC8C8C8);
const RULE_COLOR: Rgb = Rgb::from_hex(0x808080);
const TEXT_COLOR: Rgb = Rgb::from_hex(0x000000);

const LAYER_NAME: &str = "Layer 1";

/// 취약점이 없는 대상에 표시하는 안내 문구
pub const NO_FINDINGS_NOTICE: &str = "No vulnerabilities found";

/// 기본 문서 제목
pub const DEFAULT_TITLE: &str = "Vulnerability Scan Report";

#[derive(Debug, Clone, Copy)]
struct Column {
    header: &'static str,
    width: f32,
    /// [`RenderedRow::sheet_fields`] 인덱스
    field: usize,
    /// 줄바꿈과 행 높이 추정에 쓰는 필드 종류
    layout: LayoutField,
}

/// 표 열. 대상/종류/분류는 배너에 표시합니다.
///
/// 모든 셀은 잘리지 않고 줄바꿈되며, 열 폭은 필드의 줄당 글자 수를 담을 수 있어야 합니다.
const COLUMNS: [Column; 9] = [
    Column { header: "Vulnerability ID", width: 33.0, field: 3, layout: LayoutField::Identifier },
    Column { header: "Severity", width: 16.0, field: 6, layout: LayoutField::Label },
    Column { header: "Source", width: 16.0, field: 5, layout: LayoutField::Label },
    Column { header: "Package", width: 32.0, field: 7, layout: LayoutField::PackageName },
    Column { header: "Installed", width: 31.0, field: 8, layout: LayoutField::Version },
    Column { header: "Fixed", width: 31.0, field: 10, layout: LayoutField::Version },
    Column { header: "Path", width: 27.0, field: 9, layout: LayoutField::Path },
    Column { header: "Title", width: 75.0, field: 4, layout: LayoutField::Title },
    Column { header: "Status", width: 16.0, field: 11, layout: LayoutField::Label },
];

const SEVERITY_COLUMN: usize = 1;

/// 그리기 명령
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// 텍스트. `y`는 기준선 위치
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        text: String,
    },
    /// 채운 사각형. `(x, y)`는 왼쪽 위
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Rgb,
    },
}

/// 한 페이지의 그리기 명령
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// 1부터 시작하는 페이지 번호
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// 이 페이지의 텍스트를 그리는 순서대로 반환합니다.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rect { .. } => None,
        })
    }
}

/// 배치가 끝난 문서
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<Page>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 문서 전체의 텍스트를 페이지 순서대로 반환합니다.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }
}

/// pdf 렌더러
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    /// 제목 블록과 pdf 메타데이터에 쓰는 제목
    pub title: String,
    /// 행 배경을 심각도 색으로 칠할지 여부
    pub stylize: bool,
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            stylize: true,
        }
    }
}

impl DocumentRenderer {
    pub fn new(title: impl Into<String>, stylize: bool) -> Self {
        Self {
            title: title.into(),
            stylize,
        }
    }

    /// 리포트를 페이지로 배치합니다.
    pub fn layout(&self, input: &RenderInput<'_>) -> DocumentLayout {
        let timestamp = input.timestamp();
        let mut builder = LayoutBuilder::new();

        builder.title_block(&self.title, input);
        builder.dashboard(input, &timestamp);
        for result in &input.report.results {
            builder.result_section(result, self.stylize);
        }
        builder.finish(&timestamp)
    }
}

impl ReportRenderer for DocumentRenderer {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Document
    }

    fn render(&self, input: &RenderInput<'_>, path: &Path) -> Result<(), RenderError> {
        let layout = self.layout(input);
        let bytes = paint(&layout, &self.title)?;
        std::fs::write(path, &bytes).map_err(|e| RenderError::io(path, e))?;

        info!(
            path = %path.display(),
            pages = layout.page_count(),
            bytes = bytes.len(),
            "document report written"
        );
        Ok(())
    }
}

struct LayoutBuilder {
    pages: Vec<Page>,
    cursor: f32,
    /// 페이지 고정 머리(반복 헤더)가 끝나는 위치
    page_top: f32,
    /// 표 안에 있으면 새 페이지에 열 헤더를 다시 그림
    in_table: bool,
}

impl LayoutBuilder {
    fn new() -> Self {
        let mut builder = Self {
            pages: Vec::new(),
            cursor: MARGIN,
            page_top: MARGIN,
            in_table: false,
        };
        builder.new_page();
        builder
    }

    fn new_page(&mut self) {
        self.pages.push(Page {
            number: self.pages.len() + 1,
            ops: Vec::new(),
        });
        self.cursor = MARGIN;
        if self.in_table {
            self.header_band();
        }
        self.page_top = self.cursor;
    }

    /// 남은 공간이 `height`보다 작으면 페이지를 넘깁니다.
    ///
    /// 빈 페이지에서는 넘기지 않으므로 한 페이지보다 큰 블록도 무한히 넘기지 않습니다.
    fn ensure(&mut self, height: f32) {
        if self.cursor + height > CONTENT_BOTTOM && self.cursor > self.page_top {
            self.new_page();
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, bold: bool, text: impl Into<String>) {
        self.push(DrawOp::Text {
            x,
            y,
            size,
            bold,
            text: text.into(),
        });
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Rgb) {
        self.push(DrawOp::Rect { x, y, w, h, fill });
    }

    fn title_block(&mut self, title: &str, input: &RenderInput<'_>) {
        self.text(MARGIN, self.cursor + 7.0, TITLE_SIZE, true, title);
        self.cursor += 10.0;

        let report = input.report;
        if !report.artifact_name.is_empty() {
            let type_label = report.artifact_type_label();
            let line = if type_label.is_empty() {
                format!("Artifact: {}", report.artifact_name)
            } else {
                format!("Artifact: {} ({})", report.artifact_name, type_label)
            };
            self.text(MARGIN, self.cursor + 4.0, BANNER_SIZE, false, line);
            self.cursor += 6.0;
        }
        self.cursor += 2.0;
    }

    fn dashboard(&mut self, input: &RenderInput<'_>, timestamp: &str) {
        let summary = &input.aggregate.summary;

        self.text(MARGIN, self.cursor + 4.0, 9.0, false, format!("Generated: {timestamp}"));
        self.cursor += 7.0;

        let boxes = severity::SeverityBucket::ALL
            .iter()
            .map(|bucket| (bucket.to_string(), summary.get(*bucket), bucket.color()))
            .chain(std::iter::once(("Total".to_owned(), summary.total, BANNER_FILL)));

        let box_width = (CONTENT_WIDTH - 5.0 * DASHBOARD_GAP) / 6.0;
        let top = self.cursor;
        let mut x = MARGIN;
        for (label, count, fill) in boxes {
            self.rect(x, top, box_width, DASHBOARD_BOX_HEIGHT, fill);
            self.text(x + 3.0, top + 6.0, 8.0, false, label);
            self.text(x + 3.0, top + 13.0, 14.0, true, count.to_string());
            x += box_width + DASHBOARD_GAP;
        }
        self.cursor += DASHBOARD_BOX_HEIGHT + SECTION_SPACER;
    }

    fn banner(&mut self, result: &ScanResult) {
        let line = format!(
            "Target: {}  |  Type: {}  |  Class: {}",
            result.target,
            result.target_type,
            result.class.label()
        );
        let max_chars = column_chars(CONTENT_WIDTH * BODY_SIZE / BANNER_SIZE);

        self.rect(MARGIN, self.cursor, CONTENT_WIDTH, BANNER_HEIGHT, BANNER_FILL);
        self.text(
            MARGIN + CELL_PADDING,
            self.cursor + 5.5,
            BANNER_SIZE,
            true,
            layout::fit_to_width(&line, max_chars),
        );
        self.cursor += BANNER_HEIGHT;
    }

    fn header_band(&mut self) {
        self.rect(MARGIN, self.cursor, CONTENT_WIDTH, HEADER_BAND_HEIGHT, HEADER_FILL);
        let mut x = MARGIN;
        for column in &COLUMNS {
            self.text(x + CELL_PADDING, self.cursor + 4.5, BODY_SIZE, true, column.header);
            x += column.width;
        }
        self.cursor += HEADER_BAND_HEIGHT;
    }

    fn result_section(&mut self, result: &ScanResult, stylize: bool) {
        let min_row = BASE_HEIGHT + PER_LINE_HEIGHT;
        self.ensure(BANNER_HEIGHT + HEADER_BAND_HEIGHT + min_row);
        self.banner(result);
        self.header_band();
        self.in_table = true;

        if result.has_findings() {
            let mut records = annotate_result(result);
            sort_by_severity(&mut records);
            for record in &records {
                let fill = if stylize {
                    severity::color(&record.finding.severity).lighten(ROW_TINT)
                } else {
                    NEUTRAL_COLOR
                };
                let bold_severity = record.rank() >= severity::rank(severity::HIGH);
                self.finding_row(&row::format(record), fill, bold_severity);
            }
        } else {
            self.ensure(min_row);
            self.rect(MARGIN, self.cursor, CONTENT_WIDTH, min_row, NEUTRAL_COLOR);
            self.text(
                MARGIN + CELL_PADDING,
                self.cursor + BASE_HEIGHT / 2.0 + PER_LINE_HEIGHT - 1.0,
                BODY_SIZE,
                false,
                NO_FINDINGS_NOTICE,
            );
            self.cursor += min_row;
        }

        self.in_table = false;
        self.rect(MARGIN, self.cursor + 1.0, CONTENT_WIDTH, SEPARATOR_THICKNESS, RULE_COLOR);
        self.cursor += 1.0 + SEPARATOR_THICKNESS + SECTION_SPACER;
    }

    /// 현재 페이지에 더 그릴 수 있는 행 줄 수
    fn lines_that_fit(&self) -> usize {
        let room = CONTENT_BOTTOM - self.cursor - BASE_HEIGHT;
        if room < PER_LINE_HEIGHT {
            return 0;
        }
        ((room + 0.001) / PER_LINE_HEIGHT).floor() as usize
    }

    /// 취약점 한 행을 그립니다.
    ///
    /// 높이는 모든 셀의 길이로 추정합니다. 빈 페이지에도 들어가지 않는 행은
    /// 남은 줄을 다음 페이지로 이어서 그립니다.
    fn finding_row(&mut self, row: &RenderedRow, fill: Rgb, bold_severity: bool) {
        let fields = row.sheet_fields();
        let cells: Vec<(LayoutField, &str)> = COLUMNS
            .iter()
            .map(|column| (column.layout, fields[column.field]))
            .collect();
        let height = layout::text_row_height(&cells);
        self.ensure(height);

        let lines: Vec<Vec<String>> = cells
            .iter()
            .map(|&(field, text)| layout::wrap_lines(text, field))
            .collect();
        let total = lines.iter().map(Vec::len).max().unwrap_or(1);

        let mut start = 0;
        while start < total {
            let mut room = self.lines_that_fit();
            if room == 0 && self.cursor > self.page_top {
                self.new_page();
                room = self.lines_that_fit();
            }
            let count = room.max(1).min(total - start);
            self.row_slice(&lines, start, count, fill, bold_severity);
            start += count;
            if start < total {
                self.new_page();
            }
        }
    }

    /// 각 셀의 `start..start + count` 줄을 한 덩어리로 그립니다.
    fn row_slice(
        &mut self,
        lines: &[Vec<String>],
        start: usize,
        count: usize,
        fill: Rgb,
        bold_severity: bool,
    ) {
        let top = self.cursor;
        let height = BASE_HEIGHT + count as f32 * PER_LINE_HEIGHT;
        self.rect(MARGIN, top, CONTENT_WIDTH, height, fill);

        let mut x = MARGIN;
        for (idx, (column, cell)) in COLUMNS.iter().zip(lines).enumerate() {
            let bold = bold_severity && idx == SEVERITY_COLUMN;
            for (line_no, line) in cell.iter().skip(start).take(count).enumerate() {
                let baseline = top + BASE_HEIGHT / 2.0 + (line_no as f32 + 1.0) * PER_LINE_HEIGHT - 1.0;
                self.text(x + CELL_PADDING, baseline, BODY_SIZE, bold, line.clone());
            }
            x += column.width;
        }
        self.cursor += height;
    }

    /// 모든 페이지에 바닥글을 붙이고 배치를 마칩니다.
    fn finish(mut self, timestamp: &str) -> DocumentLayout {
        let total = self.pages.len();
        let rule_y = PAGE_HEIGHT - MARGIN - FOOTER_BAND + 2.0;
        let baseline = PAGE_HEIGHT - MARGIN - 1.5;

        for page in &mut self.pages {
            page.ops.push(DrawOp::Rect {
                x: MARGIN,
                y: rule_y,
                w: CONTENT_WIDTH,
                h: SEPARATOR_THICKNESS / 2.0,
                fill: RULE_COLOR,
            });
            page.ops.push(DrawOp::Text {
                x: MARGIN,
                y: baseline,
                size: FOOTER_SIZE,
                bold: false,
                text: format!("Generated: {timestamp}"),
            });
            page.ops.push(DrawOp::Text {
                x: PAGE_WIDTH - MARGIN - 25.0,
                y: baseline,
                size: FOOTER_SIZE,
                bold: false,
                text: format!("Page {} of {}", page.number, total),
            });
        }

        debug!(pages = total, "document layout built");
        DocumentLayout { pages: self.pages }
    }
}

/// 본문 글꼴로 폭 `width`(mm)에 들어가는 글자 수
fn column_chars(width: f32) -> usize {
    ((width - 2.0 * CELL_PADDING) / CHAR_WIDTH) as usize
}

/// 배치 결과를 pdf 바이트로 그립니다.
fn paint(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Document(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Document(e.to_string()))?;

    let mut first = Some((first_page, first_layer));
    for page in &layout.pages {
        let (page_idx, layer_idx) = match first.take() {
            Some(indices) => indices,
            None => doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME),
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        for op in &page.ops {
            paint_op(&layer, op, &regular, &bold);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Document(e.to_string()))
}

fn paint_op(layer: &PdfLayerReference, op: &DrawOp, regular: &IndirectFontRef, bold: &IndirectFontRef) {
    match op {
        DrawOp::Rect { x, y, w, h, fill } => {
            layer.set_fill_color(pdf_color(*fill));
            layer.add_rect(Rect::new(
                Mm(*x),
                Mm(PAGE_HEIGHT - y - h),
                Mm(x + w),
                Mm(PAGE_HEIGHT - y),
            ));
        }
        DrawOp::Text {
            x,
            y,
            size,
            bold: is_bold,
            text,
        } => {
            let font = if *is_bold { bold } else { regular };
            layer.set_fill_color(pdf_color(TEXT_COLOR));
            layer.use_text(text.as_str(), *size, Mm(*x), Mm(PAGE_HEIGHT - y), font);
        }
    }
}

fn pdf_color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.to_unit();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}
