//! 표 형식(csv) 렌더러
//!
//! 취약점 하나당 한 줄, 고정 9열. 스타일도 대상별 그룹도 없으며 집계 순서를 그대로 씁니다.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::RenderError;
use crate::render::{ArtifactKind, RenderInput, ReportRenderer};
use crate::row::{self, TABULAR_HEADERS};

/// csv 렌더러
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularRenderer;

impl TabularRenderer {
    pub fn new() -> Self {
        Self
    }

    /// 헤더와 본문을 `writer`에 씁니다. 취약점이 없어도 헤더는 항상 씁니다.
    ///
    /// 기록한 데이터 행 수를 반환합니다.
    pub fn write_to<W: Write>(&self, input: &RenderInput<'_>, writer: W) -> Result<usize, RenderError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(TABULAR_HEADERS)?;

        for record in &input.aggregate.records {
            let row = row::format(record);
            csv_writer.write_record(row.tabular_fields())?;
        }

        csv_writer
            .flush()
            .map_err(|e| RenderError::Tabular(e.to_string()))?;
        Ok(input.aggregate.records.len())
    }
}

impl ReportRenderer for TabularRenderer {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Tabular
    }

    fn render(&self, input: &RenderInput<'_>, path: &Path) -> Result<(), RenderError> {
        let mut buffer = Vec::new();
        let rows = self.write_to(input, &mut buffer)?;
        std::fs::write(path, &buffer).map_err(|e| RenderError::io(path, e))?;

        info!(path = %path.display(), rows, bytes = buffer.len(), "tabular report written");
        Ok(())
    }
}
