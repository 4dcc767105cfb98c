#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: 렌더링 에러 (`RenderError`)
//! - [`aggregate`]: 집계기 (`aggregate`, `AnnotatedFinding`, `SeverityCount`, `sort_by_severity`)
//! - [`row`]: 행 포맷터 (`format`, `RenderedRow`)
//! - [`layout`]: 레이아웃 추정기 (`estimate_row_height`, `wrap_lines`, `fit_to_width`)
//! - [`render`]: 렌더러 (`ReportRenderer` trait, xlsx/pdf/csv 구현)

pub mod aggregate;
pub mod error;
pub mod layout;
pub mod render;
pub mod row;

// --- Public API Re-exports ---

// Error
pub use error::RenderError;

// Aggregator
pub use aggregate::{Aggregate, AnnotatedFinding, SeverityCount, aggregate, sort_by_severity};

// Row Formatter
pub use row::{RenderedRow, format};

// Layout Estimator
pub use layout::{LayoutField, estimate_row_height};

// Renderers
pub use render::{
    ArtifactKind, DocumentRenderer, RenderInput, ReportRenderer, SpreadsheetRenderer,
    TabularRenderer,
};
