//! Report collection, export and rendering.

mod render;
mod sink;

pub use render::TextReportRenderer;
pub use sink::{ReportError, ReportSink};
