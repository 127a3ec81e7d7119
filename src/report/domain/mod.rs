//! Domain model for report records and run summaries.

mod level;
mod record;
mod summary;

pub use level::ReportLevel;
pub use record::ReportRecord;
pub use summary::{CheckVerdict, SuiteSummary};
