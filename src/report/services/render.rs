//! Plain-text rendering of a finished run.

use minijinja::{Environment, context};
use serde::Serialize;

use super::ReportError;
use crate::report::domain::{ReportLevel, ReportRecord, SuiteSummary};

const TEXT_TEMPLATE: &str = "\
{% for record in records %}[{{ record.level }}] {{ record.check }} {{ record.database }}: {{ record.message }}
{% endfor %}{{ summary.passed }} passed, {{ summary.failed }} failed, {{ summary.warnings }} warnings
{{ outcome }}
";

#[derive(Serialize)]
struct RenderedRecord<'a> {
    level: &'static str,
    check: &'a str,
    database: &'a str,
    message: &'a str,
}

/// Renders records and a summary as a plain-text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextReportRenderer {
    minimum_level: ReportLevel,
}

impl Default for TextReportRenderer {
    fn default() -> Self {
        Self::new(ReportLevel::Warning)
    }
}

impl TextReportRenderer {
    /// Creates a renderer listing records at or above `minimum_level`.
    #[must_use]
    pub const fn new(minimum_level: ReportLevel) -> Self {
        Self { minimum_level }
    }

    /// Returns the lowest level included in the listing.
    #[must_use]
    pub const fn minimum_level(&self) -> ReportLevel {
        self.minimum_level
    }

    /// Renders the report. The summary line is always included.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Render`] when the template fails.
    pub fn render(
        &self,
        summary: &SuiteSummary,
        records: &[ReportRecord],
    ) -> Result<String, ReportError> {
        let listed: Vec<RenderedRecord<'_>> = records
            .iter()
            .filter(|record| record.level() >= self.minimum_level)
            .map(|record| RenderedRecord {
                level: record.level().as_str(),
                check: record.check(),
                database: record.database(),
                message: record.message(),
            })
            .collect();
        let outcome = if summary.is_success() { "PASSED" } else { "FAILED" };

        Environment::new()
            .render_str(
                TEXT_TEMPLATE,
                context! { records => listed, summary => summary, outcome => outcome },
            )
            .map_err(|error| ReportError::Render(error.to_string()))
    }
}
