//! Report aggregation for healthcheck runs.
//!
//! Every check writes its findings as [`domain::ReportRecord`]s into a
//! shared [`services::ReportSink`]. The runner reads the sink at the end of
//! a run to build a [`domain::SuiteSummary`], and the sink's records can be
//! exported as JSON or rendered as plain text.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
