//! Port abstractions implemented by checks and their collaborators.

mod check;
mod counts;
mod files;

pub use check::{Healthcheck, HealthcheckType, Repair};
pub use counts::CountFetcher;
pub use files::FileProbe;
