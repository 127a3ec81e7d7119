//! Shared machinery checks are built from.

mod catalogue;
mod comparator;
mod context;
mod group;
mod repair;
mod runner;

pub use catalogue::{CatalogueError, CheckCatalogue};
pub use comparator::{KeyFinding, PreviousVersionComparator, SqlCountFetcher, compare_counts};
pub use context::{CheckContext, CheckEnvironment};
pub use group::{CheckFactory, GroupOfTests};
pub use repair::{DuplicateRemovalPlanner, execute_repair, show_repair};
pub use runner::SuiteRunner;
