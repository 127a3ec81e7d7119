//! Concrete checks and the groups and catalogue built from them.

mod compare_arrays;
mod compare_biotypes;
mod data_files;
mod duplicate_meta;
mod funcgen_seq_regions;
mod groups;

pub use compare_arrays::ComparePreviousVersionArrays;
pub use compare_biotypes::ComparePreviousVersionBiotypes;
pub use data_files::DataFilesExist;
pub use duplicate_meta::DuplicateMetaEntries;
pub use funcgen_seq_regions::FuncgenCoreSeqRegions;
pub use groups::{catalogue, compare_previous, funcgen, post_genebuild, release};

#[cfg(test)]
mod tests;
