//! Behaviour tests for comparing counts with the previous release.

mod previous_version_steps;

use previous_version_steps::world::{ComparisonWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/previous_version_comparison.feature",
    name = "Gene loss beyond the threshold fails the comparison"
)]
#[tokio::test(flavor = "multi_thread")]
async fn gene_loss_fails(world: ComparisonWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/previous_version_comparison.feature",
    name = "Counts within tolerance pass"
)]
#[tokio::test(flavor = "multi_thread")]
async fn within_tolerance_passes(world: ComparisonWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/previous_version_comparison.feature",
    name = "A database without a previous release is skipped"
)]
#[tokio::test(flavor = "multi_thread")]
async fn missing_previous_release_is_skipped(world: ComparisonWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/previous_version_comparison.feature",
    name = "Previous-release checks can be switched off"
)]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_comparison_is_skipped(world: ComparisonWorld) {
    let _ = world;
}
