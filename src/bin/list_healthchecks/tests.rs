//! Unit tests for argument parsing and listing output.

use super::{ListError, Listing, render};
use ensembl_healthchecks::checks::catalogue;
use rstest::rstest;

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| (*arg).to_owned()).collect()
}

#[rstest]
#[case(&[], Listing::Checks)]
#[case(&["checks"], Listing::Checks)]
#[case(&["groups"], Listing::Groups)]
#[case(&["group", "funcgen"], Listing::Group("funcgen".to_owned()))]
#[case(
    &["membership", "DataFilesExist"],
    Listing::Membership("DataFilesExist".to_owned())
)]
fn parses_listing_arguments(#[case] args: &[&str], #[case] expected: Listing) {
    let listing = Listing::parse(&strings(args)).expect("valid arguments");
    assert_eq!(listing, expected);
}

#[rstest]
fn rejects_unknown_arguments() {
    let result = Listing::parse(&strings(&["everything"]));
    assert!(matches!(result, Err(ListError::InvalidArgs(_))));
}

#[rstest]
fn lists_group_members_as_qualified_names() {
    let output =
        render(&Listing::Group("funcgen".to_owned()), &catalogue()).expect("render listing");
    let names: Vec<String> = serde_json::from_str(&output).expect("json array");
    assert_eq!(names.len(), 3);
    assert!(names.iter().all(|name| name.starts_with("ensembl_healthchecks::checks::")));
}

#[rstest]
fn unknown_group_is_an_error() {
    let result = render(&Listing::Group("nightly".to_owned()), &catalogue());
    assert!(matches!(result, Err(ListError::Catalogue(_))));
}

#[rstest]
fn membership_lists_outer_and_nested_groups() {
    let output = render(
        &Listing::Membership("ComparePreviousVersionBiotypes".to_owned()),
        &catalogue(),
    )
    .expect("render listing");
    let groups: Vec<String> = serde_json::from_str(&output).expect("json array");
    assert_eq!(groups, ["release", "post_genebuild", "compare_previous"]);
}

#[rstest]
fn shipped_catalogue_passes_verification() {
    catalogue().verify().expect("report names match type names");
}
