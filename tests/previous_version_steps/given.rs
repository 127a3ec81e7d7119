//! Given steps for previous-release comparison scenarios.

use super::world::{ComparisonWorld, ScriptedDatabase};
use rstest_bdd_macros::given;

#[given(r#"a database "{name}" under test counting {count:u64} "{kind}" genes"#)]
fn database_under_test(world: &mut ComparisonWorld, name: String, count: u64, kind: String) {
    world.current = Some(ScriptedDatabase {
        name,
        counts: vec![(kind, count)],
    });
}

#[given(r#"a previous release "{name}" counting {count:u64} "{kind}" genes"#)]
fn previous_release(world: &mut ComparisonWorld, name: String, count: u64, kind: String) {
    world.previous = Some(ScriptedDatabase {
        name,
        counts: vec![(kind, count)],
    });
}

#[given("previous-release checks are disabled")]
fn previous_checks_disabled(world: &mut ComparisonWorld) {
    world.skip_previous = true;
}
