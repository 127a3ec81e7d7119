//! Prints the check catalogue as JSON for downstream tooling.
//!
//! Usage:
//!
//! ```text
//! list_healthchecks [checks|groups|group <name>|membership <check>]
//! ```
//!
//! `checks` (the default) prints the fully qualified names of every
//! registered check, `groups` prints the group names, `group <name>`
//! prints the flattened checks of one group, and `membership <check>`
//! prints the groups a check belongs to. Output is a JSON array such as
//! `["ensembl_healthchecks::checks::DuplicateMetaEntries"]`.

use std::env;
use std::io::{self, Write};

use ensembl_healthchecks::checks::catalogue;
use ensembl_healthchecks::healthcheck::services::{CatalogueError, CheckCatalogue};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum ListError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
    #[error("failed to serialize listing: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to write listing: {0}")]
    Output(#[from] io::Error),
}

#[derive(Debug, PartialEq, Eq)]
enum Listing {
    Checks,
    Groups,
    Group(String),
    Membership(String),
}

impl Listing {
    fn parse(args: &[String]) -> Result<Self, ListError> {
        match args {
            [] => Ok(Self::Checks),
            [kind] if kind == "checks" => Ok(Self::Checks),
            [kind] if kind == "groups" => Ok(Self::Groups),
            [kind, name] if kind == "group" => Ok(Self::Group(name.clone())),
            [kind, name] if kind == "membership" => Ok(Self::Membership(name.clone())),
            _ => Err(ListError::InvalidArgs(format!(
                "unexpected arguments {args:?}; expected checks, groups, group <name> \
                 or membership <check>"
            ))),
        }
    }
}

fn render(listing: &Listing, catalogue: &CheckCatalogue) -> Result<String, ListError> {
    match listing {
        Listing::Checks => Ok(catalogue.check_names_json()?),
        Listing::Groups => Ok(catalogue.group_names_json()?),
        Listing::Group(name) => {
            let names: Vec<&str> = catalogue
                .find_group(name)?
                .set_of_tests()
                .iter()
                .map(|factory| factory.qualified_name())
                .collect();
            Ok(serde_json::to_string(&names)?)
        }
        Listing::Membership(name) => {
            let factory = catalogue.find_check(name)?;
            Ok(serde_json::to_string(&catalogue.groups_containing(&factory))?)
        }
    }
}

fn main() -> Result<(), ListError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let listing = Listing::parse(&args)?;
    let known = catalogue();
    known.verify()?;
    let output = render(&listing, &known)?;
    tracing::debug!(?listing, "catalogue listed");

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}

#[cfg(test)]
#[path = "list_healthchecks/tests.rs"]
mod tests;
