//! Schema naming convention: `{species}_{type}_{schemaVersion}_{geneBuild}`.

use super::{DatabaseType, Species, SpeciesCatalog};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata inferred from a schema name.
///
/// Parsing is total: any string yields a `SchemaName`, with unmatched parts
/// degrading to [`Species::Unknown`], [`DatabaseType::Unknown`] or `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaName {
    raw: String,
    species: Species,
    species_prefix: Option<String>,
    database_type: DatabaseType,
    schema_version: Option<u32>,
    gene_build_version: Option<u32>,
}

impl SchemaName {
    /// Parses a schema name against the species catalogue.
    ///
    /// The species is the longest run of leading `_`-separated tokens that
    /// is a known alias, so multi-token names such as `homo_sapiens` win over
    /// shorter aliases. The token directly after the species is the database
    /// type; the next two numeric tokens are the schema and gene-build
    /// versions. When no species matches, the first type token anywhere in
    /// the name is used instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use ensembl_healthchecks::database::domain::{
    ///     DatabaseType, SchemaName, Species, SpeciesCatalog,
    /// };
    ///
    /// let catalog = SpeciesCatalog::standard();
    /// let name = SchemaName::parse("homo_sapiens_core_110_38", &catalog);
    /// assert_eq!(name.species(), &Species::Known("homo_sapiens".to_owned()));
    /// assert_eq!(name.database_type(), DatabaseType::Core);
    /// assert_eq!(name.schema_version(), Some(110));
    /// assert_eq!(name.gene_build_version(), Some(38));
    /// ```
    #[must_use]
    pub fn parse(raw: &str, catalog: &SpeciesCatalog) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        let tokens: Vec<&str> = normalized.split('_').filter(|t| !t.is_empty()).collect();

        let (species, species_prefix, remainder) = match match_species(&tokens, catalog) {
            Some((matched, prefix_len)) => (
                matched,
                tokens.get(..prefix_len).map(|prefix| prefix.join("_")),
                tokens.get(prefix_len..).unwrap_or_default(),
            ),
            None => (Species::Unknown, None, tokens.as_slice()),
        };

        let type_position = if species.is_known() {
            remainder
                .first()
                .and_then(|token| DatabaseType::from_token(token))
                .map(|_| 0)
        } else {
            remainder
                .iter()
                .position(|token| DatabaseType::from_token(token).is_some())
        };

        let (database_type, versions) = match type_position {
            Some(position) => (
                remainder
                    .get(position)
                    .and_then(|token| DatabaseType::from_token(token))
                    .unwrap_or(DatabaseType::Unknown),
                remainder.get(position.saturating_add(1)..).unwrap_or_default(),
            ),
            None => (DatabaseType::Unknown, &[][..]),
        };

        let unknown_prefix = match (&species, type_position) {
            (Species::Unknown, Some(position)) if position > 0 => {
                remainder.get(..position).map(|prefix| prefix.join("_"))
            }
            _ => None,
        };

        Self {
            raw: raw.to_owned(),
            species,
            species_prefix: species_prefix.or(unknown_prefix),
            database_type,
            schema_version: versions.first().and_then(|token| token.parse().ok()),
            gene_build_version: versions.get(1).and_then(|token| token.parse().ok()),
        }
    }

    /// Returns the name exactly as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the inferred species.
    #[must_use]
    pub const fn species(&self) -> &Species {
        &self.species
    }

    /// Returns the leading tokens naming the species, as written in the
    /// schema name (e.g. `human` for `human_core_110_38`).
    #[must_use]
    pub fn species_prefix(&self) -> Option<&str> {
        self.species_prefix.as_deref()
    }

    /// Returns the inferred database type.
    #[must_use]
    pub const fn database_type(&self) -> DatabaseType {
        self.database_type
    }

    /// Returns the schema (release) version, if numeric.
    #[must_use]
    pub const fn schema_version(&self) -> Option<u32> {
        self.schema_version
    }

    /// Returns the gene-build version, if numeric.
    #[must_use]
    pub const fn gene_build_version(&self) -> Option<u32> {
        self.gene_build_version
    }

    /// Builds the name of the same species and release for another type,
    /// e.g. the core schema matching a funcgen schema.
    ///
    /// Returns `None` when the species prefix or schema version is absent.
    #[must_use]
    pub fn sibling_name(&self, database_type: DatabaseType) -> Option<String> {
        let prefix = self.species_prefix.as_deref()?;
        let version = self.schema_version?;
        Some(match self.gene_build_version {
            Some(gene_build) => format!("{prefix}_{database_type}_{version}_{gene_build}"),
            None => format!("{prefix}_{database_type}_{version}"),
        })
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn match_species(tokens: &[&str], catalog: &SpeciesCatalog) -> Option<(Species, usize)> {
    let longest = catalog.max_alias_tokens().min(tokens.len());
    (1..=longest).rev().find_map(|length| {
        let candidate = tokens.get(..length)?.join("_");
        catalog
            .resolve_alias(&candidate)
            .map(|entry| (entry.species(), length))
    })
}
