//! Species tags and the alias/taxonomy catalogue used to resolve them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Species inferred from a schema name or resolved from an alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// A species known to the catalogue, by canonical name.
    Known(String),
    /// The name could not be matched against the catalogue.
    Unknown,
}

impl Species {
    /// Returns the canonical name, or `unknown`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(name) => name,
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` when the species was resolved.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalogue row: canonical name, NCBI taxonomy id and aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    canonical: String,
    taxonomy_id: u32,
    aliases: Vec<String>,
}

impl SpeciesEntry {
    /// Creates an entry. The canonical name is always an alias of itself.
    #[must_use]
    pub fn new(
        canonical: impl Into<String>,
        taxonomy_id: u32,
        aliases: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        let canonical_name = canonical.into().trim().to_ascii_lowercase();
        let mut all_aliases: Vec<String> = aliases
            .into_iter()
            .map(|alias| alias.trim().to_ascii_lowercase())
            .filter(|alias| !alias.is_empty())
            .collect();
        if !all_aliases.contains(&canonical_name) {
            all_aliases.push(canonical_name.clone());
        }
        Self {
            canonical: canonical_name,
            taxonomy_id,
            aliases: all_aliases,
        }
    }

    /// Returns the canonical species name, e.g. `homo_sapiens`.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Returns the NCBI taxonomy identifier.
    #[must_use]
    pub const fn taxonomy_id(&self) -> u32 {
        self.taxonomy_id
    }

    /// Returns every alias, including the canonical name.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns the species tag for this entry.
    #[must_use]
    pub fn species(&self) -> Species {
        Species::Known(self.canonical.clone())
    }
}

/// Constructed lookup table of species aliases and taxonomy ids.
///
/// The catalogue is built once and shared by reference; nothing about it is
/// global.
#[derive(Debug, Clone, Default)]
pub struct SpeciesCatalog {
    entries: Vec<SpeciesEntry>,
    alias_index: HashMap<String, usize>,
    taxonomy_index: HashMap<u32, usize>,
}

impl SpeciesCatalog {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the catalogue of commonly released species.
    #[must_use]
    pub fn standard() -> Self {
        [
            SpeciesEntry::new("homo_sapiens", 9606, ["human", "hsapiens", "hsap", "homo"]),
            SpeciesEntry::new("mus_musculus", 10090, ["mouse", "mmusculus", "mmus"]),
            SpeciesEntry::new("rattus_norvegicus", 10116, ["rat", "rnorvegicus", "rnor"]),
            SpeciesEntry::new("danio_rerio", 7955, ["zebrafish", "drerio", "drer"]),
            SpeciesEntry::new("gallus_gallus", 9031, ["chicken", "ggallus", "ggal"]),
            SpeciesEntry::new("sus_scrofa", 9823, ["pig", "sscrofa", "sscr"]),
            SpeciesEntry::new("bos_taurus", 9913, ["cow", "btaurus", "btau"]),
            SpeciesEntry::new(
                "canis_lupus_familiaris",
                9615,
                ["dog", "cfamiliaris", "canis_familiaris"],
            ),
            SpeciesEntry::new("pan_troglodytes", 9598, ["chimp", "chimpanzee", "ptroglodytes"]),
            SpeciesEntry::new("macaca_mulatta", 9544, ["macaque", "mmulatta", "rhesus"]),
            SpeciesEntry::new(
                "drosophila_melanogaster",
                7227,
                ["fly", "fruitfly", "dmelanogaster"],
            ),
            SpeciesEntry::new("caenorhabditis_elegans", 6239, ["worm", "celegans"]),
            SpeciesEntry::new("saccharomyces_cerevisiae", 4932, ["yeast", "scerevisiae"]),
            SpeciesEntry::new("xenopus_tropicalis", 8364, ["frog", "xtropicalis"]),
            SpeciesEntry::new("ciona_intestinalis", 7719, ["ciona", "cintestinalis"]),
        ]
        .into_iter()
        .fold(Self::new(), Self::with_entry)
    }

    /// Adds an entry, returning the extended catalogue.
    ///
    /// Aliases or taxonomy ids already claimed by an earlier entry keep
    /// pointing at that entry.
    #[must_use]
    pub fn with_entry(mut self, entry: SpeciesEntry) -> Self {
        let position = self.entries.len();
        for alias in entry.aliases() {
            self.alias_index.entry(alias.clone()).or_insert(position);
        }
        self.taxonomy_index
            .entry(entry.taxonomy_id())
            .or_insert(position);
        self.entries.push(entry);
        self
    }

    /// Returns every entry in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[SpeciesEntry] {
        &self.entries
    }

    /// Resolves an alias such as `human` to its catalogue entry.
    #[must_use]
    pub fn resolve_alias(&self, alias: &str) -> Option<&SpeciesEntry> {
        let normalized = alias.trim().to_ascii_lowercase();
        self.alias_index
            .get(&normalized)
            .and_then(|position| self.entries.get(*position))
    }

    /// Resolves an alias to a species tag, degrading to [`Species::Unknown`].
    #[must_use]
    pub fn species_for_alias(&self, alias: &str) -> Species {
        self.resolve_alias(alias)
            .map_or(Species::Unknown, SpeciesEntry::species)
    }

    /// Finds the entry for an NCBI taxonomy id.
    #[must_use]
    pub fn by_taxonomy_id(&self, taxonomy_id: u32) -> Option<&SpeciesEntry> {
        self.taxonomy_index
            .get(&taxonomy_id)
            .and_then(|position| self.entries.get(*position))
    }

    /// Returns the taxonomy id of a resolved species.
    #[must_use]
    pub fn taxonomy_id(&self, species: &Species) -> Option<u32> {
        match species {
            Species::Known(name) => self.resolve_alias(name).map(SpeciesEntry::taxonomy_id),
            Species::Unknown => None,
        }
    }

    /// Returns the length of the longest alias, counted in `_`-separated
    /// tokens.
    pub(crate) fn max_alias_tokens(&self) -> usize {
        self.alias_index
            .keys()
            .map(|alias| alias.split('_').count())
            .max()
            .unwrap_or(0)
    }
}
