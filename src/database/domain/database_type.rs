//! Database type taxonomy inferred from schema names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of genome-annotation schema a database holds.
///
/// The type is inferred from the token following the species prefix in a
/// schema name. Names without a recognizable type token resolve to
/// [`DatabaseType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseType {
    /// Core gene annotation.
    Core,
    /// Comparative genomics.
    Compara,
    /// Functional genomics and regulation.
    Funcgen,
    /// Genetic variation.
    Variation,
    /// Additional feature sets built alongside the core annotation.
    Otherfeatures,
    /// cDNA alignments.
    Cdna,
    /// Manually curated annotation.
    Vega,
    /// RNA-seq derived models.
    Rnaseq,
    /// EST alignments.
    Est,
    /// Ontology terms.
    Ontology,
    /// Production master data.
    Production,
    /// Schema name did not contain a recognizable type token.
    Unknown,
}

impl DatabaseType {
    /// Every type, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Core,
        Self::Compara,
        Self::Funcgen,
        Self::Variation,
        Self::Otherfeatures,
        Self::Cdna,
        Self::Vega,
        Self::Rnaseq,
        Self::Est,
        Self::Ontology,
        Self::Production,
        Self::Unknown,
    ];

    /// Returns the schema-name token for this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Compara => "compara",
            Self::Funcgen => "funcgen",
            Self::Variation => "variation",
            Self::Otherfeatures => "otherfeatures",
            Self::Cdna => "cdna",
            Self::Vega => "vega",
            Self::Rnaseq => "rnaseq",
            Self::Est => "est",
            Self::Ontology => "ontology",
            Self::Production => "production",
            Self::Unknown => "unknown",
        }
    }

    /// Matches a single schema-name token against the known types.
    ///
    /// Returns `None` for anything that is not a type token, including the
    /// literal `unknown`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|kind| *kind != Self::Unknown)
            .find(|kind| kind.as_str() == token)
    }

    pub(crate) const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
