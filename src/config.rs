//! Typed run settings built from an opaque key/value property map.
//!
//! Keys follow the `database.properties` layout used by healthcheck runs:
//! `host`, `port`, `user`, `password` and `databases` describe the primary
//! server, the same keys prefixed with `secondary.` describe the server
//! holding the previous release, and a handful of flags tune individual
//! behaviours.

use crate::database::domain::{Credentials, DatabaseDomainError, ServerAddress};
use camino::Utf8PathBuf;
use regex::Regex;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use thiserror::Error;

/// Default MySQL port.
pub const DEFAULT_PORT: u16 = 3306;

/// Default maximum number of ids per repair statement.
pub const DEFAULT_REPAIR_BATCH_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(9);

/// Default cap on detailed comparison warnings per check and database.
pub const DEFAULT_MAX_COMPARISON_WARNINGS: usize = 50;

/// Errors returned while reading settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required key is absent or blank.
    #[error("missing required setting: {0}")]
    MissingKey(String),

    /// A port value is not a valid TCP port.
    #[error("invalid port for {key}: {value}")]
    InvalidPort {
        /// Setting key.
        key: String,
        /// Offending value.
        value: String,
    },

    /// A flag value is not a recognised boolean.
    #[error("invalid boolean for {key}: {value}")]
    InvalidBoolean {
        /// Setting key.
        key: String,
        /// Offending value.
        value: String,
    },

    /// A numeric value is not a positive integer.
    #[error("invalid number for {key}: {value}")]
    InvalidNumber {
        /// Setting key.
        key: String,
        /// Offending value.
        value: String,
    },

    /// A schema selection pattern is not a valid regular expression.
    #[error("invalid database pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// A server value failed domain validation.
    #[error(transparent)]
    Domain(#[from] DatabaseDomainError),
}

/// Connection settings and schema selection for one server.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    address: ServerAddress,
    credentials: Credentials,
    patterns: Vec<Regex>,
}

impl ServerSettings {
    /// Creates server settings selecting schemas by full-match patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] when a pattern does not
    /// compile.
    pub fn new<'a>(
        address: ServerAddress,
        credentials: Credentials,
        patterns: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ConfigError> {
        let compiled = patterns
            .into_iter()
            .map(compile_pattern)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            address,
            credentials,
            patterns: compiled,
        })
    }

    /// Returns the server address.
    #[must_use]
    pub const fn address(&self) -> &ServerAddress {
        &self.address
    }

    /// Returns the login credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns `true` when the schema name is selected by any pattern.
    #[must_use]
    pub fn selects(&self, schema_name: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.is_match(schema_name))
    }
}

/// Settings for one healthcheck run.
#[derive(Debug, Clone)]
pub struct Settings {
    primary: ServerSettings,
    secondary: Option<ServerSettings>,
    skip_previous_checks: bool,
    data_file_root: Option<Utf8PathBuf>,
    repair_batch_size: NonZeroUsize,
    max_comparison_warnings: usize,
}

impl Settings {
    /// Creates settings for a primary server with every option at its
    /// default.
    #[must_use]
    pub const fn new(primary: ServerSettings) -> Self {
        Self {
            primary,
            secondary: None,
            skip_previous_checks: false,
            data_file_root: None,
            repair_batch_size: DEFAULT_REPAIR_BATCH_SIZE,
            max_comparison_warnings: DEFAULT_MAX_COMPARISON_WARNINGS,
        }
    }

    /// Reads settings from a property map.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `host` is missing or any value is
    /// malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ensembl_healthchecks::config::Settings;
    /// use std::collections::BTreeMap;
    ///
    /// let properties = BTreeMap::from([
    ///     ("host".to_owned(), "db-staging".to_owned()),
    ///     ("databases".to_owned(), "homo_sapiens_.*".to_owned()),
    ///     ("secondary.host".to_owned(), "db-live".to_owned()),
    /// ]);
    /// let settings = Settings::from_properties(&properties).expect("valid settings");
    /// assert!(settings.primary().selects("homo_sapiens_core_110_38"));
    /// assert!(settings.secondary().is_some());
    /// ```
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let primary = read_server(properties, "", "")?
            .ok_or_else(|| ConfigError::MissingKey("host".to_owned()))?;
        let secondary = read_server(properties, "secondary.", ".*")?;

        let mut settings = Self::new(primary);
        settings.secondary = secondary;
        if let Some(value) = lookup(properties, "skip.previous.checks") {
            settings.skip_previous_checks = parse_bool("skip.previous.checks", value)?;
        }
        settings.data_file_root = lookup(properties, "data.file.root").map(Utf8PathBuf::from);
        if let Some(value) = lookup(properties, "repair.batch.size") {
            settings.repair_batch_size = value
                .parse()
                .map_err(|_| invalid_number("repair.batch.size", value))?;
        }
        if let Some(value) = lookup(properties, "comparison.max.warnings") {
            settings.max_comparison_warnings = value
                .parse()
                .map_err(|_| invalid_number("comparison.max.warnings", value))?;
        }
        Ok(settings)
    }

    /// Sets the secondary (previous release) server.
    #[must_use]
    pub fn with_secondary(mut self, secondary: ServerSettings) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Sets the operational override that skips previous-release
    /// comparisons.
    #[must_use]
    pub const fn with_skip_previous_checks(mut self, skip: bool) -> Self {
        self.skip_previous_checks = skip;
        self
    }

    /// Sets the root directory for database-referenced data files.
    #[must_use]
    pub fn with_data_file_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.data_file_root = Some(root.into());
        self
    }

    /// Sets the maximum number of ids per repair statement.
    #[must_use]
    pub const fn with_repair_batch_size(mut self, size: NonZeroUsize) -> Self {
        self.repair_batch_size = size;
        self
    }

    /// Sets the cap on detailed comparison warnings.
    #[must_use]
    pub const fn with_max_comparison_warnings(mut self, limit: usize) -> Self {
        self.max_comparison_warnings = limit;
        self
    }

    /// Returns the primary server settings.
    #[must_use]
    pub const fn primary(&self) -> &ServerSettings {
        &self.primary
    }

    /// Returns the secondary server settings, if configured.
    #[must_use]
    pub const fn secondary(&self) -> Option<&ServerSettings> {
        self.secondary.as_ref()
    }

    /// Returns `true` when previous-release comparisons are switched off.
    #[must_use]
    pub const fn skip_previous_checks(&self) -> bool {
        self.skip_previous_checks
    }

    /// Returns the root directory for data files, if configured.
    #[must_use]
    pub fn data_file_root(&self) -> Option<&camino::Utf8Path> {
        self.data_file_root.as_deref()
    }

    /// Returns the maximum number of ids per repair statement.
    #[must_use]
    pub const fn repair_batch_size(&self) -> NonZeroUsize {
        self.repair_batch_size
    }

    /// Returns the cap on detailed comparison warnings.
    #[must_use]
    pub const fn max_comparison_warnings(&self) -> usize {
        self.max_comparison_warnings
    }
}

fn lookup<'a>(properties: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    properties
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn read_server(
    properties: &BTreeMap<String, String>,
    prefix: &str,
    default_patterns: &str,
) -> Result<Option<ServerSettings>, ConfigError> {
    let Some(host) = lookup(properties, &format!("{prefix}host")) else {
        return Ok(None);
    };

    let port_key = format!("{prefix}port");
    let port = match lookup(properties, &port_key) {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
            key: port_key.clone(),
            value: value.to_owned(),
        })?,
        None => DEFAULT_PORT,
    };

    let credentials = Credentials::new(
        lookup(properties, &format!("{prefix}user")).unwrap_or_default(),
        lookup(properties, &format!("{prefix}password")).map(str::to_owned),
    );
    let patterns =
        lookup(properties, &format!("{prefix}databases")).unwrap_or(default_patterns);

    ServerSettings::new(
        ServerAddress::new(host, port)?,
        credentials,
        patterns
            .split(',')
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty()),
    )
    .map(Some)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidBoolean {
            key: key.to_owned(),
            value: value.to_owned(),
        }),
    }
}

fn invalid_number(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidNumber {
        key: key.to_owned(),
        value: value.to_owned(),
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|err| ConfigError::InvalidPattern {
        pattern: pattern.to_owned(),
        reason: err.to_string(),
    })
}
