//! Startup configuration and the bootstrap sequence.
//!
//! Bootstrapping merges every document, checks that each locale the process
//! promises to serve resolves, and installs the current API version. Any
//! failure aborts startup before a request is served.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    document::LocalizationDocument,
    error::Error,
    locale::LocaleId,
    merge::{ConflictStrategy, MergeOptions, merge_with_options},
    store::LocalizationStore,
    version::{SystemVersion, install_current_version},
};

pub const CURRENT_VERSION_ENV: &str = "LANGGATE_CURRENT_VERSION";
pub const REQUIRED_LOCALES_ENV: &str = "LANGGATE_REQUIRED_LOCALES";
pub const CONFLICT_STRATEGY_ENV: &str = "LANGGATE_CONFLICT_STRATEGY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The API version this process serves.
    pub current_version: SystemVersion,
    /// Locales that must resolve once documents are merged.
    #[serde(default)]
    pub required_locales: Vec<LocaleId>,
    #[serde(default)]
    pub merge: MergeOptions,
}

impl EngineConfig {
    pub fn new(current_version: SystemVersion) -> Self {
        Self {
            current_version,
            required_locales: Vec::new(),
            merge: MergeOptions::default(),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from any key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let raw_version = lookup(CURRENT_VERSION_ENV)
            .ok_or_else(|| Error::config_error(format!("{CURRENT_VERSION_ENV} not set")))?;
        let current_version = SystemVersion::parse(&raw_version)
            .map_err(|err| Error::config_error(format!("{CURRENT_VERSION_ENV}: {err}")))?;

        let required_locales = lookup(REQUIRED_LOCALES_ENV)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(LocaleId::parse)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
            .map_err(|err| Error::config_error(format!("{REQUIRED_LOCALES_ENV}: {err}")))?
            .unwrap_or_default();

        let conflict_strategy = match lookup(CONFLICT_STRATEGY_ENV).as_deref().map(str::trim) {
            None | Some("") => ConflictStrategy::default(),
            Some(raw) if raw.eq_ignore_ascii_case("last") => ConflictStrategy::Last,
            Some(raw) if raw.eq_ignore_ascii_case("first") => ConflictStrategy::First,
            Some(other) => {
                return Err(Error::config_error(format!(
                    "{CONFLICT_STRATEGY_ENV} must be `first` or `last`, got `{other}`"
                )));
            }
        };

        Ok(Self {
            current_version,
            required_locales,
            merge: MergeOptions { conflict_strategy },
        })
    }

    /// Merges `documents` and checks the required locales, without touching
    /// process-wide state.
    pub fn build_store(
        &self,
        documents: Vec<LocalizationDocument>,
    ) -> Result<LocalizationStore, Error> {
        let (store, _) = merge_with_options(documents, &self.merge)?;
        store.require_locales(&self.required_locales)?;
        Ok(store)
    }
}

/// Runs the full startup sequence and returns the store to share.
///
/// # Errors
///
/// Fails on malformed documents, a required locale with no match, or a
/// second call in the same process.
pub fn bootstrap(
    config: &EngineConfig,
    documents: Vec<LocalizationDocument>,
) -> Result<LocalizationStore, Error> {
    let store = config.build_store(documents)?;
    install_current_version(config.current_version)?;
    info!(
        version = %config.current_version,
        locales = store.locales().count(),
        "localization engine ready"
    );
    Ok(store)
}
