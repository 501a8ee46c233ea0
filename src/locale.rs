//! Normalized locale identifiers used as top-level keys into the store.
//!
//! Parsing goes through `unic_langid`, which canonicalizes subtag casing
//! (`EN-gb` becomes `en-GB`), so derived equality and hashing on the
//! canonical parts are case-insensitive with respect to the input tag.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// A language tag reduced to language, optional script, and optional region.
///
/// Variants are dropped; the store never keys on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleId {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl LocaleId {
    /// Parses a wire-format tag such as `en`, `en-GB`, `zh_Hant_TW`.
    pub fn parse(tag: &str) -> Result<Self, Error> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidLocale(tag.to_string()));
        }
        let candidate = trimmed.replace('_', "-");
        let lang_id: LanguageIdentifier = candidate
            .parse()
            .map_err(|_| Error::InvalidLocale(tag.to_string()))?;
        Ok(Self::from(&lang_id))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The same identifier with its script removed.
    pub fn without_script(&self) -> Self {
        Self {
            language: self.language.clone(),
            script: None,
            region: self.region.clone(),
        }
    }

    /// The bare language, with script and region removed.
    pub fn language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            script: None,
            region: None,
        }
    }
}

impl From<&LanguageIdentifier> for LocaleId {
    fn from(lang_id: &LanguageIdentifier) -> Self {
        Self {
            language: lang_id.language.as_str().to_ascii_lowercase(),
            script: lang_id.script.map(|s| s.as_str().to_string()),
            region: lang_id.region.map(|r| r.as_str().to_string()),
        }
    }
}

impl FromStr for LocaleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocaleId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LocaleId> for String {
    fn from(value: LocaleId) -> Self {
        value.to_string()
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(script) = &self.script {
            write!(f, "-{script}")?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{region}")?;
        }
        Ok(())
    }
}
