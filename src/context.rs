//! Per-request encoding context.
//!
//! One context covers one serialization pass over a whole model graph:
//! every localized field resolves against the same locale and every gated
//! field is judged against the same target version.

use crate::{
    error::{Error, LookupFailure},
    gate::VersionGate,
    key_path::KeyPath,
    locale::LocaleId,
    store::LocalizationStore,
    tree::Leaf,
    version::{SystemVersion, check_request_version},
};

#[derive(Debug, Clone)]
pub struct EncodingContext<'s> {
    store: &'s LocalizationStore,
    locale: LocaleId,
    version: SystemVersion,
}

impl<'s> EncodingContext<'s> {
    pub fn new(store: &'s LocalizationStore, locale: LocaleId, version: SystemVersion) -> Self {
        Self {
            store,
            locale,
            version,
        }
    }

    /// Builds a context from raw request headers.
    ///
    /// Enforces the transport preconditions: both headers present, both
    /// parsable, and the requested version compatible with `current`. The
    /// locale is not checked against the store here; an unknown locale fails
    /// at the first localized field.
    pub fn from_headers(
        store: &'s LocalizationStore,
        locale_header: Option<&str>,
        version_header: Option<&str>,
        current: &SystemVersion,
    ) -> Result<Self, Error> {
        let version = check_request_version(version_header, current)?;
        let raw_locale = locale_header
            .filter(|tag| !tag.trim().is_empty())
            .ok_or(Error::MissingLocale)?;
        let locale = LocaleId::parse(raw_locale)?;
        Ok(Self::new(store, locale, version))
    }

    pub fn locale(&self) -> &LocaleId {
        &self.locale
    }

    pub fn version(&self) -> SystemVersion {
        self.version
    }

    pub fn store(&self) -> &'s LocalizationStore {
        self.store
    }

    /// Resolves `path` in this context's locale.
    pub fn resolve(&self, path: &KeyPath) -> Result<&'s Leaf, Error> {
        self.store.resolve(&self.locale, path)
    }

    /// Resolves `path` and requires a text leaf.
    pub fn text(&self, path: &KeyPath) -> Result<&'s str, Error> {
        let leaf = self.resolve(path)?;
        leaf.as_text().ok_or_else(|| Error::KeyNotFound {
            path: path.to_string(),
            locale: Some(self.locale.clone()),
            reason: LookupFailure::ExpectedText,
        })
    }

    pub fn is_active(&self, gate: &VersionGate) -> bool {
        gate.is_active(&self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{document::LocalizationDocument, merge::merge};
    use serde_json::json;

    fn store() -> LocalizationStore {
        let doc = LocalizationDocument::from_value(
            "base.json",
            json!({ "en": { "Widget": { "title": "Title", "count": 3 } } }),
        )
        .unwrap();
        merge(vec![doc]).unwrap().0
    }

    const CURRENT: SystemVersion = SystemVersion::new(2, 1, 0);

    #[test]
    fn test_from_headers_builds_context() {
        let store = store();
        let ctx = EncodingContext::from_headers(&store, Some("en-GB"), Some("2.0.3"), &CURRENT)
            .unwrap();
        assert_eq!(ctx.locale().to_string(), "en-GB");
        assert_eq!(ctx.version(), SystemVersion::new(2, 0, 3));
        assert_eq!(ctx.text(&KeyPath::new("Widget", "title")).unwrap(), "Title");
    }

    #[test]
    fn test_from_headers_requires_locale() {
        let store = store();
        let err =
            EncodingContext::from_headers(&store, None, Some("2.0.0"), &CURRENT).unwrap_err();
        assert!(matches!(err, Error::MissingLocale));
    }

    #[test]
    fn test_from_headers_rejects_newer_client() {
        let store = store();
        let err = EncodingContext::from_headers(&store, Some("en"), Some("2.2.0"), &CURRENT)
            .unwrap_err();
        assert!(matches!(err, Error::IncompatibleVersion { .. }));
    }

    #[test]
    fn test_text_rejects_non_text_leaf() {
        let store = store();
        let ctx = EncodingContext::new(&store, "en".parse().unwrap(), CURRENT);
        assert!(ctx.resolve(&KeyPath::new("Widget", "count")).is_ok());
        assert!(matches!(
            ctx.text(&KeyPath::new("Widget", "count")),
            Err(Error::KeyNotFound { .. })
        ));
    }
}
