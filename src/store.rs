//! The immutable merged translation store.
//!
//! Built once by [`crate::merge::merge`] and never mutated afterwards. Every
//! read is a pure lookup, so a store can be shared by reference (or `Arc`)
//! across any number of concurrent encoding passes.

use std::collections::BTreeMap;

use crate::{
    error::Error,
    key_path::KeyPath,
    locale::LocaleId,
    matcher::{self, LocaleMatch},
    merge::CollisionWarning,
    provenance::Provenance,
    tree::{Leaf, Node},
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocalizationStore {
    trees: BTreeMap<LocaleId, Node>,
    collisions: Vec<CollisionWarning>,
    provenance: Provenance,
}

impl LocalizationStore {
    pub(crate) fn new(
        trees: BTreeMap<LocaleId, BTreeMap<String, Node>>,
        collisions: Vec<CollisionWarning>,
        provenance: Provenance,
    ) -> Self {
        Self {
            trees: trees
                .into_iter()
                .map(|(locale, map)| (locale, Node::Map(map)))
                .collect(),
            collisions,
            provenance,
        }
    }

    /// All locales present in the store, in sorted order.
    pub fn locales(&self) -> impl Iterator<Item = &LocaleId> {
        self.trees.keys()
    }

    pub fn contains_locale(&self, locale: &LocaleId) -> bool {
        self.trees.contains_key(locale)
    }

    /// The merged tree stored under exactly `locale`, without fallback.
    pub fn tree(&self, locale: &LocaleId) -> Option<&Node> {
        self.trees.get(locale)
    }

    pub(crate) fn entry(&self, locale: &LocaleId) -> Option<(&LocaleId, &Node)> {
        self.trees.get_key_value(locale)
    }

    /// Collisions recorded while merging, in the order they occurred.
    pub fn collisions(&self) -> &[CollisionWarning] {
        &self.collisions
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Picks the tree for `requested` via the locale fallback chain.
    pub fn match_locale(&self, requested: &LocaleId) -> Result<LocaleMatch<'_>, Error> {
        matcher::resolve_tree(self, requested)
    }

    /// Resolves `path` for `requested`, attaching the requested locale to
    /// any `KeyNotFound`.
    pub fn resolve(&self, requested: &LocaleId, path: &KeyPath) -> Result<&Leaf, Error> {
        let matched = self.match_locale(requested)?;
        path.resolve(matched.tree).map_err(|err| match err {
            Error::KeyNotFound { path, reason, .. } => Error::KeyNotFound {
                path,
                locale: Some(requested.clone()),
                reason,
            },
            other => other,
        })
    }

    /// Confirms every locale in `required` resolves through the fallback
    /// chain. Meant for startup, so request-time resolution cannot fail on
    /// a locale the process promised to serve.
    pub fn require_locales(&self, required: &[LocaleId]) -> Result<(), Error> {
        for locale in required {
            self.match_locale(locale)?;
        }
        Ok(())
    }
}
