//! Records which document supplied each leaf of the merged store.
//!
//! Paths are dot-joined key segments below the locale, e.g. `Widget.title`.

use std::collections::BTreeMap;

use crate::{locale::LocaleId, tree::Node};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    sources: BTreeMap<LocaleId, BTreeMap<String, String>>,
}

impl Provenance {
    /// Source name of the document that supplied the leaf at `path`.
    pub fn source_of(&self, locale: &LocaleId, path: &str) -> Option<&str> {
        self.sources
            .get(locale)
            .and_then(|paths| paths.get(path))
            .map(String::as_str)
    }

    pub(crate) fn record(&mut self, locale: &LocaleId, path: String, source: &str) {
        self.sources
            .entry(locale.clone())
            .or_default()
            .insert(path, source.to_string());
    }

    /// Records `source` for every leaf under `node`, rooted at `path`.
    pub(crate) fn record_subtree(
        &mut self,
        locale: &LocaleId,
        path: &str,
        node: &Node,
        source: &str,
    ) {
        match node {
            Node::Leaf(_) => self.record(locale, path.to_string(), source),
            Node::Map(children) => {
                for (key, child) in children {
                    self.record_subtree(locale, &join_path(path, key), child, source);
                }
            }
        }
    }
}

pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
