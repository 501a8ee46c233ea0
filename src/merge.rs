//! Deep merge of translation documents into one store.
//!
//! Documents contributing the same locale merge key by key, so disjoint
//! subtrees from different files combine losslessly. Two differing leaves at
//! the same path are a collision: it is logged, recorded, and resolved by the
//! configured [`ConflictStrategy`]. A mapping meeting a leaf at the same path
//! is a shape error and aborts the merge.

use std::collections::{BTreeMap, btree_map::Entry};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    document::LocalizationDocument,
    error::Error,
    locale::LocaleId,
    provenance::{Provenance, join_path},
    store::LocalizationStore,
    tree::Node,
};

/// Strategy for resolving two differing leaves at the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    /// Keep the value from the earliest document.
    First,
    /// Keep the value from the latest document (default).
    #[default]
    Last,
}

/// Options controlling merge behavior.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeOptions {
    #[serde(default)]
    pub conflict_strategy: ConflictStrategy,
}

/// A non-fatal record of two documents disagreeing on one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionWarning {
    pub locale: LocaleId,
    pub path: String,
    /// Source that supplied the value before the collision.
    pub first_source: String,
    /// Source whose differing value collided with it.
    pub second_source: String,
}

/// Merges `documents` in order with the default last-document-wins policy.
pub fn merge(
    documents: Vec<LocalizationDocument>,
) -> Result<(LocalizationStore, Vec<CollisionWarning>), Error> {
    merge_with_options(documents, &MergeOptions::default())
}

/// Merges `documents` in order using `options`.
///
/// # Errors
///
/// Returns `Error::MalformedDocument` when a document places a value where an
/// earlier document placed a mapping, or the reverse. Nothing is returned for
/// a partially merged set.
pub fn merge_with_options(
    documents: Vec<LocalizationDocument>,
    options: &MergeOptions,
) -> Result<(LocalizationStore, Vec<CollisionWarning>), Error> {
    let document_count = documents.len();
    let mut state = MergeState {
        trees: BTreeMap::new(),
        provenance: Provenance::default(),
        collisions: Vec::new(),
        strategy: options.conflict_strategy,
    };

    for document in documents {
        let (source, locales) = document.into_parts();
        for (locale, node) in locales {
            state.merge_locale(&source, locale, node)?;
        }
    }

    let MergeState {
        trees,
        provenance,
        collisions,
        ..
    } = state;

    info!(
        documents = document_count,
        locales = trees.len(),
        collisions = collisions.len(),
        "merged localization documents"
    );

    let store = LocalizationStore::new(trees, collisions.clone(), provenance);
    Ok((store, collisions))
}

struct MergeState {
    trees: BTreeMap<LocaleId, BTreeMap<String, Node>>,
    provenance: Provenance,
    collisions: Vec<CollisionWarning>,
    strategy: ConflictStrategy,
}

impl MergeState {
    fn merge_locale(&mut self, source: &str, locale: LocaleId, node: Node) -> Result<(), Error> {
        let Node::Map(incoming) = node else {
            return Err(Error::malformed(
                source,
                locale.to_string(),
                "expected a mapping under the locale tag",
            ));
        };
        let mut target = self.trees.remove(&locale).unwrap_or_default();
        let result = self.merge_maps(source, &locale, "", &mut target, incoming);
        self.trees.insert(locale, target);
        result
    }

    fn merge_maps(
        &mut self,
        source: &str,
        locale: &LocaleId,
        prefix: &str,
        target: &mut BTreeMap<String, Node>,
        incoming: BTreeMap<String, Node>,
    ) -> Result<(), Error> {
        for (key, node) in incoming {
            let path = join_path(prefix, &key);
            let existing = match target.entry(key) {
                Entry::Vacant(slot) => {
                    self.provenance.record_subtree(locale, &path, &node, source);
                    slot.insert(node);
                    continue;
                }
                Entry::Occupied(slot) => slot.into_mut(),
            };

            match (existing, node) {
                (Node::Map(existing_map), Node::Map(incoming_map)) => {
                    self.merge_maps(source, locale, &path, existing_map, incoming_map)?;
                }
                (Node::Leaf(existing_leaf), Node::Leaf(incoming_leaf)) => {
                    let previous = self
                        .provenance
                        .source_of(locale, &path)
                        .unwrap_or_default()
                        .to_string();
                    if *existing_leaf != incoming_leaf {
                        warn!(
                            locale = %locale,
                            path = %path,
                            first = %previous,
                            second = %source,
                            "translation collision"
                        );
                        self.collisions.push(CollisionWarning {
                            locale: locale.clone(),
                            path: path.clone(),
                            first_source: previous,
                            second_source: source.to_string(),
                        });
                    }
                    if self.strategy == ConflictStrategy::Last {
                        *existing_leaf = incoming_leaf;
                        self.provenance.record(locale, path, source);
                    }
                }
                (Node::Map(_), Node::Leaf(_)) => {
                    return Err(Error::malformed(
                        source,
                        format!("{locale}.{path}"),
                        "found a value where another document has a mapping",
                    ));
                }
                (Node::Leaf(_), Node::Map(_)) => {
                    return Err(Error::malformed(
                        source,
                        format!("{locale}.{path}"),
                        "found a mapping where another document has a value",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Leaf;
    use serde_json::json;

    fn doc(source: &str, value: serde_json::Value) -> LocalizationDocument {
        LocalizationDocument::from_value(source, value).unwrap()
    }

    fn text<'a>(store: &'a LocalizationStore, locale: &str, path: &[&str]) -> Option<&'a Leaf> {
        let locale: LocaleId = locale.parse().unwrap();
        let mut node = store.tree(&locale)?;
        for segment in path {
            node = node.as_map()?.get(*segment)?;
        }
        node.as_leaf()
    }

    #[test]
    fn test_disjoint_subtrees_merge_losslessly() {
        let (store, collisions) = merge(vec![
            doc("a.json", json!({ "en": { "Widget": { "title": "Title" } } })),
            doc("b.json", json!({ "en": { "Widget": { "subtitle": "Sub" } } })),
        ])
        .unwrap();

        assert!(collisions.is_empty());
        assert_eq!(
            text(&store, "en", &["Widget", "title"]),
            Some(&Leaf::from("Title"))
        );
        assert_eq!(
            text(&store, "en", &["Widget", "subtitle"]),
            Some(&Leaf::from("Sub"))
        );
    }

    #[test]
    fn test_collision_last_wins_by_default() {
        let (store, collisions) = merge(vec![
            doc("a.json", json!({ "en": { "Widget": { "title": "A" } } })),
            doc("b.json", json!({ "en": { "Widget": { "title": "B" } } })),
        ])
        .unwrap();

        assert_eq!(collisions.len(), 1);
        let collision = &collisions[0];
        assert_eq!(collision.path, "Widget.title");
        assert_eq!(collision.first_source, "a.json");
        assert_eq!(collision.second_source, "b.json");
        assert_eq!(store.collisions(), collisions.as_slice());
        assert_eq!(
            text(&store, "en", &["Widget", "title"]),
            Some(&Leaf::from("B"))
        );
        let en = "en".parse().unwrap();
        assert_eq!(
            store.provenance().source_of(&en, "Widget.title"),
            Some("b.json")
        );
    }

    #[test]
    fn test_collision_first_strategy_keeps_earliest() {
        let options = MergeOptions {
            conflict_strategy: ConflictStrategy::First,
        };
        let (store, collisions) = merge_with_options(
            vec![
                doc("a.json", json!({ "en": { "Widget": { "title": "A" } } })),
                doc("b.json", json!({ "en": { "Widget": { "title": "B" } } })),
            ],
            &options,
        )
        .unwrap();

        assert_eq!(collisions.len(), 1);
        assert_eq!(
            text(&store, "en", &["Widget", "title"]),
            Some(&Leaf::from("A"))
        );
    }

    #[test]
    fn test_identical_leaves_are_not_collisions() {
        let (_, collisions) = merge(vec![
            doc("a.json", json!({ "en": { "Widget": { "title": "Same" } } })),
            doc("b.json", json!({ "en": { "Widget": { "title": "Same" } } })),
        ])
        .unwrap();
        assert!(collisions.is_empty());
    }

    #[test]
    fn test_tags_differing_in_case_share_a_tree() {
        let (store, _) = merge(vec![
            doc("a.json", json!({ "en-gb": { "Widget": { "title": "A" } } })),
            doc("b.json", json!({ "EN-GB": { "Widget": { "color": "colour" } } })),
        ])
        .unwrap();
        assert_eq!(store.locales().count(), 1);
        assert_eq!(
            text(&store, "en-GB", &["Widget", "color"]),
            Some(&Leaf::from("colour"))
        );
    }

    #[test]
    fn test_shape_conflict_aborts_merge() {
        let err = merge(vec![
            doc("a.json", json!({ "en": { "Widget": { "title": "A" } } })),
            doc("b.json", json!({ "en": { "Widget": "flat" } })),
        ])
        .unwrap_err();

        match err {
            Error::MalformedDocument {
                source_name, path, ..
            } => {
                assert_eq!(source_name, "b.json");
                assert_eq!(path, "en.Widget");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_merge_options_deserialize_default() {
        let options: MergeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.conflict_strategy, ConflictStrategy::Last);
        let first: MergeOptions =
            serde_json::from_str(r#"{ "conflict_strategy": "first" }"#).unwrap();
        assert_eq!(first.conflict_strategy, ConflictStrategy::First);
    }
}
