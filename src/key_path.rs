//! Structured addresses into a translation tree, and the walk that follows
//! them.
//!
//! A key path reads `Owner.parent….property` with an optional trailing
//! discriminator: a named key (`Owner.property.male`) or a zero-based list
//! index (`Owner.property[2]`). Resolution is a pure lookup, so one path can
//! be resolved against every locale's tree without shared state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, LookupFailure},
    tree::{Leaf, Node},
};

/// Qualifier picking one of several values stored under a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discriminator {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPath {
    owner: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parents: Vec<String>,
    property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    discriminator: Option<Discriminator>,
}

impl KeyPath {
    /// Creates a path to `property` on the type named `owner`.
    pub fn new(owner: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            parents: Vec::new(),
            property: property.into(),
            discriminator: None,
        }
    }

    /// Appends a parent segment between the owner and the property.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    /// Selects a named value under the property.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.discriminator = Some(Discriminator::Key(key.into()));
        self
    }

    /// Selects a list element under the property.
    pub fn with_index(mut self, index: usize) -> Self {
        self.discriminator = Some(Discriminator::Index(index));
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn discriminator(&self) -> Option<&Discriminator> {
        self.discriminator.as_ref()
    }

    /// Walks `tree` along this path and returns the leaf it names.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` with the fully qualified path when any
    /// segment is missing, an index is out of range, or the walk ends on a
    /// mapping. The error carries no locale; callers that know it attach it.
    pub fn resolve<'t>(&self, tree: &'t Node) -> Result<&'t Leaf, Error> {
        resolve(tree, self)
    }

    fn not_found(&self, reason: LookupFailure) -> Error {
        Error::KeyNotFound {
            path: self.to_string(),
            locale: None,
            reason,
        }
    }
}

/// Walks `tree` along `path`. See [`KeyPath::resolve`].
pub fn resolve<'t>(tree: &'t Node, path: &KeyPath) -> Result<&'t Leaf, Error> {
    let segments = std::iter::once(path.owner.as_str())
        .chain(path.parents.iter().map(String::as_str))
        .chain(std::iter::once(path.property.as_str()));

    let mut node = tree;
    for segment in segments {
        node = child(node, segment).map_err(|reason| path.not_found(reason))?;
    }

    match &path.discriminator {
        None => {}
        Some(Discriminator::Key(key)) => {
            node = child(node, key).map_err(|reason| path.not_found(reason))?;
        }
        Some(Discriminator::Index(index)) => {
            let Node::Leaf(Leaf::List(items)) = node else {
                return Err(path.not_found(LookupFailure::ExpectedList));
            };
            return items.get(*index).ok_or_else(|| {
                path.not_found(LookupFailure::IndexOutOfRange {
                    index: *index,
                    len: items.len(),
                })
            });
        }
    }

    match node {
        Node::Leaf(leaf) => Ok(leaf),
        Node::Map(_) => Err(path.not_found(LookupFailure::NotALeaf)),
    }
}

fn child<'t>(node: &'t Node, segment: &str) -> Result<&'t Node, LookupFailure> {
    match node {
        Node::Map(children) => children
            .get(segment)
            .ok_or_else(|| LookupFailure::MissingSegment(segment.to_string())),
        Node::Leaf(_) => Err(LookupFailure::ExpectedMapping(segment.to_string())),
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.owner)?;
        for parent in &self.parents {
            write!(f, ".{parent}")?;
        }
        write!(f, ".{}", self.property)?;
        match &self.discriminator {
            Some(Discriminator::Key(key)) => write!(f, ".{key}"),
            Some(Discriminator::Index(index)) => write!(f, "[{index}]"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::LocalizationDocument;
    use serde_json::json;

    fn tree() -> Node {
        let doc = LocalizationDocument::from_value(
            "test.json",
            json!({
                "en": {
                    "Widget": {
                        "title": "Title",
                        "greeting": { "male": "Welcome, sir", "female": "Welcome, madam" },
                        "steps": ["One", "Two", "Three"],
                        "form": { "email": { "label": "Email", "hint": "you@example.com" } }
                    }
                }
            }),
        )
        .unwrap();
        doc.locales()[0].1.clone()
    }

    fn reason(err: Error) -> LookupFailure {
        match err {
            Error::KeyNotFound { reason, .. } => reason,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_plain_property() {
        let tree = tree();
        let leaf = KeyPath::new("Widget", "title").resolve(&tree).unwrap();
        assert_eq!(leaf.as_text(), Some("Title"));
    }

    #[test]
    fn test_resolve_through_parents() {
        let tree = tree();
        let path = KeyPath::new("Widget", "label")
            .with_parent("form")
            .with_parent("email");
        assert_eq!(path.to_string(), "Widget.form.email.label");
        assert_eq!(path.resolve(&tree).unwrap().as_text(), Some("Email"));
    }

    #[test]
    fn test_resolve_named_discriminator() {
        let tree = tree();
        let path = KeyPath::new("Widget", "greeting").with_key("female");
        assert_eq!(path.to_string(), "Widget.greeting.female");
        assert_eq!(path.resolve(&tree).unwrap().as_text(), Some("Welcome, madam"));
    }

    #[test]
    fn test_resolve_index_discriminator() {
        let tree = tree();
        let path = KeyPath::new("Widget", "steps").with_index(1);
        assert_eq!(path.to_string(), "Widget.steps[1]");
        assert_eq!(path.resolve(&tree).unwrap().as_text(), Some("Two"));
    }

    #[test]
    fn test_resolve_whole_list_without_discriminator() {
        let tree = tree();
        let leaf = KeyPath::new("Widget", "steps").resolve(&tree).unwrap();
        assert!(matches!(leaf, Leaf::List(items) if items.len() == 3));
    }

    #[test]
    fn test_index_out_of_range_is_key_not_found() {
        let tree = tree();
        let err = KeyPath::new("Widget", "steps")
            .with_index(3)
            .resolve(&tree)
            .unwrap_err();
        assert_eq!(err.to_string().split(':').next(), Some("key `Widget.steps[3]` not found"));
        assert_eq!(reason(err), LookupFailure::IndexOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn test_index_on_scalar_is_key_not_found() {
        let tree = tree();
        let err = KeyPath::new("Widget", "title")
            .with_index(0)
            .resolve(&tree)
            .unwrap_err();
        assert_eq!(reason(err), LookupFailure::ExpectedList);
    }

    #[test]
    fn test_missing_segments() {
        let tree = tree();
        let err = KeyPath::new("Gadget", "title").resolve(&tree).unwrap_err();
        assert_eq!(reason(err), LookupFailure::MissingSegment("Gadget".to_string()));

        let err = KeyPath::new("Widget", "greeting")
            .with_key("other")
            .resolve(&tree)
            .unwrap_err();
        assert_eq!(reason(err), LookupFailure::MissingSegment("other".to_string()));
    }

    #[test]
    fn test_descending_through_leaf_fails() {
        let tree = tree();
        let err = KeyPath::new("Widget", "deeper")
            .with_parent("title")
            .resolve(&tree)
            .unwrap_err();
        assert_eq!(reason(err), LookupFailure::ExpectedMapping("deeper".to_string()));
    }

    #[test]
    fn test_path_ending_on_mapping_fails() {
        let tree = tree();
        let err = KeyPath::new("Widget", "greeting").resolve(&tree).unwrap_err();
        assert_eq!(reason(err), LookupFailure::NotALeaf);
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let tree = tree();
        let path = KeyPath::new("Widget", "greeting").with_key("male");
        let first = path.resolve(&tree).unwrap().clone();
        for _ in 0..3 {
            assert_eq!(path.resolve(&tree).unwrap(), &first);
        }
    }
}
