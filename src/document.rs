//! Parsed translation documents, one per source file.
//!
//! A document is shaped `{ localeTag: nestedTree }`. Shape validation happens
//! here so the merger only ever sees well-formed trees.

use std::{collections::BTreeMap, io::BufRead};

use serde_json::{Map, Value};

use crate::{
    error::Error,
    locale::LocaleId,
    traits::Parser,
    tree::{Leaf, Node},
};

/// One source document, validated and keyed by normalized locale.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizationDocument {
    source: String,
    /// Locale sections in declaration order. Two tags in the same document
    /// may normalize to the same locale; both are kept for the merger.
    locales: Vec<(LocaleId, Node)>,
}

impl LocalizationDocument {
    /// Creates a document from already-built locale trees.
    ///
    /// The trees are held to the same shape rules as [`Self::from_value`]:
    /// each locale maps to a mapping and lists contain only scalars.
    pub fn new(source: impl Into<String>, locales: Vec<(LocaleId, Node)>) -> Result<Self, Error> {
        let source = source.into();
        for (locale, node) in &locales {
            let tag = locale.to_string();
            let Node::Map(children) = node else {
                return Err(Error::malformed(
                    &source,
                    &tag,
                    "expected a mapping under the locale tag",
                ));
            };
            check_map(&source, &tag, children)?;
        }
        Ok(Self { source, locales })
    }

    /// Validates a parsed JSON value and builds a document from it.
    ///
    /// The top level must be an object of locale tags, and each locale must
    /// map to an object. Nested values may be objects, strings, numbers,
    /// booleans, or lists of those scalars.
    pub fn from_value(source: impl Into<String>, value: Value) -> Result<Self, Error> {
        let source = source.into();
        let Value::Object(top) = value else {
            return Err(Error::malformed(
                &source,
                "<root>",
                "expected a mapping of locale tags",
            ));
        };

        let mut locales = Vec::with_capacity(top.len());
        for (tag, tree) in top {
            let locale = LocaleId::parse(&tag).map_err(|_| {
                Error::malformed(&source, &tag, format!("`{tag}` is not a valid locale tag"))
            })?;
            let Value::Object(map) = tree else {
                return Err(Error::malformed(
                    &source,
                    &tag,
                    "expected a mapping under the locale tag",
                ));
            };
            let node = convert_map(&source, &tag, map)?;
            locales.push((locale, node));
        }

        Ok(Self { source, locales })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn locales(&self) -> &[(LocaleId, Node)] {
        &self.locales
    }

    pub(crate) fn into_parts(self) -> (String, Vec<(LocaleId, Node)>) {
        (self.source, self.locales)
    }
}

fn convert_map(source: &str, path: &str, map: Map<String, Value>) -> Result<Node, Error> {
    let mut children = BTreeMap::new();
    for (key, value) in map {
        let child_path = format!("{path}.{key}");
        let child = match value {
            Value::Object(inner) => convert_map(source, &child_path, inner)?,
            other => Node::Leaf(
                Leaf::from_json(&other, &child_path)
                    .map_err(|reason| Error::malformed(source, &child_path, reason))?,
            ),
        };
        children.insert(key, child);
    }
    Ok(Node::Map(children))
}

fn check_map(source: &str, path: &str, children: &BTreeMap<String, Node>) -> Result<(), Error> {
    for (key, child) in children {
        let child_path = format!("{path}.{key}");
        match child {
            Node::Map(inner) => check_map(source, &child_path, inner)?,
            Node::Leaf(Leaf::List(items)) => {
                if let Some(i) = items.iter().position(|item| matches!(item, Leaf::List(_))) {
                    return Err(Error::malformed(
                        source,
                        &child_path,
                        format!("list item {i} under `{child_path}` must be a scalar"),
                    ));
                }
            }
            Node::Leaf(_) => {}
        }
    }
    Ok(())
}

impl Parser for LocalizationDocument {
    fn from_reader<R: BufRead>(source: &str, reader: R) -> Result<Self, Error> {
        let value: Value = serde_json::from_reader(reader).map_err(Error::Parse)?;
        Self::from_value(source, value)
    }
}
