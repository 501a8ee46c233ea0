//! Nested translation trees.
//!
//! A tree is recursively a mapping of string keys to either a sub-tree or a
//! leaf. Leaves are scalars or lists of scalars. Mappings use `BTreeMap` so
//! two trees built from the same content in a different order compare equal.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node of a translation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Map(BTreeMap<String, Node>),
    Leaf(Leaf),
}

/// A terminal value of a translation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Leaf {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    List(Vec<Leaf>),
}

impl Node {
    pub fn as_map(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Map(_) => None,
        }
    }

    /// Number of leaves reachable from this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Map(map) => map.values().map(Node::leaf_count).sum(),
        }
    }
}

impl Leaf {
    /// The text of a `Text` leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Leaf::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Leaf::Text(text) => Value::String(text.clone()),
            Leaf::Number(number) => Value::Number(number.clone()),
            Leaf::Bool(flag) => Value::Bool(*flag),
            Leaf::List(items) => Value::Array(items.iter().map(Leaf::to_json).collect()),
        }
    }

    /// Converts a JSON value into a leaf; mappings, `null`, and lists that
    /// contain either are rejected. `path` locates the value in error text.
    pub(crate) fn from_json(value: &Value, path: &str) -> Result<Self, String> {
        match value {
            Value::String(text) => Ok(Leaf::Text(text.clone())),
            Value::Number(number) => Ok(Leaf::Number(number.clone())),
            Value::Bool(flag) => Ok(Leaf::Bool(*flag)),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Array(_) | Value::Object(_) => {
                        Err(format!("list item {i} under `{path}` must be a scalar"))
                    }
                    _ => Leaf::from_json(item, path),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Leaf::List),
            Value::Null => Err(format!("`{path}` is null")),
            Value::Object(_) => Err(format!("`{path}` is a mapping, not a value")),
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaf::Text(text) => f.write_str(text),
            Leaf::Number(number) => write!(f, "{number}"),
            Leaf::Bool(flag) => write!(f, "{flag}"),
            Leaf::List(items) => {
                let rendered = items.iter().map(Leaf::to_string).collect::<Vec<_>>();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<&str> for Leaf {
    fn from(value: &str) -> Self {
        Leaf::Text(value.to_string())
    }
}
