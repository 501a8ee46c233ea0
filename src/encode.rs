//! Serialization of models into localized, version-filtered JSON.
//!
//! Models describe themselves through [`Encode::fields`]: an explicit list
//! of named fields, each optionally gated by a [`VersionGate`] and carrying
//! either a plain value, a key path to resolve, or nested models. Nothing is
//! resolved until [`encode`] walks that list with an [`EncodingContext`].

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::{context::EncodingContext, error::Error, gate::VersionGate, key_path::KeyPath};

/// A model that can be encoded under an [`EncodingContext`].
pub trait Encode {
    /// Fields in wire order.
    fn fields(&self) -> Vec<Field<'_>>;
}

/// The content of one field before resolution.
pub enum FieldValue<'a> {
    /// Emitted as-is.
    Plain(Value),
    /// Resolved from the store in the context's locale.
    Localized(Cow<'a, KeyPath>),
    Nested(&'a dyn Encode),
    /// Emitted as `null` when absent.
    OptionalNested(Option<&'a dyn Encode>),
    List(Vec<&'a dyn Encode>),
}

pub struct Field<'a> {
    name: &'static str,
    gate: Option<VersionGate>,
    value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, value: FieldValue<'a>) -> Self {
        Self {
            name,
            gate: None,
            value,
        }
    }

    pub fn plain(name: &'static str, value: impl Into<Value>) -> Self {
        Self::new(name, FieldValue::Plain(value.into()))
    }

    /// A plain field from any serializable value.
    pub fn serialized(name: &'static str, value: &impl Serialize) -> Result<Self, Error> {
        Ok(Self::new(name, FieldValue::Plain(serde_json::to_value(value)?)))
    }

    pub fn localized(name: &'static str, path: KeyPath) -> Self {
        Self::new(name, FieldValue::Localized(Cow::Owned(path)))
    }

    /// A localized field borrowing a key path declared once elsewhere.
    pub fn localized_ref(name: &'static str, path: &'a KeyPath) -> Self {
        Self::new(name, FieldValue::Localized(Cow::Borrowed(path)))
    }

    pub fn nested(name: &'static str, model: &'a dyn Encode) -> Self {
        Self::new(name, FieldValue::Nested(model))
    }

    pub fn optional(name: &'static str, model: Option<&'a dyn Encode>) -> Self {
        Self::new(name, FieldValue::OptionalNested(model))
    }

    pub fn list(name: &'static str, models: Vec<&'a dyn Encode>) -> Self {
        Self::new(name, FieldValue::List(models))
    }

    /// Restricts this field to the versions admitted by `gate`.
    pub fn gated(mut self, gate: VersionGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Encodes `model` and every nested model under one context.
///
/// Inactive gated fields are left out of the object entirely. The first
/// unresolvable key path or unmatched locale aborts the whole pass; no
/// partially localized output is ever returned.
pub fn encode(model: &dyn Encode, ctx: &EncodingContext<'_>) -> Result<Value, Error> {
    let fields = model.fields();
    let mut object = Map::with_capacity(fields.len());

    for field in fields {
        if let Some(gate) = &field.gate
            && !ctx.is_active(gate)
        {
            trace!(field = field.name, version = %ctx.version(), "omitting gated field");
            continue;
        }

        let value = match field.value {
            FieldValue::Plain(value) => value,
            FieldValue::Localized(path) => ctx.resolve(&path)?.to_json(),
            FieldValue::Nested(child) => encode(child, ctx)?,
            FieldValue::OptionalNested(child) => match child {
                Some(child) => encode(child, ctx)?,
                None => Value::Null,
            },
            FieldValue::List(children) => Value::Array(
                children
                    .into_iter()
                    .map(|child| encode(child, ctx))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };
        object.insert(field.name.to_string(), value);
    }

    Ok(Value::Object(object))
}

/// Encodes `model` straight to a JSON string.
pub fn encode_to_string(model: &dyn Encode, ctx: &EncodingContext<'_>) -> Result<String, Error> {
    let value = encode(model, ctx)?;
    Ok(serde_json::to_string(&value)?)
}
