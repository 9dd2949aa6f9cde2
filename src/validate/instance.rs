//! Validated instances
//!
//! An `Instance` is the output of a successful validation call: a
//! fully-populated, schema-tagged record of field name to validated
//! value. Partial instances never escape the pipeline. Nested
//! validated sub-objects keep their own `Instance` (and therefore
//! their own schema), which is what lets the serializer apply
//! per-schema rules recursively — including for union fields, where
//! only the winning variant's schema is known at validation time.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::schema::Schema;

/// Errors from caller-side instance mutation
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("instances of schema '{0}' are immutable")]
    Immutable(String),

    #[error("no field '{field}' in schema '{schema}'")]
    NoSuchField { schema: String, field: String },
}

/// A validated field value.
#[derive(Clone, PartialEq)]
pub enum FieldData {
    /// Scalar (string, int, float, bool)
    Value(Value),
    /// Nested validated instance carrying its own schema
    Instance(Instance),
    /// Sequence of validated elements
    Array(Vec<FieldData>),
    /// String-keyed mapping of validated values, in input order
    Map(Vec<(String, FieldData)>),
}

impl FieldData {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldData::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            FieldData::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_value().and_then(Value::as_f64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    /// Length for length-based constraints: characters for strings,
    /// entries for sequences and mappings.
    pub fn length(&self) -> Option<usize> {
        match self {
            FieldData::Value(Value::String(s)) => Some(s.chars().count()),
            FieldData::Value(Value::Array(a)) => Some(a.len()),
            FieldData::Value(Value::Object(o)) => Some(o.len()),
            FieldData::Array(items) => Some(items.len()),
            FieldData::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Converts to a plain primitive tree, ignoring serialization
    /// options (nested instances flatten with their defaults).
    pub fn to_plain(&self) -> Value {
        match self {
            FieldData::Value(v) => v.clone(),
            FieldData::Instance(i) => i.to_plain(),
            FieldData::Array(items) => Value::Array(items.iter().map(FieldData::to_plain).collect()),
            FieldData::Map(entries) => {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k.clone(), v.to_plain());
                }
                Value::Object(map)
            }
        }
    }
}

impl fmt::Debug for FieldData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_plain())
    }
}

impl From<Value> for FieldData {
    fn from(value: Value) -> Self {
        FieldData::Value(value)
    }
}

/// Read-only view of the already-validated sibling fields, handed to
/// field validators. Fields that failed earlier stages are absent.
#[derive(Clone, Copy)]
pub struct Siblings<'a> {
    fields: &'a [(String, FieldData)],
}

impl<'a> Siblings<'a> {
    pub(crate) fn new(fields: &'a [(String, FieldData)]) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&'a FieldData> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a FieldData)> {
        self.fields.iter().map(|(n, d)| (n.as_str(), d))
    }
}

/// Fully-populated, schema-conformant output of a successful
/// validation call.
///
/// Instances are immutable unless the schema was built with
/// `mutable()`; after-model hooks run before the instance is sealed
/// and may always mutate it.
#[derive(Clone)]
pub struct Instance {
    schema: Arc<Schema>,
    fields: Vec<(String, FieldData)>,
    extras: Map<String, Value>,
    sealed: bool,
}

impl Instance {
    pub(crate) fn new(
        schema: Arc<Schema>,
        fields: Vec<(String, FieldData)>,
        extras: Map<String, Value>,
    ) -> Self {
        Self {
            schema,
            fields,
            extras,
            sealed: false,
        }
    }

    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn schema_name(&self) -> &str {
        self.schema.name()
    }

    pub fn get(&self, name: &str) -> Option<&FieldData> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }

    /// Replaces a field value. Rejected once the instance is sealed
    /// unless the schema was declared mutable; after-model hooks run
    /// pre-seal and are never rejected.
    pub fn set(&mut self, name: &str, data: FieldData) -> Result<(), InstanceError> {
        if self.sealed && !self.schema.is_mutable() {
            return Err(InstanceError::Immutable(self.schema.name().to_string()));
        }
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => {
                *slot = data;
                Ok(())
            }
            None => Err(InstanceError::NoSuchField {
                schema: self.schema.name().to_string(),
                field: name.to_string(),
            }),
        }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldData)> {
        self.fields.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Undeclared input keys carried under `ExtraPolicy::Allow`.
    pub fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Plain primitive tree with no serialization options applied.
    pub fn to_plain(&self) -> Value {
        let mut map = Map::new();
        for (name, data) in &self.fields {
            map.insert(name.clone(), data.to_plain());
        }
        for (name, value) in &self.extras {
            map.insert(name.clone(), value.clone());
        }
        Value::Object(map)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name()
            && self.fields == other.fields
            && self.extras == other.extras
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.schema.name(), self.to_plain())
    }
}
