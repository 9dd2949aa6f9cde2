//! Serialization subsystem
//!
//! Converts validated instances back into primitive trees and JSON
//! text. Output order is fixed: declared fields in declaration order,
//! then extras carried under the allow policy, then computed fields.
//! Include/exclude filters and alias emission are per-call options;
//! a field marked excluded on its spec is omitted unconditionally,
//! even when an include filter names it.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::validate::{FieldData, Instance};

/// Per-call serialization options.
///
/// By default every non-excluded field is emitted under its declared
/// name and filters apply to the top level only; nested instances
/// serialize with their own schema's defaults (alias emission always
/// propagates).
#[derive(Debug, Clone, Default)]
pub struct SerializeOptions {
    include: Option<HashSet<String>>,
    exclude: HashSet<String>,
    by_alias: bool,
    recursive: bool,
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts output to the named fields (schema-level excludes
    /// still win). Names match field names, not output aliases.
    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Omits the named fields from output.
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    /// Emits output aliases instead of field names.
    pub fn by_alias(mut self) -> Self {
        self.by_alias = true;
        self
    }

    /// Applies the include/exclude filters at every nesting level
    /// instead of the top level only.
    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    fn emits(&self, name: &str) -> bool {
        if self.exclude.contains(name) {
            return false;
        }
        match &self.include {
            Some(included) => included.contains(name),
            None => true,
        }
    }

    /// Options applied one level down.
    fn nested(&self) -> Self {
        if self.recursive {
            self.clone()
        } else {
            Self {
                by_alias: self.by_alias,
                ..Self::default()
            }
        }
    }
}

/// Serializes an instance to a primitive tree under the given
/// options.
pub fn serialize(instance: &Instance, opts: &SerializeOptions) -> Value {
    let schema = instance.schema();
    let mut out = Map::new();

    for spec in schema.fields() {
        if spec.is_excluded() || !opts.emits(spec.name()) {
            continue;
        }
        let Some(data) = instance.get(spec.name()) else {
            continue;
        };
        let key = if opts.by_alias {
            spec.output_key()
        } else {
            spec.name()
        };
        out.insert(key.to_string(), data_to_value(data, opts));
    }

    for (key, value) in instance.extras() {
        if opts.emits(key) {
            out.insert(key.clone(), value.clone());
        }
    }

    // Computed fields come last and are derived fresh per call.
    for computed in schema.computed() {
        if !opts.emits(computed.name()) {
            continue;
        }
        let key = if opts.by_alias {
            computed.output_alias().unwrap_or(computed.name())
        } else {
            computed.name()
        };
        out.insert(key.to_string(), computed.evaluate(instance));
    }

    Value::Object(out)
}

fn data_to_value(data: &FieldData, opts: &SerializeOptions) -> Value {
    match data {
        FieldData::Value(v) => v.clone(),
        FieldData::Instance(inner) => serialize(inner, &opts.nested()),
        FieldData::Array(items) => {
            Value::Array(items.iter().map(|d| data_to_value(d, opts)).collect())
        }
        FieldData::Map(entries) => {
            let mut map = Map::new();
            for (k, v) in entries {
                map.insert(k.clone(), data_to_value(v, opts));
            }
            Value::Object(map)
        }
    }
}

impl Instance {
    /// Serializes with default options.
    pub fn dump(&self) -> Value {
        serialize(self, &SerializeOptions::default())
    }

    /// Serializes under the given options.
    pub fn dump_with(&self, opts: &SerializeOptions) -> Value {
        serialize(self, opts)
    }

    /// Serializes to compact JSON text.
    pub fn dump_json(&self, opts: &SerializeOptions) -> serde_json::Result<String> {
        serde_json::to_string(&serialize(self, opts))
    }

    /// Serializes to pretty-printed JSON text.
    pub fn dump_json_pretty(&self, opts: &SerializeOptions) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&serialize(self, opts))
    }
}
