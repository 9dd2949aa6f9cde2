//! In-memory schema registry
//!
//! Schemas are registered once at application setup and handed out as
//! `Arc<Schema>` for the rest of the process lifetime. Named
//! references (`SchemaRef::Named`) are bound lazily: registration
//! proves they resolve, validation performs the actual lookup. This
//! avoids construction-order cycles for self-referential schemas.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::errors::{SchemaBuildError, SchemaBuildResult};
use super::types::{FieldType, Schema, SchemaRef};

/// Registry of named schemas.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema under its name.
    ///
    /// Named references inside the schema must resolve against
    /// already-registered schemas or the schema's own name; for
    /// mutually-recursive groups use [`register_all`].
    ///
    /// [`register_all`]: SchemaRegistry::register_all
    pub fn register(&mut self, schema: Schema) -> SchemaBuildResult<Arc<Schema>> {
        self.register_all(vec![schema])
            .map(|mut v| v.pop().expect("one schema in, one handle out"))
    }

    /// Registers a batch of schemas, checking named references across
    /// the whole batch so mutually-recursive schemas can be declared
    /// in any order.
    pub fn register_all(&mut self, schemas: Vec<Schema>) -> SchemaBuildResult<Vec<Arc<Schema>>> {
        let mut batch_names: HashSet<String> = HashSet::new();
        for schema in &schemas {
            if self.schemas.contains_key(schema.name()) || !batch_names.insert(schema.name().to_string()) {
                return Err(SchemaBuildError::DuplicateSchema(schema.name().to_string()));
            }
        }

        for schema in &schemas {
            let mut refs = Vec::new();
            collect_named_refs(schema, &mut refs);
            for referenced in refs {
                if !self.schemas.contains_key(&referenced) && !batch_names.contains(&referenced) {
                    return Err(SchemaBuildError::UnresolvedReference {
                        schema: schema.name().to_string(),
                        referenced,
                    });
                }
            }
        }

        let mut handles = Vec::with_capacity(schemas.len());
        for schema in schemas {
            debug!(schema = %schema.name(), fields = schema.fields().len(), "registered schema");
            let handle = Arc::new(schema);
            self.schemas.insert(handle.name().to_string(), handle.clone());
            handles.push(handle);
        }
        Ok(handles)
    }

    /// Looks up a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Resolves a schema reference. Named references not present in
    /// the registry return `None`; registration guarantees this does
    /// not happen for schemas obtained from this registry.
    pub fn resolve(&self, schema_ref: &SchemaRef) -> Option<Arc<Schema>> {
        match schema_ref {
            SchemaRef::Inline(schema) => Some(schema.clone()),
            SchemaRef::Named(name) => self.get(name),
        }
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Names of all registered schemas (unordered).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

/// Walks every schema reference reachable from `schema` without going
/// through the registry, collecting the names that will need lazy
/// resolution. Inline nested schemas are traversed; named targets are
/// not (they were checked when they were registered).
fn collect_named_refs(schema: &Schema, out: &mut Vec<String>) {
    for spec in schema.fields() {
        collect_from_type(spec.field_type(), out);
    }
}

fn collect_from_type(field_type: &FieldType, out: &mut Vec<String>) {
    match field_type {
        FieldType::Array { element } => collect_from_type(element, out),
        FieldType::Map { value } => collect_from_type(value, out),
        FieldType::Nested(r) => collect_from_ref(r, out),
        FieldType::Union(union) => {
            for r in union.variant_refs() {
                collect_from_ref(r, out);
            }
        }
        _ => {}
    }
}

fn collect_from_ref(schema_ref: &SchemaRef, out: &mut Vec<String>) {
    match schema_ref {
        SchemaRef::Inline(schema) => collect_named_refs(schema, out),
        SchemaRef::Named(name) => out.push(name.clone()),
    }
}
