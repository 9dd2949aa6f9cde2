//! Validator pipeline
//!
//! Orchestrates the ordered validation stages for a schema:
//! before-model hooks, presence/default resolution, coercion,
//! constraint checks, field validators, nested and union recursion,
//! extra-key policy, and after-model hooks. Field-level failures are
//! collected across the whole input — a failing field never silences
//! its siblings — and either a fully-populated instance or the
//! aggregated error tree is returned, never both.

use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use super::coerce::{coerce_scalar, json_type_name, ScalarType};
use super::errors::{ErrorKind, ErrorNode, ErrorTree, PathSegment};
use super::instance::{FieldData, Instance, Siblings};
use super::union::resolve_union;
use crate::schema::{
    DefaultPolicy, ExtraPolicy, FieldType, Schema, SchemaRef, SchemaRegistry,
};

/// Default bound on nested-schema recursion. Self-referential schemas
/// recurse per level of input nesting; the bound keeps adversarial
/// inputs from exhausting the stack.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Schema validator backed by a registry for named-reference lookups.
///
/// Validation is a pure synchronous computation: the validator holds
/// no mutable state and may be shared freely across threads.
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
    max_depth: usize,
}

impl<'a> Validator<'a> {
    /// Creates a validator backed by the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Overrides the recursion depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validates a raw input tree against a schema.
    ///
    /// Returns the fully-populated instance, or the ordered error
    /// tree describing every field-level failure at once.
    ///
    /// # Panics
    ///
    /// Panics if the schema (or a schema it references) uses a named
    /// reference that is not in this validator's registry.
    /// Registration checks make this unreachable for schemas obtained
    /// from the registry.
    pub fn validate(&self, schema: &Arc<Schema>, input: &Value) -> Result<Instance, ErrorTree> {
        let result = self.validate_schema(schema, input, 0);
        if let Err(tree) = &result {
            trace!(schema = %schema.name(), errors = tree.len(), "validation failed");
        }
        result
    }

    /// Decodes a JSON document and validates the resulting tree.
    ///
    /// A decode failure surfaces as a single root `MalformedInput`
    /// error rather than a field-level tree.
    pub fn validate_json(&self, schema: &Arc<Schema>, text: &str) -> Result<Instance, ErrorTree> {
        let input: Value = serde_json::from_str(text).map_err(|e| {
            ErrorTree::single(ErrorNode::root(
                ErrorKind::MalformedInput,
                format!("invalid JSON: {}", e),
            ))
        })?;
        self.validate(schema, &input)
    }

    pub(crate) fn validate_schema(
        &self,
        schema: &Arc<Schema>,
        input: &Value,
        depth: usize,
    ) -> Result<Instance, ErrorTree> {
        if depth >= self.max_depth {
            return Err(ErrorTree::single(ErrorNode::root(
                ErrorKind::DepthLimitExceeded,
                format!("nesting depth limit of {} exceeded", self.max_depth),
            )));
        }

        let obj = input.as_object().ok_or_else(|| {
            ErrorTree::single(ErrorNode::type_mismatch("object", json_type_name(input)))
        })?;

        // Before-model hooks see the raw map and may rewrite it. A
        // hook failure aborts the whole call: no per-field state
        // exists to continue from.
        let mut raw = obj.clone();
        for hook in &schema.before {
            if let Err(msg) = (hook.func)(&mut raw) {
                return Err(ErrorTree::single(ErrorNode::root(
                    ErrorKind::ModelValidatorFailure,
                    format!("before validator '{}': {}", hook.name, msg),
                )));
            }
        }

        let mut errors = ErrorTree::new();
        let mut fields: Vec<(String, FieldData)> = Vec::with_capacity(schema.fields.len());
        let mut consumed: Vec<&str> = Vec::with_capacity(schema.fields.len());

        for spec in &schema.fields {
            // Presence: input alias first, field name as fallback.
            let mut raw_value: Option<&Value> = None;
            if let Some(alias) = &spec.input_alias {
                if let Some(v) = raw.get(alias.as_str()) {
                    consumed.push(alias.as_str());
                    raw_value = Some(v);
                }
            }
            if raw_value.is_none() {
                if let Some(v) = raw.get(spec.name.as_str()) {
                    consumed.push(spec.name.as_str());
                    raw_value = Some(v);
                }
            }

            let value: Value = match raw_value {
                Some(v) => v.clone(),
                None => match &spec.default {
                    DefaultPolicy::Value(v) => v.clone(),
                    DefaultPolicy::Factory(factory) => factory(),
                    DefaultPolicy::Required => {
                        errors.push(ErrorNode::missing(&spec.name));
                        continue;
                    }
                },
            };

            let field_path = [PathSegment::key(&spec.name)];
            let strict = schema.field_strict(spec);

            let data = match self.validate_value(
                &spec.field_type,
                &value,
                strict,
                schema.trim_strings,
                depth,
            ) {
                Ok(data) => data,
                Err(sub) => {
                    errors.merge_under(&field_path, sub);
                    continue;
                }
            };

            // Every constraint runs even after one fails, so a value
            // reports all of its simultaneous violations.
            let mut constraint_failed = false;
            for constraint in &spec.constraints {
                if let Err(msg) = constraint.check(&data) {
                    errors.push(ErrorNode::new(
                        field_path.to_vec(),
                        ErrorKind::ConstraintViolation,
                        msg,
                    ));
                    constraint_failed = true;
                }
            }
            if constraint_failed {
                continue;
            }

            // Field validators run in attachment order; the first
            // failure stops this field's remaining validators only.
            let mut data = data;
            let mut validator_failed = false;
            for validator in &spec.validators {
                match (validator.func)(&data, Siblings::new(&fields)) {
                    Ok(transformed) => data = transformed,
                    Err(msg) => {
                        errors.push(ErrorNode::new(
                            field_path.to_vec(),
                            ErrorKind::FieldValidatorFailure,
                            format!("validator '{}': {}", validator.name, msg),
                        ));
                        validator_failed = true;
                        break;
                    }
                }
            }
            if validator_failed {
                continue;
            }

            fields.push((spec.name.clone(), data));
        }

        // Undeclared keys, resolved once per the schema's policy, in
        // input order.
        let mut extras = serde_json::Map::new();
        for (key, value) in &raw {
            if consumed.contains(&key.as_str()) {
                continue;
            }
            match schema.extra {
                ExtraPolicy::Forbid => {
                    errors.push(ErrorNode::new(
                        vec![PathSegment::key(key)],
                        ErrorKind::UnknownField,
                        "undeclared field",
                    ));
                }
                ExtraPolicy::Ignore => {}
                ExtraPolicy::Allow => {
                    extras.insert(key.clone(), value.clone());
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut instance = Instance::new(schema.clone(), fields, extras);
        for hook in &schema.after {
            if let Err(msg) = (hook.func)(&mut instance) {
                return Err(ErrorTree::single(ErrorNode::root(
                    ErrorKind::ModelValidatorFailure,
                    format!("after validator '{}': {}", hook.name, msg),
                )));
            }
        }
        instance.seal();
        Ok(instance)
    }

    /// Validates one value against a declared type. Returned error
    /// paths are relative to the value's own root; the caller
    /// prefixes them.
    pub(crate) fn validate_value(
        &self,
        field_type: &FieldType,
        raw: &Value,
        strict: bool,
        trim: bool,
        depth: usize,
    ) -> Result<FieldData, ErrorTree> {
        match field_type {
            FieldType::String => self.coerce(ScalarType::String, raw, trim, strict),
            FieldType::Int => self.coerce(ScalarType::Int, raw, trim, strict),
            FieldType::Float => self.coerce(ScalarType::Float, raw, trim, strict),
            FieldType::Bool => self.coerce(ScalarType::Bool, raw, trim, strict),

            FieldType::Array { element } => {
                let items = raw.as_array().ok_or_else(|| {
                    ErrorTree::single(ErrorNode::type_mismatch("array", json_type_name(raw)))
                })?;
                let mut errors = ErrorTree::new();
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match self.validate_value(element, item, strict, trim, depth) {
                        Ok(data) => out.push(data),
                        Err(sub) => errors.merge_under(&[PathSegment::Index(i)], sub),
                    }
                }
                if errors.is_empty() {
                    Ok(FieldData::Array(out))
                } else {
                    Err(errors)
                }
            }

            FieldType::Map { value } => {
                let entries = raw.as_object().ok_or_else(|| {
                    ErrorTree::single(ErrorNode::type_mismatch("map", json_type_name(raw)))
                })?;
                let mut errors = ErrorTree::new();
                let mut out = Vec::with_capacity(entries.len());
                for (key, item) in entries {
                    match self.validate_value(value, item, strict, trim, depth) {
                        Ok(data) => out.push((key.clone(), data)),
                        Err(sub) => errors.merge_under(&[PathSegment::key(key)], sub),
                    }
                }
                if errors.is_empty() {
                    Ok(FieldData::Map(out))
                } else {
                    Err(errors)
                }
            }

            FieldType::Nested(schema_ref) => {
                let nested = self.resolve_ref(schema_ref);
                self.validate_schema(&nested, raw, depth + 1)
                    .map(FieldData::Instance)
            }

            FieldType::Union(union) => resolve_union(self, union, raw, depth),
        }
    }

    fn coerce(
        &self,
        target: ScalarType,
        raw: &Value,
        trim: bool,
        strict: bool,
    ) -> Result<FieldData, ErrorTree> {
        coerce_scalar(target, raw, trim, strict)
            .map(FieldData::Value)
            .map_err(|failure| {
                ErrorTree::single(ErrorNode::root(
                    ErrorKind::TypeMismatch,
                    failure.to_string(),
                ))
            })
    }

    pub(crate) fn resolve_ref(&self, schema_ref: &SchemaRef) -> Arc<Schema> {
        match self.registry.resolve(schema_ref) {
            Some(schema) => schema,
            // Registration proves named references resolvable; only a
            // schema that bypassed the registry can reach this.
            None => match schema_ref {
                SchemaRef::Named(name) => panic!(
                    "unresolved schema reference '{}'; register it before validating",
                    name
                ),
                SchemaRef::Inline(_) => unreachable!("inline references always resolve"),
            },
        }
    }
}
