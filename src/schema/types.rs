//! Schema type definitions
//!
//! A `Schema` is an immutable description of an entity's validated
//! shape: an ordered list of field specs (declaration order fixes
//! serialization order), computed fields, and before/after model
//! hooks. Schemas are constructed through `SchemaBuilder`, which
//! enforces the build-time invariants (unique field names,
//! type-appropriate constraints, valid patterns) so that validation
//! itself never has to second-guess the schema.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

use super::errors::{SchemaBuildError, SchemaBuildResult};
use crate::validate::instance::{FieldData, Instance, Siblings};

/// Before-model hook: runs on the raw input map prior to any field
/// processing and may add, remove, or rewrite keys.
pub type BeforeHookFn = dyn Fn(&mut Map<String, Value>) -> Result<(), String> + Send + Sync;

/// After-model hook: runs on the fully-built instance and may mutate
/// fields in place or reject the instance.
pub type AfterHookFn = dyn Fn(&mut Instance) -> Result<(), String> + Send + Sync;

/// Field validator: runs after coercion and constraint checks, sees
/// the already-validated sibling fields, and may transform the value.
pub type FieldValidatorFn =
    dyn Fn(&FieldData, Siblings<'_>) -> Result<FieldData, String> + Send + Sync;

/// Computed field body, evaluated at serialization time.
pub type ComputedFn = dyn Fn(&Instance) -> Value + Send + Sync;

/// Default factory: produces a fresh value per instance so defaults
/// are never shared between instances.
pub type DefaultFactoryFn = dyn Fn() -> Value + Send + Sync;

/// Supported field types
#[derive(Clone)]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Homogeneous sequence with a single element type
    Array {
        /// Element type (boxed to allow recursive types)
        element: Box<FieldType>,
    },
    /// String-keyed mapping with a single value type
    Map {
        /// Value type
        value: Box<FieldType>,
    },
    /// Nested schema, inline or resolved by name through the registry
    Nested(SchemaRef),
    /// Polymorphic field: one of several schema variants
    Union(UnionSpec),
}

impl FieldType {
    /// Returns the type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Array { .. } => "array",
            FieldType::Map { .. } => "map",
            FieldType::Nested(_) => "object",
            FieldType::Union(_) => "union",
        }
    }

    /// Shorthand for an array of the given element type.
    pub fn array_of(element: FieldType) -> Self {
        FieldType::Array {
            element: Box::new(element),
        }
    }

    /// Shorthand for a string-keyed map of the given value type.
    pub fn map_of(value: FieldType) -> Self {
        FieldType::Map {
            value: Box::new(value),
        }
    }

    /// Shorthand for an inline nested schema.
    pub fn nested(schema: Arc<Schema>) -> Self {
        FieldType::Nested(SchemaRef::Inline(schema))
    }

    /// Shorthand for a nested schema resolved by registry name. This
    /// is how a schema refers to itself or to a schema registered
    /// later in the same batch.
    pub fn named(name: impl Into<String>) -> Self {
        FieldType::Nested(SchemaRef::Named(name.into()))
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Array { element } => write!(f, "array<{:?}>", element),
            FieldType::Map { value } => write!(f, "map<{:?}>", value),
            FieldType::Nested(r) => write!(f, "nested({:?})", r),
            FieldType::Union(u) => write!(f, "union({} variants)", u.variant_refs().len()),
            other => f.write_str(other.type_name()),
        }
    }
}

/// Reference to a schema, either held directly or bound lazily by
/// registry name. Named references are what make self-referential and
/// mutually-recursive schemas possible: the name is resolved at
/// validation time, after registration has proven it resolvable.
#[derive(Clone)]
pub enum SchemaRef {
    Inline(Arc<Schema>),
    Named(String),
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaRef::Inline(s) => write!(f, "inline '{}'", s.name()),
            SchemaRef::Named(n) => write!(f, "named '{}'", n),
        }
    }
}

/// Union field description.
///
/// Without a discriminator, variants are trial-validated in declared
/// order and the first variant that validates wins; when every
/// variant fails, the reported errors are those of the *first*
/// variant attempted. This is a deliberate, deterministic policy:
/// one readable failure beats a merged, unreadable one.
///
/// With a discriminator, the named field's raw value is matched
/// exactly against the mapping and only the selected variant is
/// validated; an unmapped value fails immediately with a single
/// unknown-variant error naming the allowed set.
#[derive(Clone)]
pub enum UnionSpec {
    Untagged {
        variants: Vec<SchemaRef>,
    },
    Discriminated {
        field: String,
        mapping: Vec<(String, SchemaRef)>,
    },
}

impl UnionSpec {
    /// Untagged union over the given variants, tried in order.
    pub fn untagged(variants: Vec<SchemaRef>) -> Self {
        UnionSpec::Untagged { variants }
    }

    /// Discriminated union: `field`'s raw value selects the variant.
    pub fn discriminated(
        field: impl Into<String>,
        mapping: Vec<(impl Into<String>, SchemaRef)>,
    ) -> Self {
        UnionSpec::Discriminated {
            field: field.into(),
            mapping: mapping.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub(crate) fn variant_refs(&self) -> Vec<&SchemaRef> {
        match self {
            UnionSpec::Untagged { variants } => variants.iter().collect(),
            UnionSpec::Discriminated { mapping, .. } => mapping.iter().map(|(_, r)| r).collect(),
        }
    }
}

/// Constraint over an already-coerced value.
///
/// Numeric bounds apply to int and float fields, length bounds to
/// strings, arrays, and maps, and patterns to strings only. The
/// pairing is checked once at schema build time, never per call.
#[derive(Clone)]
pub enum Constraint {
    /// Value must be strictly greater than the bound
    Gt(f64),
    /// Value must be greater than or equal to the bound
    Ge(f64),
    /// Value must be strictly less than the bound
    Lt(f64),
    /// Value must be less than or equal to the bound
    Le(f64),
    /// Minimum length (characters for strings, entries otherwise)
    MinLength(usize),
    /// Maximum length (characters for strings, entries otherwise)
    MaxLength(usize),
    /// String must match the pattern
    Pattern(Regex),
}

impl Constraint {
    /// Compiles a pattern constraint. An invalid pattern is a schema
    /// configuration fault, reported immediately.
    pub fn pattern(source: &str) -> SchemaBuildResult<Self> {
        let re = Regex::new(source).map_err(|e| SchemaBuildError::InvalidPattern {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Constraint::Pattern(re))
    }

    /// Human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Constraint::Gt(b) => format!("value > {}", b),
            Constraint::Ge(b) => format!("value >= {}", b),
            Constraint::Lt(b) => format!("value < {}", b),
            Constraint::Le(b) => format!("value <= {}", b),
            Constraint::MinLength(n) => format!("length >= {}", n),
            Constraint::MaxLength(n) => format!("length <= {}", n),
            Constraint::Pattern(re) => format!("match for pattern '{}'", re.as_str()),
        }
    }

    /// Whether this constraint may attach to a field of the given
    /// type. Checked at schema build time.
    pub fn applies_to(&self, field_type: &FieldType) -> bool {
        match self {
            Constraint::Gt(_) | Constraint::Ge(_) | Constraint::Lt(_) | Constraint::Le(_) => {
                matches!(field_type, FieldType::Int | FieldType::Float)
            }
            Constraint::MinLength(_) | Constraint::MaxLength(_) => matches!(
                field_type,
                FieldType::String | FieldType::Array { .. } | FieldType::Map { .. }
            ),
            Constraint::Pattern(_) => matches!(field_type, FieldType::String),
        }
    }

    /// Checks the constraint against a validated value. Returns the
    /// violation message on failure.
    pub fn check(&self, data: &FieldData) -> Result<(), String> {
        match self {
            Constraint::Gt(b) => check_numeric(data, self, |v| v > *b),
            Constraint::Ge(b) => check_numeric(data, self, |v| v >= *b),
            Constraint::Lt(b) => check_numeric(data, self, |v| v < *b),
            Constraint::Le(b) => check_numeric(data, self, |v| v <= *b),
            Constraint::MinLength(n) => check_length(data, self, |len| len >= *n),
            Constraint::MaxLength(n) => check_length(data, self, |len| len <= *n),
            Constraint::Pattern(re) => match data.as_str() {
                Some(s) if re.is_match(s) => Ok(()),
                Some(s) => Err(format!("expected {}, got '{}'", self.describe(), s)),
                None => Err(format!("expected {}, got non-string value", self.describe())),
            },
        }
    }
}

fn check_numeric(
    data: &FieldData,
    constraint: &Constraint,
    ok: impl Fn(f64) -> bool,
) -> Result<(), String> {
    match data.as_f64() {
        Some(v) if ok(v) => Ok(()),
        Some(v) => Err(format!("expected {}, got {}", constraint.describe(), v)),
        None => Err(format!(
            "expected {}, got non-numeric value",
            constraint.describe()
        )),
    }
}

fn check_length(
    data: &FieldData,
    constraint: &Constraint,
    ok: impl Fn(usize) -> bool,
) -> Result<(), String> {
    match data.length() {
        Some(len) if ok(len) => Ok(()),
        Some(len) => Err(format!(
            "expected {}, got length {}",
            constraint.describe(),
            len
        )),
        None => Err(format!(
            "expected {}, got unsized value",
            constraint.describe()
        )),
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Default policy for a field. A field with no default and no factory
/// is required.
#[derive(Clone)]
pub enum DefaultPolicy {
    Required,
    Value(Value),
    Factory(Arc<DefaultFactoryFn>),
}

impl fmt::Debug for DefaultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultPolicy::Required => f.write_str("required"),
            DefaultPolicy::Value(v) => write!(f, "default {}", v),
            DefaultPolicy::Factory(_) => f.write_str("default factory"),
        }
    }
}

/// Named field validator attached to a single field.
#[derive(Clone)]
pub struct FieldValidator {
    pub(crate) name: String,
    pub(crate) func: Arc<FieldValidatorFn>,
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validator '{}'", self.name)
    }
}

/// Named before-model hook.
#[derive(Clone)]
pub struct BeforeHook {
    pub(crate) name: String,
    pub(crate) func: Arc<BeforeHookFn>,
}

/// Named after-model hook.
#[derive(Clone)]
pub struct AfterHook {
    pub(crate) name: String,
    pub(crate) func: Arc<AfterHookFn>,
}

/// Computed field: derived, read-only, evaluated from other fields at
/// serialization time and appended after declared fields.
#[derive(Clone)]
pub struct ComputedField {
    pub(crate) name: String,
    pub(crate) output_alias: Option<String>,
    pub(crate) func: Arc<ComputedFn>,
}

impl ComputedField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output_alias(&self) -> Option<&str> {
        self.output_alias.as_deref()
    }

    pub fn evaluate(&self, instance: &Instance) -> Value {
        (self.func)(instance)
    }
}

impl fmt::Debug for ComputedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "computed '{}'", self.name)
    }
}

/// Policy for input keys not declared by the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraPolicy {
    /// Unknown keys are recorded as errors
    Forbid,
    /// Unknown keys are dropped
    #[default]
    Ignore,
    /// Unknown keys are carried into a side map on the instance
    Allow,
}

/// Specification of a single field
#[derive(Clone)]
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) field_type: FieldType,
    pub(crate) default: DefaultPolicy,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) validators: Vec<FieldValidator>,
    pub(crate) input_alias: Option<String>,
    pub(crate) output_alias: Option<String>,
    pub(crate) exclude: bool,
    pub(crate) strict: Option<bool>,
}

impl FieldSpec {
    /// A required field of the given type.
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: DefaultPolicy::Required,
            constraints: Vec::new(),
            validators: Vec::new(),
            input_alias: None,
            output_alias: None,
            exclude: false,
            strict: None,
        }
    }

    /// A field with a fixed default value.
    pub fn with_default(name: impl Into<String>, field_type: FieldType, default: Value) -> Self {
        let mut spec = Self::required(name, field_type);
        spec.default = DefaultPolicy::Value(default);
        spec
    }

    /// A field whose default is produced fresh per instance. Use this
    /// for sequence/mapping defaults so instances never share state.
    pub fn with_factory(
        name: impl Into<String>,
        field_type: FieldType,
        factory: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        let mut spec = Self::required(name, field_type);
        spec.default = DefaultPolicy::Factory(Arc::new(factory));
        spec
    }

    /// Attaches a constraint, checked in attachment order.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Attaches a named field validator, run in attachment order.
    pub fn validator(
        mut self,
        name: impl Into<String>,
        func: impl Fn(&FieldData, Siblings<'_>) -> Result<FieldData, String> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(FieldValidator {
            name: name.into(),
            func: Arc::new(func),
        });
        self
    }

    /// Sets the input alias the raw value is resolved by. The field
    /// name remains a fallback when the alias key is absent.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.input_alias = Some(alias.into());
        self
    }

    /// Sets the key emitted when serializing with aliases enabled.
    pub fn output_alias(mut self, alias: impl Into<String>) -> Self {
        self.output_alias = Some(alias.into());
        self
    }

    /// Marks the field as always omitted from serialization, even
    /// when explicitly included via options.
    pub fn exclude(mut self) -> Self {
        self.exclude = true;
        self
    }

    /// Overrides the schema-level strictness for this field alone.
    pub fn strict(mut self) -> Self {
        self.strict = Some(true);
        self
    }

    /// Opts this field out of a schema-level strict mode.
    pub fn lax(mut self) -> Self {
        self.strict = Some(false);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_required(&self) -> bool {
        matches!(self.default, DefaultPolicy::Required)
    }

    pub fn is_excluded(&self) -> bool {
        self.exclude
    }

    pub fn input_key(&self) -> &str {
        self.input_alias.as_deref().unwrap_or(&self.name)
    }

    pub fn output_key(&self) -> &str {
        self.output_alias.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?} ({:?})", self.name, self.field_type, self.default)
    }
}

/// Immutable schema definition.
///
/// Constructed once via [`Schema::builder`], then read-only; an
/// `Arc<Schema>` may be shared across any number of concurrent
/// validation calls without synchronization.
#[derive(Clone)]
pub struct Schema {
    pub(crate) name: String,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) computed: Vec<ComputedField>,
    pub(crate) before: Vec<BeforeHook>,
    pub(crate) after: Vec<AfterHook>,
    pub(crate) extra: ExtraPolicy,
    pub(crate) strict: bool,
    pub(crate) trim_strings: bool,
    pub(crate) mutable: bool,
}

impl Schema {
    /// Starts building a schema with the given registry name.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            schema: Schema {
                name: name.into(),
                fields: Vec::new(),
                computed: Vec::new(),
                before: Vec::new(),
                after: Vec::new(),
                extra: ExtraPolicy::default(),
                strict: false,
                trim_strings: false,
                mutable: false,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Computed fields in declaration order.
    pub fn computed(&self) -> &[ComputedField] {
        &self.computed
    }

    pub fn extra_policy(&self) -> ExtraPolicy {
        self.extra
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn trims_strings(&self) -> bool {
        self.trim_strings
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Effective strictness for a field: the per-field override if
    /// present, otherwise the schema flag.
    pub(crate) fn field_strict(&self, spec: &FieldSpec) -> bool {
        spec.strict.unwrap_or(self.strict)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("computed", &self.computed)
            .field("extra", &self.extra)
            .field("strict", &self.strict)
            .finish()
    }
}

/// Builder enforcing the schema-level invariants at construction time.
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Appends a field. Declaration order is significant: it fixes
    /// both validation order and default serialization order.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.schema.fields.push(spec);
        self
    }

    /// Appends a computed field, emitted after declared fields.
    pub fn computed(
        mut self,
        name: impl Into<String>,
        func: impl Fn(&Instance) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.schema.computed.push(ComputedField {
            name: name.into(),
            output_alias: None,
            func: Arc::new(func),
        });
        self
    }

    /// Appends a computed field with an output alias.
    pub fn computed_aliased(
        mut self,
        name: impl Into<String>,
        alias: impl Into<String>,
        func: impl Fn(&Instance) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.schema.computed.push(ComputedField {
            name: name.into(),
            output_alias: Some(alias.into()),
            func: Arc::new(func),
        });
        self
    }

    /// Attaches a before-model hook, run in attachment order on the
    /// raw input before any field is touched.
    pub fn before_validator(
        mut self,
        name: impl Into<String>,
        func: impl Fn(&mut Map<String, Value>) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.schema.before.push(BeforeHook {
            name: name.into(),
            func: Arc::new(func),
        });
        self
    }

    /// Attaches an after-model hook, run in attachment order on the
    /// fully-built instance.
    pub fn after_validator(
        mut self,
        name: impl Into<String>,
        func: impl Fn(&mut Instance) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.schema.after.push(AfterHook {
            name: name.into(),
            func: Arc::new(func),
        });
        self
    }

    /// Sets the policy for undeclared input keys.
    pub fn extra(mut self, policy: ExtraPolicy) -> Self {
        self.schema.extra = policy;
        self
    }

    /// Disables all coercion: only exact-type matches validate.
    pub fn strict(mut self) -> Self {
        self.schema.strict = true;
        self
    }

    /// Trims surrounding whitespace before string-to-number parsing.
    pub fn trim_strings(mut self) -> Self {
        self.schema.trim_strings = true;
        self
    }

    /// Allows callers to mutate validated instances after the fact.
    pub fn mutable(mut self) -> Self {
        self.schema.mutable = true;
        self
    }

    /// Finalizes the schema, checking the build-time invariants.
    pub fn build(self) -> SchemaBuildResult<Schema> {
        let schema = self.schema;

        for (i, spec) in schema.fields.iter().enumerate() {
            if schema.fields[..i].iter().any(|f| f.name == spec.name) {
                return Err(SchemaBuildError::DuplicateField {
                    schema: schema.name.clone(),
                    field: spec.name.clone(),
                });
            }
            for constraint in &spec.constraints {
                if !constraint.applies_to(&spec.field_type) {
                    return Err(SchemaBuildError::IncompatibleConstraint {
                        schema: schema.name.clone(),
                        field: spec.name.clone(),
                        constraint: constraint.describe(),
                        type_name: spec.field_type.type_name(),
                    });
                }
            }
            if let FieldType::Union(union) = &spec.field_type {
                if union.variant_refs().is_empty() {
                    return Err(SchemaBuildError::EmptyUnion {
                        schema: schema.name.clone(),
                    });
                }
            }
        }

        for (i, computed) in schema.computed.iter().enumerate() {
            let collides = schema.fields.iter().any(|f| f.name == computed.name)
                || schema.computed[..i].iter().any(|c| c.name == computed.name);
            if collides {
                return Err(SchemaBuildError::DuplicateComputedField {
                    schema: schema.name.clone(),
                    field: computed.name.clone(),
                });
            }
        }

        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value_data(v: Value) -> FieldData {
        FieldData::Value(v)
    }

    #[test]
    fn test_builder_happy_path() {
        let schema = Schema::builder("patient")
            .field(FieldSpec::required("name", FieldType::String))
            .field(
                FieldSpec::required("age", FieldType::Int)
                    .constraint(Constraint::Gt(0.0))
                    .constraint(Constraint::Lt(120.0)),
            )
            .field(FieldSpec::with_default("married", FieldType::Bool, json!(false)))
            .build()
            .unwrap();

        assert_eq!(schema.name(), "patient");
        assert_eq!(schema.fields().len(), 3);
        assert!(schema.field("age").unwrap().is_required());
        assert!(!schema.field("married").unwrap().is_required());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = Schema::builder("patient")
            .field(FieldSpec::required("name", FieldType::String))
            .field(FieldSpec::required("name", FieldType::Int))
            .build();

        assert!(matches!(
            result,
            Err(SchemaBuildError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_numeric_constraint_on_string_rejected() {
        let result = Schema::builder("patient")
            .field(FieldSpec::required("name", FieldType::String).constraint(Constraint::Gt(0.0)))
            .build();

        assert!(matches!(
            result,
            Err(SchemaBuildError::IncompatibleConstraint { .. })
        ));
    }

    #[test]
    fn test_pattern_on_int_rejected() {
        let pattern = Constraint::pattern("^[0-9]+$").unwrap();
        let result = Schema::builder("patient")
            .field(FieldSpec::required("age", FieldType::Int).constraint(pattern))
            .build();

        assert!(matches!(
            result,
            Err(SchemaBuildError::IncompatibleConstraint { .. })
        ));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = Constraint::pattern("([unclosed");
        assert!(matches!(result, Err(SchemaBuildError::InvalidPattern { .. })));
    }

    #[test]
    fn test_computed_field_collision_rejected() {
        let result = Schema::builder("patient")
            .field(FieldSpec::required("bmi", FieldType::Float))
            .computed("bmi", |_| json!(0.0))
            .build();

        assert!(matches!(
            result,
            Err(SchemaBuildError::DuplicateComputedField { .. })
        ));
    }

    #[test]
    fn test_constraint_checks() {
        assert!(Constraint::Gt(0.0).check(&value_data(json!(5))).is_ok());
        assert!(Constraint::Gt(0.0).check(&value_data(json!(0))).is_err());
        assert!(Constraint::Le(10.0).check(&value_data(json!(10.0))).is_ok());

        assert!(Constraint::MinLength(3).check(&value_data(json!("abc"))).is_ok());
        assert!(Constraint::MinLength(3).check(&value_data(json!("ab"))).is_err());
        assert!(Constraint::MaxLength(2)
            .check(&FieldData::Array(vec![
                value_data(json!(1)),
                value_data(json!(2)),
                value_data(json!(3)),
            ]))
            .is_err());

        let pattern = Constraint::pattern("^[a-z]+$").unwrap();
        assert!(pattern.check(&value_data(json!("abc"))).is_ok());
        assert!(pattern.check(&value_data(json!("ABC"))).is_err());
    }

    #[test]
    fn test_constraint_violation_message_names_value() {
        let err = Constraint::Gt(0.0).check(&value_data(json!(-5))).unwrap_err();
        assert!(err.contains("value > 0"));
        assert!(err.contains("-5"));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(FieldType::String.type_name(), "string");
        assert_eq!(FieldType::Int.type_name(), "int");
        assert_eq!(FieldType::array_of(FieldType::Int).type_name(), "array");
        assert_eq!(FieldType::map_of(FieldType::String).type_name(), "map");
        assert_eq!(FieldType::named("node").type_name(), "object");
    }

    #[test]
    fn test_input_and_output_keys() {
        let spec = FieldSpec::required("postal_code", FieldType::String)
            .alias("postalCode")
            .output_alias("zip");
        assert_eq!(spec.input_key(), "postalCode");
        assert_eq!(spec.output_key(), "zip");

        let plain = FieldSpec::required("city", FieldType::String);
        assert_eq!(plain.input_key(), "city");
        assert_eq!(plain.output_key(), "city");
    }
}
