//! Union resolution
//!
//! Two resolution strategies for polymorphic fields. Untagged unions
//! trial-validate every variant in declared order and take the first
//! success; when nothing matches, the first variant's errors are
//! reported, which keeps total failure deterministic and readable.
//! Discriminated unions skip trial validation entirely: the
//! discriminator field's raw value selects exactly one variant, and
//! an unmapped value is a single unknown-variant error.

use serde_json::Value;
use tracing::trace;

use super::coerce::json_type_name;
use super::errors::{ErrorKind, ErrorNode, ErrorTree, PathSegment};
use super::instance::FieldData;
use super::pipeline::Validator;
use crate::schema::{SchemaRef, UnionSpec};

/// Resolves a union-typed value. Returned error paths are relative to
/// the value's own root.
pub(crate) fn resolve_union(
    validator: &Validator<'_>,
    union: &UnionSpec,
    raw: &Value,
    depth: usize,
) -> Result<FieldData, ErrorTree> {
    match union {
        UnionSpec::Untagged { variants } => resolve_untagged(validator, variants, raw, depth),
        UnionSpec::Discriminated { field, mapping } => {
            resolve_discriminated(validator, field, mapping, raw, depth)
        }
    }
}

fn resolve_untagged(
    validator: &Validator<'_>,
    variants: &[SchemaRef],
    raw: &Value,
    depth: usize,
) -> Result<FieldData, ErrorTree> {
    let mut first_failure: Option<ErrorTree> = None;

    for variant in variants {
        let schema = validator.resolve_ref(variant);
        match validator.validate_schema(&schema, raw, depth + 1) {
            Ok(instance) => {
                trace!(variant = %schema.name(), "untagged union matched");
                return Ok(FieldData::Instance(instance));
            }
            Err(tree) => {
                if first_failure.is_none() {
                    first_failure = Some(tree);
                }
            }
        }
    }

    // Build-time checks reject empty unions, so at least one variant
    // was attempted.
    Err(first_failure.unwrap_or_else(|| {
        ErrorTree::single(ErrorNode::root(
            ErrorKind::TypeMismatch,
            "no union variant to match against",
        ))
    }))
}

fn resolve_discriminated(
    validator: &Validator<'_>,
    field: &str,
    mapping: &[(String, SchemaRef)],
    raw: &Value,
    depth: usize,
) -> Result<FieldData, ErrorTree> {
    let obj = raw.as_object().ok_or_else(|| {
        ErrorTree::single(ErrorNode::type_mismatch("object", json_type_name(raw)))
    })?;

    let allowed = || {
        mapping
            .iter()
            .map(|(tag, _)| format!("'{}'", tag))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let tag = match obj.get(field) {
        Some(Value::String(tag)) => tag,
        Some(other) => {
            return Err(ErrorTree::single(ErrorNode::new(
                vec![PathSegment::key(field)],
                ErrorKind::UnknownVariant,
                format!(
                    "discriminator must be a string, got {}; expected one of {}",
                    json_type_name(other),
                    allowed()
                ),
            )));
        }
        None => {
            return Err(ErrorTree::single(ErrorNode::new(
                vec![PathSegment::key(field)],
                ErrorKind::UnknownVariant,
                format!("missing discriminator; expected one of {}", allowed()),
            )));
        }
    };

    let variant = mapping
        .iter()
        .find(|(candidate, _)| candidate == tag)
        .map(|(_, schema_ref)| schema_ref);

    let Some(schema_ref) = variant else {
        return Err(ErrorTree::single(ErrorNode::new(
            vec![PathSegment::key(field)],
            ErrorKind::UnknownVariant,
            format!("unknown variant '{}'; expected one of {}", tag, allowed()),
        )));
    };

    let schema = validator.resolve_ref(schema_ref);
    trace!(variant = %schema.name(), discriminator = %tag, "discriminated union matched");
    validator
        .validate_schema(&schema, raw, depth + 1)
        .map(FieldData::Instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Constraint, FieldSpec, FieldType, Schema, SchemaRegistry};
    use serde_json::json;
    use std::sync::Arc;

    fn cat() -> Schema {
        Schema::builder("cat")
            .field(FieldSpec::required("pet_type", FieldType::String))
            .field(FieldSpec::required("meows", FieldType::Int))
            .build()
            .unwrap()
    }

    fn dog() -> Schema {
        Schema::builder("dog")
            .field(FieldSpec::required("pet_type", FieldType::String))
            .field(FieldSpec::required("barks", FieldType::Float))
            .build()
            .unwrap()
    }

    fn union_schema(union: UnionSpec) -> (SchemaRegistry, Arc<Schema>) {
        let owner = Schema::builder("owner")
            .field(FieldSpec::required("pet", FieldType::Union(union)))
            .build()
            .unwrap();
        let mut registry = SchemaRegistry::new();
        let owner = registry.register(owner).unwrap();
        (registry, owner)
    }

    fn untagged() -> UnionSpec {
        UnionSpec::untagged(vec![
            SchemaRef::Inline(Arc::new(cat())),
            SchemaRef::Inline(Arc::new(dog())),
        ])
    }

    fn discriminated() -> UnionSpec {
        UnionSpec::discriminated(
            "pet_type",
            vec![
                ("cat", SchemaRef::Inline(Arc::new(cat()))),
                ("dog", SchemaRef::Inline(Arc::new(dog()))),
            ],
        )
    }

    #[test]
    fn test_untagged_first_match_wins() {
        let (registry, owner) = union_schema(untagged());
        let validator = Validator::new(&registry);

        let inst = validator
            .validate(&owner, &json!({"pet": {"pet_type": "cat", "meows": 3}}))
            .unwrap();
        let pet = inst.get("pet").unwrap().as_instance().unwrap();
        assert_eq!(pet.schema_name(), "cat");

        let inst = validator
            .validate(&owner, &json!({"pet": {"pet_type": "dog", "barks": 2.5}}))
            .unwrap();
        let pet = inst.get("pet").unwrap().as_instance().unwrap();
        assert_eq!(pet.schema_name(), "dog");
    }

    #[test]
    fn test_untagged_declaration_order_breaks_ties() {
        // Both variants accept this input; the first declared wins.
        let loose_a = Arc::new(
            Schema::builder("loose_a")
                .field(FieldSpec::required("x", FieldType::Int))
                .build()
                .unwrap(),
        );
        let loose_b = Arc::new(
            Schema::builder("loose_b")
                .field(FieldSpec::required("x", FieldType::Int))
                .build()
                .unwrap(),
        );
        let (registry, owner) = union_schema(UnionSpec::untagged(vec![
            SchemaRef::Inline(loose_a),
            SchemaRef::Inline(loose_b),
        ]));
        let validator = Validator::new(&registry);

        let inst = validator
            .validate(&owner, &json!({"pet": {"x": 1}}))
            .unwrap();
        assert_eq!(
            inst.get("pet").unwrap().as_instance().unwrap().schema_name(),
            "loose_a"
        );
    }

    #[test]
    fn test_untagged_total_failure_reports_first_variant() {
        let (registry, owner) = union_schema(untagged());
        let validator = Validator::new(&registry);

        let tree = validator
            .validate(&owner, &json!({"pet": {"pet_type": "fish", "fins": 4}}))
            .unwrap_err();
        // cat is the first variant: its missing 'meows' is reported,
        // dog's missing 'barks' is not.
        let locations: Vec<String> = tree.iter().map(|e| e.location_string()).collect();
        assert!(locations.contains(&"pet.meows".to_string()));
        assert!(!locations.contains(&"pet.barks".to_string()));
    }

    #[test]
    fn test_discriminated_selects_exactly_one_variant() {
        let (registry, owner) = union_schema(discriminated());
        let validator = Validator::new(&registry);

        let inst = validator
            .validate(&owner, &json!({"pet": {"pet_type": "dog", "barks": 1.5}}))
            .unwrap();
        assert_eq!(
            inst.get("pet").unwrap().as_instance().unwrap().schema_name(),
            "dog"
        );
    }

    #[test]
    fn test_discriminated_variant_errors_not_masked() {
        let (registry, owner) = union_schema(discriminated());
        let validator = Validator::new(&registry);

        // Correct discriminator, bad payload: the selected variant's
        // own errors surface, not an unknown-variant error.
        let tree = validator
            .validate(&owner, &json!({"pet": {"pet_type": "cat", "meows": "lots"}}))
            .unwrap_err();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.errors()[0].location_string(), "pet.meows");
        assert_eq!(tree.errors()[0].kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_discriminated_unknown_tag() {
        let (registry, owner) = union_schema(discriminated());
        let validator = Validator::new(&registry);

        let tree = validator
            .validate(&owner, &json!({"pet": {"pet_type": "fish", "fins": 4}}))
            .unwrap_err();
        assert_eq!(tree.len(), 1);
        let node = &tree.errors()[0];
        assert_eq!(node.kind, ErrorKind::UnknownVariant);
        assert_eq!(node.location_string(), "pet.pet_type");
        assert!(node.message.contains("'fish'"));
        assert!(node.message.contains("'cat', 'dog'"));
    }

    #[test]
    fn test_discriminated_missing_tag() {
        let (registry, owner) = union_schema(discriminated());
        let validator = Validator::new(&registry);

        let tree = validator
            .validate(&owner, &json!({"pet": {"meows": 3}}))
            .unwrap_err();
        assert_eq!(tree.len(), 1);
        let node = &tree.errors()[0];
        assert_eq!(node.kind, ErrorKind::UnknownVariant);
        assert!(node.message.contains("missing discriminator"));
    }

    #[test]
    fn test_discriminated_non_string_tag() {
        let (registry, owner) = union_schema(discriminated());
        let validator = Validator::new(&registry);

        let tree = validator
            .validate(&owner, &json!({"pet": {"pet_type": 1, "meows": 3}}))
            .unwrap_err();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.errors()[0].kind, ErrorKind::UnknownVariant);
        assert!(tree.errors()[0].message.contains("must be a string"));
    }

    #[test]
    fn test_discriminated_non_object_value() {
        let (registry, owner) = union_schema(discriminated());
        let validator = Validator::new(&registry);

        let tree = validator
            .validate(&owner, &json!({"pet": "a cat"}))
            .unwrap_err();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.errors()[0].kind, ErrorKind::TypeMismatch);
        assert_eq!(tree.errors()[0].location_string(), "pet");
    }

    #[test]
    fn test_union_over_named_variants() {
        let mut registry = SchemaRegistry::new();
        registry.register_all(vec![cat(), dog()]).unwrap();
        let owner = registry
            .register(
                Schema::builder("owner")
                    .field(FieldSpec::required(
                        "pet",
                        FieldType::Union(UnionSpec::discriminated(
                            "pet_type",
                            vec![
                                ("cat", SchemaRef::Named("cat".into())),
                                ("dog", SchemaRef::Named("dog".into())),
                            ],
                        )),
                    ))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let validator = Validator::new(&registry);

        let inst = validator
            .validate(&owner, &json!({"pet": {"pet_type": "cat", "meows": 2}}))
            .unwrap();
        assert_eq!(
            inst.get("pet").unwrap().as_instance().unwrap().schema_name(),
            "cat"
        );
    }

    #[test]
    fn test_union_constraints_apply_inside_variant() {
        let bounded = Arc::new(
            Schema::builder("bounded")
                .field(
                    FieldSpec::required("n", FieldType::Int).constraint(Constraint::Gt(0.0)),
                )
                .build()
                .unwrap(),
        );
        let (registry, owner) =
            union_schema(UnionSpec::untagged(vec![SchemaRef::Inline(bounded)]));
        let validator = Validator::new(&registry);

        let tree = validator
            .validate(&owner, &json!({"pet": {"n": -1}}))
            .unwrap_err();
        assert_eq!(tree.errors()[0].kind, ErrorKind::ConstraintViolation);
        assert_eq!(tree.errors()[0].location_string(), "pet.n");
    }
}
