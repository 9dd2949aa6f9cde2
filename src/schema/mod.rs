//! Schema Definition subsystem
//!
//! Schemas are declarative, immutable descriptions of an entity's
//! validated shape: ordered field specs with declared types,
//! constraints, default policies, aliases, and attached validators.
//!
//! # Design Principles
//!
//! - Schemas are built once, validated at construction time, and
//!   read-only thereafter
//! - Field declaration order is significant (it fixes serialization
//!   order)
//! - Constraint/type compatibility is a registration-time check,
//!   never a validation-time one
//! - Self-references bind lazily through the registry

mod errors;
mod registry;
mod types;

pub use errors::{SchemaBuildError, SchemaBuildResult};
pub use registry::SchemaRegistry;
pub use types::{
    AfterHook, BeforeHook, ComputedField, Constraint, DefaultPolicy, ExtraPolicy, FieldSpec,
    FieldType, FieldValidator, Schema, SchemaBuilder, SchemaRef, UnionSpec,
};
