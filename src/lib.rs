//! veridoc - schema-driven validation, coercion, and serialization
//!
//! veridoc validates loosely-typed input trees (JSON and friends)
//! against declarative schemas, coercing values toward declared types
//! under explicit rules, collecting every field-level failure with an
//! exact location path, and serializing validated instances back out
//! under per-call options.
//!
//! # Architecture
//!
//! - [`schema`]: schema definitions, builders, and the registry that
//!   binds named references for self-referential schemas
//! - [`validate`]: the staged validation pipeline, coercion engine,
//!   union resolution, error trees, and validated instances
//! - [`serialize`]: instance-to-tree conversion with field filters,
//!   aliases, and computed fields
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use veridoc::schema::{Constraint, FieldSpec, FieldType, Schema, SchemaRegistry};
//! use veridoc::validate::Validator;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let patient = Schema::builder("patient")
//!     .field(FieldSpec::required("name", FieldType::String))
//!     .field(
//!         FieldSpec::required("age", FieldType::Int)
//!             .constraint(Constraint::Gt(0.0))
//!             .constraint(Constraint::Lt(120.0)),
//!     )
//!     .build()?;
//!
//! let mut registry = SchemaRegistry::new();
//! let patient = registry.register(patient)?;
//!
//! let validator = Validator::new(&registry);
//! let instance = validator
//!     .validate(&patient, &json!({"name": "Ada", "age": "36"}))
//!     .map_err(|tree| tree.to_string())?;
//!
//! assert_eq!(instance.dump(), json!({"name": "Ada", "age": 36}));
//! # Ok(())
//! # }
//! ```

pub mod schema;
pub mod serialize;
pub mod validate;

pub use schema::{
    Constraint, ExtraPolicy, FieldSpec, FieldType, Schema, SchemaBuildError, SchemaRef,
    SchemaRegistry, UnionSpec,
};
pub use serialize::{serialize, SerializeOptions};
pub use validate::{ErrorKind, ErrorNode, ErrorTree, FieldData, Instance, PathSegment, Validator};
