//! Validation subsystem
//!
//! Turns raw input trees into schema-conformant instances. The
//! pipeline runs a fixed stage order per field (presence, coercion,
//! constraints, custom validators) bracketed by model-level hooks,
//! and collects failures across the whole input rather than stopping
//! at the first one. The outcome is strictly two-valued: a
//! fully-populated [`Instance`] or an [`ErrorTree`], never a partial
//! instance with errors attached.
//!
//! # Design Principles
//!
//! - Field failures are independent: one bad field never hides
//!   another
//! - Error locations are exact paths from the input root
//! - Coercion is deterministic and centralized in [`coerce_scalar`]
//! - Recursion through nested and union schemas is depth-bounded

mod coerce;
mod errors;
pub(crate) mod instance;
mod pipeline;
mod union;

pub use coerce::{coerce_scalar, json_type_name, CoercionFailure, ScalarType};
pub use errors::{ErrorKind, ErrorNode, ErrorTree, PathSegment};
pub use instance::{FieldData, Instance, InstanceError, Siblings};
pub use pipeline::{Validator, DEFAULT_MAX_DEPTH};
