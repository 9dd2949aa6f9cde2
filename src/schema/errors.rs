//! Schema construction and registration errors
//!
//! These are configuration faults raised while a schema is being built
//! or registered. They are deliberately distinct from the data-level
//! `ErrorTree` produced by validation: a misconfigured schema is a
//! programming error, not a property of any particular input.

use thiserror::Error;

/// Result type for schema construction and registration
pub type SchemaBuildResult<T> = Result<T, SchemaBuildError>;

/// Errors detected at schema build or registration time
#[derive(Debug, Error)]
pub enum SchemaBuildError {
    #[error("duplicate field '{field}' in schema '{schema}'")]
    DuplicateField { schema: String, field: String },

    #[error("computed field '{field}' collides with another field in schema '{schema}'")]
    DuplicateComputedField { schema: String, field: String },

    #[error("constraint '{constraint}' does not apply to {type_name} field '{field}' in schema '{schema}'")]
    IncompatibleConstraint {
        schema: String,
        field: String,
        constraint: String,
        type_name: &'static str,
    },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("schema '{0}' is already registered")]
    DuplicateSchema(String),

    #[error("schema '{schema}' references unknown schema '{referenced}'")]
    UnresolvedReference { schema: String, referenced: String },

    #[error("union in schema '{schema}' declares no variants")]
    EmptyUnion { schema: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_schema() {
        let err = SchemaBuildError::DuplicateField {
            schema: "patient".into(),
            field: "age".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("patient"));
        assert!(msg.contains("age"));
    }

    #[test]
    fn test_unresolved_reference_message() {
        let err = SchemaBuildError::UnresolvedReference {
            schema: "person".into(),
            referenced: "address".into(),
        };
        assert!(err.to_string().contains("unknown schema 'address'"));
    }
}
