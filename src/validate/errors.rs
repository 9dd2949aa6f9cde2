//! Validation error model
//!
//! Every failure produced during validation is an `ErrorNode`: a
//! location path from the root, an error kind, and a message. An
//! `ErrorTree` is an ordered collection of nodes — field declaration
//! order first, nested traversal order within. The tree serializes to
//! the external shape consumed by API layers:
//! `[{"location": ["address", "postal_code"], "kind": "type_mismatch",
//! "message": "..."}]`.

use std::fmt;

use serde::Serialize;

/// One step of a location path: an object key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    pub fn key(name: impl Into<String>) -> Self {
        PathSegment::Key(name.into())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Kinds of validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required field absent after alias and default resolution
    Missing,
    /// Coercion to the declared type impossible
    TypeMismatch,
    /// Coerced value fails a bound or pattern
    ConstraintViolation,
    /// Custom field rule rejected the value
    FieldValidatorFailure,
    /// Cross-field rule rejected the instance (location is root)
    ModelValidatorFailure,
    /// Discriminator value not in the allowed set
    UnknownVariant,
    /// Input could not be parsed into a tree shape
    MalformedInput,
    /// Undeclared input key under the forbid extra-field policy
    UnknownField,
    /// Recursion depth limit reached while descending nested schemas
    DepthLimitExceeded,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Missing => "missing",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::ConstraintViolation => "constraint_violation",
            ErrorKind::FieldValidatorFailure => "field_validator_failure",
            ErrorKind::ModelValidatorFailure => "model_validator_failure",
            ErrorKind::UnknownVariant => "unknown_variant",
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::UnknownField => "unknown_field",
            ErrorKind::DepthLimitExceeded => "depth_limit_exceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single located validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorNode {
    pub location: Vec<PathSegment>,
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorNode {
    pub fn new(location: Vec<PathSegment>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            location,
            kind,
            message: message.into(),
        }
    }

    /// A node located at the root (model-level errors, malformed
    /// input, or nodes about to be prefixed by a caller).
    pub fn root(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(Vec::new(), kind, message)
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::new(
            vec![PathSegment::key(field)],
            ErrorKind::Missing,
            "required field is missing",
        )
    }

    pub(crate) fn type_mismatch(expected: &str, observed: &str) -> Self {
        Self::root(
            ErrorKind::TypeMismatch,
            format!("expected {}, got {}", expected, observed),
        )
    }

    /// Renders the location as a dotted path, `$root` when empty.
    pub fn location_string(&self) -> String {
        if self.location.is_empty() {
            return "$root".to_string();
        }
        let mut out = String::new();
        for (i, segment) in self.location.iter().enumerate() {
            match segment {
                PathSegment::Key(k) => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(k);
                }
                PathSegment::Index(idx) => {
                    out.push('[');
                    out.push_str(&idx.to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}

impl fmt::Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.kind,
            self.location_string(),
            self.message
        )
    }
}

/// Ordered collection of validation failures for one input.
///
/// Ordering follows field declaration order, then nested traversal
/// order. The tree is only ever returned whole: validation either
/// yields a fully-populated instance or this, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorTree {
    errors: Vec<ErrorNode>,
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree holding exactly one node.
    pub fn single(node: ErrorNode) -> Self {
        Self { errors: vec![node] }
    }

    pub fn push(&mut self, node: ErrorNode) {
        self.errors.push(node);
    }

    /// Appends every node of `other`, preserving order.
    pub fn merge(&mut self, other: ErrorTree) {
        self.errors.extend(other.errors);
    }

    /// Appends `other` with `prefix` prepended to every location, so
    /// nested failures surface with correct paths in the outer tree.
    pub fn merge_under(&mut self, prefix: &[PathSegment], other: ErrorTree) {
        for mut node in other.errors {
            let mut location = prefix.to_vec();
            location.append(&mut node.location);
            node.location = location;
            self.errors.push(node);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ErrorNode] {
        &self.errors
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorNode> {
        self.errors.iter()
    }

    /// True if any node matches the kind.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// The external primitive-tree shape of the error list.
    pub fn to_value(&self) -> serde_json::Value {
        let nodes = self
            .errors
            .iter()
            .map(|node| {
                let location: Vec<serde_json::Value> = node
                    .location
                    .iter()
                    .map(|seg| match seg {
                        PathSegment::Key(k) => serde_json::Value::from(k.as_str()),
                        PathSegment::Index(i) => serde_json::Value::from(*i),
                    })
                    .collect();
                serde_json::json!({
                    "location": location,
                    "kind": node.kind.as_str(),
                    "message": node.message,
                })
            })
            .collect();
        serde_json::Value::Array(nodes)
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.errors.len())?;
        for node in &self.errors {
            write!(f, "\n  {}", node)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

impl IntoIterator for ErrorTree {
    type Item = ErrorNode;
    type IntoIter = std::vec::IntoIter<ErrorNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
