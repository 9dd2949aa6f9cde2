//! Coercion engine
//!
//! Pure conversion of raw scalar values toward a declared target
//! type. The engine knows nothing about schemas; container, nested,
//! and union traversal is the pipeline's job. Coercion is
//! deterministic: the same (target, value) pair always produces the
//! same result.
//!
//! Lax rules:
//! - exact type match short-circuits
//! - string -> int/float only when the whole string parses
//! - int -> float always; float -> int only with no fractional part
//! - string/int -> bool via a fixed allow-list, nothing else
//!
//! Strict mode disables every conversion and accepts exact matches
//! only. One deliberate carve-out either way: an integer literal is
//! accepted for a float target even in strict mode, since a JSON
//! number carries no int/float distinction the sender could control.

use std::fmt;

use serde_json::{Number, Value};

/// Scalar target types the engine can coerce toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Int,
    Float,
    Bool,
}

impl ScalarType {
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Bool => "bool",
        }
    }
}

/// A failed coercion: the expected type and the observed type of the
/// received value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionFailure {
    pub expected: &'static str,
    pub observed: &'static str,
}

impl CoercionFailure {
    fn new(expected: ScalarType, raw: &Value) -> Self {
        Self {
            expected: expected.type_name(),
            observed: json_type_name(raw),
        }
    }
}

impl fmt::Display for CoercionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, got {}", self.expected, self.observed)
    }
}

/// String tokens accepted as `true` (compared case-insensitively).
const TRUE_TOKENS: &[&str] = &["true", "t", "yes", "y", "on", "1"];
/// String tokens accepted as `false` (compared case-insensitively).
const FALSE_TOKENS: &[&str] = &["false", "f", "no", "n", "off", "0"];

/// Coerces a raw value toward a scalar target type.
///
/// `trim` enables whitespace trimming before string-to-number
/// parsing (the schema's whitespace policy). `strict` disables all
/// conversions except exact matches.
pub fn coerce_scalar(
    target: ScalarType,
    raw: &Value,
    trim: bool,
    strict: bool,
) -> Result<Value, CoercionFailure> {
    // Exact matches first, valid in both modes.
    match (target, raw) {
        (ScalarType::String, Value::String(_)) => return Ok(raw.clone()),
        (ScalarType::Bool, Value::Bool(_)) => return Ok(raw.clone()),
        (ScalarType::Int, Value::Number(n)) if n.is_i64() || n.is_u64() => return Ok(raw.clone()),
        (ScalarType::Float, Value::Number(_)) => return Ok(raw.clone()),
        _ => {}
    }

    if strict {
        return Err(CoercionFailure::new(target, raw));
    }

    match target {
        ScalarType::String => Err(CoercionFailure::new(target, raw)),
        ScalarType::Int => coerce_int(raw, trim),
        ScalarType::Float => coerce_float(raw, trim),
        ScalarType::Bool => coerce_bool(raw),
    }
}

fn coerce_int(raw: &Value, trim: bool) -> Result<Value, CoercionFailure> {
    match raw {
        Value::String(s) => {
            let s = if trim { s.trim() } else { s.as_str() };
            s.parse::<i64>()
                .map(Value::from)
                .map_err(|_| CoercionFailure::new(ScalarType::Int, raw))
        }
        Value::Number(n) => {
            // Exact ints were handled above; only floats remain.
            let f = n.as_f64().ok_or_else(|| CoercionFailure::new(ScalarType::Int, raw))?;
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                Ok(Value::from(f as i64))
            } else {
                Err(CoercionFailure::new(ScalarType::Int, raw))
            }
        }
        _ => Err(CoercionFailure::new(ScalarType::Int, raw)),
    }
}

fn coerce_float(raw: &Value, trim: bool) -> Result<Value, CoercionFailure> {
    match raw {
        Value::String(s) => {
            let s = if trim { s.trim() } else { s.as_str() };
            let f = s
                .parse::<f64>()
                .map_err(|_| CoercionFailure::new(ScalarType::Float, raw))?;
            Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| CoercionFailure::new(ScalarType::Float, raw))
        }
        _ => Err(CoercionFailure::new(ScalarType::Float, raw)),
    }
}

fn coerce_bool(raw: &Value) -> Result<Value, CoercionFailure> {
    match raw {
        Value::String(s) => {
            let token = s.to_ascii_lowercase();
            if TRUE_TOKENS.contains(&token.as_str()) {
                Ok(Value::Bool(true))
            } else if FALSE_TOKENS.contains(&token.as_str()) {
                Ok(Value::Bool(false))
            } else {
                Err(CoercionFailure::new(ScalarType::Bool, raw))
            }
        }
        Value::Number(n) => match n.as_i64() {
            Some(1) => Ok(Value::Bool(true)),
            Some(0) => Ok(Value::Bool(false)),
            _ => Err(CoercionFailure::new(ScalarType::Bool, raw)),
        },
        _ => Err(CoercionFailure::new(ScalarType::Bool, raw)),
    }
}

/// Returns the observed JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lax(target: ScalarType, raw: Value) -> Result<Value, CoercionFailure> {
        coerce_scalar(target, &raw, false, false)
    }

    #[test]
    fn test_exact_match_short_circuits() {
        assert_eq!(lax(ScalarType::String, json!("abc")).unwrap(), json!("abc"));
        assert_eq!(lax(ScalarType::Int, json!(42)).unwrap(), json!(42));
        assert_eq!(lax(ScalarType::Float, json!(1.5)).unwrap(), json!(1.5));
        assert_eq!(lax(ScalarType::Bool, json!(true)).unwrap(), json!(true));
    }

    #[test]
    fn test_string_to_int_full_parse_only() {
        assert_eq!(lax(ScalarType::Int, json!("42")).unwrap(), json!(42));
        assert_eq!(lax(ScalarType::Int, json!("-7")).unwrap(), json!(-7));

        assert!(lax(ScalarType::Int, json!("42.5")).is_err());
        assert!(lax(ScalarType::Int, json!("42abc")).is_err());
        assert!(lax(ScalarType::Int, json!("")).is_err());
    }

    #[test]
    fn test_whitespace_policy_gates_trimming() {
        // Without the policy, surrounding whitespace fails the parse.
        assert!(coerce_scalar(ScalarType::Int, &json!(" 42 "), false, false).is_err());
        // With it, the string is trimmed first.
        assert_eq!(
            coerce_scalar(ScalarType::Int, &json!(" 42 "), true, false).unwrap(),
            json!(42)
        );
    }

    #[test]
    fn test_int_to_float_always_allowed() {
        // An int literal is a valid JSON number for a float target.
        let v = lax(ScalarType::Float, json!(70)).unwrap();
        assert_eq!(v.as_f64(), Some(70.0));
    }

    #[test]
    fn test_float_to_int_only_whole() {
        assert_eq!(lax(ScalarType::Int, json!(3.0)).unwrap(), json!(3));
        assert!(lax(ScalarType::Int, json!(3.5)).is_err());
    }

    #[test]
    fn test_string_to_float() {
        assert_eq!(lax(ScalarType::Float, json!("42.5")).unwrap(), json!(42.5));
        assert_eq!(
            lax(ScalarType::Float, json!("42")).unwrap().as_f64(),
            Some(42.0)
        );
        assert!(lax(ScalarType::Float, json!("nan")).is_err());
        assert!(lax(ScalarType::Float, json!("x1.0")).is_err());
    }

    #[test]
    fn test_bool_allow_list() {
        for token in ["true", "True", "yes", "on", "y", "t", "1"] {
            assert_eq!(lax(ScalarType::Bool, json!(token)).unwrap(), json!(true));
        }
        for token in ["false", "NO", "off", "n", "f", "0"] {
            assert_eq!(lax(ScalarType::Bool, json!(token)).unwrap(), json!(false));
        }
        assert_eq!(lax(ScalarType::Bool, json!(1)).unwrap(), json!(true));
        assert_eq!(lax(ScalarType::Bool, json!(0)).unwrap(), json!(false));

        // No implicit truthiness.
        assert!(lax(ScalarType::Bool, json!("oui")).is_err());
        assert!(lax(ScalarType::Bool, json!(2)).is_err());
        assert!(lax(ScalarType::Bool, json!("")).is_err());
    }

    #[test]
    fn test_no_number_to_string() {
        assert!(lax(ScalarType::String, json!(42)).is_err());
        assert!(lax(ScalarType::String, json!(true)).is_err());
    }

    #[test]
    fn test_strict_mode_exact_only() {
        assert!(coerce_scalar(ScalarType::Int, &json!("42"), false, true).is_err());
        assert!(coerce_scalar(ScalarType::Bool, &json!(1), false, true).is_err());
        assert_eq!(
            coerce_scalar(ScalarType::Int, &json!(42), false, true).unwrap(),
            json!(42)
        );
        // JSON numbers carry no int/float distinction: ints pass a
        // strict float target.
        assert!(coerce_scalar(ScalarType::Float, &json!(42), false, true).is_ok());
    }

    #[test]
    fn test_failure_reports_both_types() {
        let err = lax(ScalarType::Int, json!("42.5")).unwrap_err();
        assert_eq!(err.expected, "int");
        assert_eq!(err.observed, "string");
        assert_eq!(err.to_string(), "expected int, got string");
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(1)), "int");
        assert_eq!(json_type_name(&json!(1.5)), "float");
        assert_eq!(json_type_name(&json!("x")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
