//! Structured values: the data model shared by canonical encoding and test vectors.
//!
//! Objects are `BTreeMap`s, so keys are unique and two objects built from the
//! same pairs in different insertion orders compare (and encode) equal.
//! Numbers keep the numeric type they were parsed with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

/// A JSON object: unique string keys mapped to values.
pub type Map = BTreeMap<String, Value>;

const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

fn is_integral(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0
}

/// A JSON number, tagged with the type it was read as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Non-negative integer.
    PosInt(u64),
    /// Negative integer (always < 0).
    NegInt(i64),
    /// Floating point; may be non-finite when built in code.
    Float(f64),
}

impl Number {
    /// Build from a signed integer, normalising non-negative values to `PosInt`.
    pub fn from_i64(n: i64) -> Self {
        if n >= 0 {
            Number::PosInt(n as u64)
        } else {
            Number::NegInt(n)
        }
    }

    /// Integral, non-negative value that fits in a `u64`.
    ///
    /// Floats with no fractional part are accepted, since JSON producers
    /// commonly emit counts as `64.0`.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Number::PosInt(n) => Some(n),
            Number::NegInt(_) => None,
            Number::Float(f) if is_integral(f) && (0.0..TWO_POW_64).contains(&f) => Some(f as u64),
            Number::Float(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::PosInt(n) => i64::try_from(n).ok(),
            Number::NegInt(n) => Some(n),
            Number::Float(f) if is_integral(f) && (-TWO_POW_63..TWO_POW_63).contains(&f) => {
                Some(f as i64)
            }
            Number::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::PosInt(n) => n as f64,
            Number::NegInt(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            Number::Float(f) => f.is_finite(),
            _ => true,
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(u) = n.as_u64() {
            Number::PosInt(u)
        } else if let Some(i) = n.as_i64() {
            Number::NegInt(i)
        } else {
            Number::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::PosInt(n) => serializer.serialize_u64(n),
            Number::NegInt(n) => serializer.serialize_i64(n),
            Number::Float(f) if f.is_finite() => serializer.serialize_f64(f),
            Number::Float(f) => Err(serde::ser::Error::custom(format!(
                "cannot serialize non-finite number: {f}"
            ))),
        }
    }
}

/// A structured value: null, bool, number, string, array or object.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Build an object from key/value pairs. Later duplicates win.
    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Look up a key; `None` if absent or if `self` is not an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => items.serialize(serializer),
            Value::Object(map) => map.serialize(serializer),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(Number::from(&n)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(Number::PosInt(n as u64))
            }
        })*
    };
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(Number::from_i64(n as i64))
            }
        })*
    };
}

from_unsigned!(u8, u16, u32, u64, usize);
from_signed!(i8, i16, i32, i64, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_keeps_numeric_type() {
        let v: Value = serde_json::from_str(r#"[1, -2, 1.5, 18446744073709551615]"#).unwrap();
        assert_eq!(
            v,
            Value::Array(vec![
                Value::Number(Number::PosInt(1)),
                Value::Number(Number::NegInt(-2)),
                Value::Number(Number::Float(1.5)),
                Value::Number(Number::PosInt(u64::MAX)),
            ])
        );
    }

    #[test]
    fn test_object_insertion_order_irrelevant() {
        let a = Value::object([("b", Value::from(2)), ("a", Value::from(1))]);
        let b = Value::object([("a", Value::from(1)), ("b", Value::from(2))]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_typed_accessors_treat_wrong_type_as_absent() {
        let v: Value = serde_json::from_str(
            r#"{"seed_hex": 42, "verify": "true", "signature_length": 64.0, "name": "x"}"#,
        )
        .unwrap();

        assert_eq!(v.get("seed_hex").and_then(Value::as_str), None);
        assert_eq!(v.get("verify").and_then(Value::as_bool), None);
        assert_eq!(v.get("signature_length").and_then(Value::as_u64), Some(64));
        assert_eq!(v.get("name").and_then(Value::as_str), Some("x"));
        assert_eq!(v.get("missing"), None);
        assert_eq!(Value::from("not an object").get("name"), None);
    }

    #[test]
    fn test_as_u64_rejects_fractions_and_negatives() {
        assert_eq!(Value::from(64.5).as_u64(), None);
        assert_eq!(Value::from(-1).as_u64(), None);
        assert_eq!(Value::from(f64::NAN).as_u64(), None);
        assert_eq!(Value::from(7u8).as_u64(), Some(7));
    }

    #[test]
    fn test_serialize_rejects_non_finite() {
        assert!(serde_json::to_string(&Value::from(f64::INFINITY)).is_err());
        assert_eq!(
            serde_json::to_string(&Value::from(1.25)).unwrap(),
            "1.25".to_string()
        );
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from(vec![]).type_name(), "array");
        assert_eq!(Value::object::<_, &str>([]).type_name(), "object");
    }
}
