//! Canonical JSON encoding for deterministic serialization.
//!
//! Rules:
//! - Object keys sorted by UTF-8 byte order (equivalently, codepoint order)
//! - No whitespace between tokens
//! - Integers rendered exactly; floats in the shortest round-trip form, using
//!   the ECMAScript number grammar (`1e+21`, `1.5e-7`, `-0` as `0`)
//! - Strings escaped per RFC 8259
//!
//! Every SDK must produce the same bytes for the same logical value.

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::CanonicalError;
use crate::value::{Map, Number, Value};

/// Floats at or above this magnitude use exponent notation.
const EXPONENT_UPPER: f64 = 1e21;
/// Floats below this magnitude (and non-zero) use exponent notation.
const EXPONENT_LOWER: f64 = 1e-6;

/// Encode a value to canonical JSON bytes.
pub fn encode(value: &Value) -> Result<Vec<u8>, CanonicalError> {
    encode_to_string(value).map(String::into_bytes)
}

/// Encode a value to a canonical JSON string.
pub fn encode_to_string(value: &Value) -> Result<String, CanonicalError> {
    let mut out = String::new();
    encode_value(&mut out, value)?;
    Ok(out)
}

/// Parse JSON text into a [`Value`].
///
/// `encode(&parse(&encode(v)?)?)? == encode(v)?` holds for every encodable `v`.
pub fn parse(bytes: &[u8]) -> Result<Value, CanonicalError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Canonically encode any serde-serializable value.
///
/// The value is first lowered to a [`Value`] tree, so struct field order
/// never reaches the output. Non-finite floats fail with
/// [`CanonicalError::NonFiniteNumber`].
pub fn to_canonical<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CanonicalError> {
    encode(&crate::ser::to_value(value)?)
}

/// Recursively encode a value.
fn encode_value(out: &mut String, value: &Value) -> Result<(), CanonicalError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => encode_number(out, n)?,
        Value::String(s) => encode_string(out, s)?,
        Value::Array(items) => encode_array(out, items)?,
        Value::Object(map) => encode_object(out, map)?,
    }
    Ok(())
}

fn encode_number(out: &mut String, n: &Number) -> Result<(), CanonicalError> {
    match *n {
        Number::PosInt(u) => {
            let _ = write!(out, "{u}");
        }
        Number::NegInt(i) => {
            let _ = write!(out, "{i}");
        }
        Number::Float(f) => out.push_str(&format_float(f)?),
    }
    Ok(())
}

/// Format a float the way ECMAScript `Number.prototype.toString` does.
fn format_float(f: f64) -> Result<String, CanonicalError> {
    if !f.is_finite() {
        return Err(CanonicalError::NonFiniteNumber(f));
    }
    if f == 0.0 {
        return Ok("0".to_string());
    }

    let magnitude = f.abs();
    if (EXPONENT_LOWER..EXPONENT_UPPER).contains(&magnitude) {
        // Display is shortest round-trip and never switches to exponents.
        return Ok(format!("{f}"));
    }

    let formatted = format!("{f:e}");
    Ok(match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    })
}

fn encode_string(out: &mut String, s: &str) -> Result<(), CanonicalError> {
    out.push_str(&serde_json::to_string(s)?);
    Ok(())
}

fn encode_array(out: &mut String, items: &[Value]) -> Result<(), CanonicalError> {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        encode_value(out, item)?;
    }
    out.push(']');
    Ok(())
}

fn encode_object(out: &mut String, map: &Map) -> Result<(), CanonicalError> {
    // BTreeMap<String, _> iterates in ascending byte order of the keys.
    out.push('{');
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        encode_string(out, key)?;
        out.push(':');
        encode_value(out, value)?;
    }
    out.push('}');
    Ok(())
}
