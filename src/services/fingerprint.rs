//! Canonical request fingerprints used as cache keys.
//!
//! A payload is serialized canonically before hashing:
//! - object keys are sorted lexicographically, arrays keep their order;
//! - every number is rendered as an `f64` with six decimal places, so `1`,
//!   `1.0` and `1.0000001` collide while `1.00001` does not;
//! - values that round to zero are rendered without a sign.
//!
//! The fingerprint is the hex SHA-256 of `endpoint + "\n" + canonical`.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::domain::errors::DomainResult;

/// Decimal places kept for every number in the canonical form.
pub const NUMBER_PRECISION: usize = 6;

/// Fingerprint a JSON payload for an endpoint.
pub fn fingerprint(endpoint: &str, payload: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(endpoint.as_bytes());
    hasher.update(b"\n");
    hasher.update(canonicalize(payload).as_bytes());
    hex::encode(hasher.finalize())
}

/// Fingerprint any serializable request.
pub fn fingerprint_of<T: Serialize>(endpoint: &str, request: &T) -> DomainResult<String> {
    let payload = serde_json::to_value(request)?;
    Ok(fingerprint(endpoint, &payload))
}

/// Canonical string form of a JSON value.
pub fn canonicalize(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(&mut out, value);
    out
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            // Every serde_json number converts to f64; precision loss on huge
            // integers is accepted.
            let f = n.as_f64().unwrap_or(0.0);
            let rendered = format!("{:.*}", NUMBER_PRECISION, f);
            // "-0.000000" covers -0.0 and tiny negatives alike
            match rendered.strip_prefix('-') {
                Some(magnitude) if magnitude.bytes().all(|b| b == b'0' || b == b'.') => out.push_str(magnitude),
                _ => out.push_str(&rendered),
            }
        }
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_canonical(out, &map[key.as_str()]);
            }
            out.push('}');
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    // serde_json escaping is deterministic and never fails for a str
    match serde_json::to_string(s) {
        Ok(escaped) => out.push_str(&escaped),
        Err(_) => out.push_str("\"\""),
    }
}
