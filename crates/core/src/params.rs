//! Pure helpers for reading typed settings out of a `serde_json::Value` object.
//!
//! Every config struct in this crate has a `from_json` built on these. Each
//! helper takes a JSON value, a key name, and a default; a missing key or a
//! value of the wrong type yields the default. They never fail.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// JSON integers are accepted and converted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts an optional `f64`: `None` when the key is missing, `null`, or not a number.
pub fn param_opt_f64(params: &Value, name: &str) -> Option<f64> {
    params.get(name).and_then(Value::as_f64)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
///
/// Only non-negative integers that fit in `u64` are accepted.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Extracts a `u64` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}

/// Extracts a `String` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Extracts an array of strings from `params[name]`.
///
/// Returns `None` if the key is missing, not an array, or any element is not
/// a string, so callers can fall back to their own default list.
pub fn param_string_list(params: &Value, name: &str) -> Option<Vec<String>> {
    params
        .get(name)
        .and_then(Value::as_array)?
        .iter()
        .map(|v| v.as_str().map(String::from))
        .collect()
}
