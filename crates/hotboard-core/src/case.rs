//! Key-style conversion between storage (`snake_case`) and application
//! (`camelCase`) field names.
//!
//! Both directions walk arbitrarily nested JSON: objects get every key
//! rewritten, arrays are mapped element-wise, and anything else is returned
//! untouched. Neither direction can fail.
//!
//! `to_snake(to_camel(x)) == x` holds when every key in `x` is a
//! single-underscore `snake_case` identifier. Keys with leading, trailing or
//! doubled underscores, or an underscore before a digit, do not round-trip.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

static SNAKE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([a-z])").expect("valid snake segment regex"));

static UPPERCASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("valid uppercase regex"));

/// Rewrites one key: every `_x` (lowercase ASCII `x`) becomes `X`.
#[must_use]
pub fn camel_key(key: &str) -> String {
    SNAKE_SEGMENT
        .replace_all(key, |caps: &Captures<'_>| caps[1].to_ascii_uppercase())
        .into_owned()
}

/// Rewrites one key: every uppercase ASCII letter becomes `_` plus its
/// lowercase form. Consecutive capitals each get their own underscore.
#[must_use]
pub fn snake_key(key: &str) -> String {
    UPPERCASE
        .replace_all(key, |caps: &Captures<'_>| {
            format!("_{}", caps[0].to_ascii_lowercase())
        })
        .into_owned()
}

/// Converts every object key in `value` to `camelCase`.
#[must_use]
pub fn to_camel(value: Value) -> Value {
    rewrite_keys(value, camel_key)
}

/// Converts every object key in `value` to `snake_case`.
#[must_use]
pub fn to_snake(value: Value) -> Value {
    rewrite_keys(value, snake_key)
}

fn rewrite_keys(value: Value, rename: fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, inner)| (rename(&key), rewrite_keys(inner, rename)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|inner| rewrite_keys(inner, rename))
                .collect(),
        ),
        scalar => scalar,
    }
}
