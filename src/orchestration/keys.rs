//! Cache Key Module
//!
//! Deterministic key construction and pattern matching. Every cache key is
//! `domain:operation:params`, where the parameter digest is canonical: two
//! logically identical parameter objects produce the same key no matter how
//! the call site ordered their fields. The domain prefix partitions the key
//! space so call sites sharing the builder never collide across domains.

use serde_json::Value;

// == Build Key ==
/// Builds a cache key from domain, operation and canonicalized parameters.
pub fn build_key(domain: &str, operation: &str, params: &Value) -> String {
    format!("{}:{}:{}", domain, operation, canonical_params(params))
}

// == Canonical Params ==
/// Renders a JSON value with object keys sorted recursively, so field order
/// at the call site never changes the digest.
pub fn canonical_params(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}

// == Pattern Matching ==
/// Glob-style key matching with `*` as "any run of characters".
///
/// `channels:*` matches every channel key; `*:list:*` matches list
/// operations in any domain; a pattern without `*` must match exactly.
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == key;
    }

    let segments: Vec<&str> = pattern.split('*').collect();
    let mut remainder = key;

    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        if i == 0 {
            // Anchored at the start
            match remainder.strip_prefix(segment) {
                Some(rest) => remainder = rest,
                None => return false,
            }
        } else if i == segments.len() - 1 {
            // Anchored at the end
            return remainder.ends_with(segment);
        } else {
            match remainder.find(segment) {
                Some(pos) => remainder = &remainder[pos + segment.len()..],
                None => return false,
            }
        }
    }

    // Pattern ended with '*' (or was all wildcards)
    true
}
