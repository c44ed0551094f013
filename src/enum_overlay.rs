//! Enum overlay (spec.md §4.5, §9 "Enum as overlay"): a finite set of JSON
//! values layered on top of any primitive term. A term's `enum` is always
//! filtered at construction/assignment to only the values that also satisfy
//! the term's other constraints (spec.md §3's enum invariant).

use serde_json::Value;

use crate::regex_algebra::{matches, parse_anchored};
use crate::term::{Additional, Items, Kind, Schema};

/// Keeps only the values of `candidates` that validate against `schema`'s
/// non-enum constraints (spec.md §3: "an enum-carrying term retains only
/// values that satisfy all other constraints").
pub(crate) fn restrict(schema: &Schema, candidates: &[Value]) -> Vec<Value> {
    candidates
        .iter()
        .filter(|v| validates_kind(&schema.kind, v))
        .cloned()
        .collect()
}

/// `true` iff `value` satisfies `schema` as a validator, including its enum
/// overlay if present (spec.md §4.3's enum-overlay subtype check reuses
/// this: "true iff every enum value of S1 satisfies S2 as a validator").
pub(crate) fn validates(schema: &Schema, value: &Value) -> bool {
    if let Some(values) = &schema.enum_values {
        return values.contains(value);
    }
    validates_kind(&schema.kind, value)
}

fn validates_kind(kind: &Kind, value: &Value) -> bool {
    match kind {
        Kind::Top => true,
        Kind::Bot => false,
        Kind::Boolean => value.is_boolean(),
        Kind::Null => value.is_null(),
        Kind::Integer(term) => value
            .as_f64()
            .filter(|n| n.fract() == 0.0)
            .map(|n| validates_numeric(term, n))
            .unwrap_or(false),
        Kind::Number(term) => value.as_f64().map(|n| validates_numeric(term, n)).unwrap_or(false),
        Kind::String(term) => value
            .as_str()
            .map(|s| validates_string(term, s))
            .unwrap_or(false),
        Kind::Array(term) => value.as_array().map(|a| validates_array(term, a)).unwrap_or(false),
        Kind::Object(term) => value
            .as_object()
            .map(|o| validates_object(term, o))
            .unwrap_or(false),
        Kind::AnyOf(branches) => branches.iter().any(|b| validates(b, value)),
    }
}

fn validates_numeric(term: &crate::term::NumericTerm, n: f64) -> bool {
    if !term.interval.contains_value(n) {
        return false;
    }
    term.multiple_of
        .map(|m| crate::interval::is_multiple_of(n, m))
        .unwrap_or(true)
}

fn validates_string(term: &crate::term::StringTerm, s: &str) -> bool {
    let len = s.chars().count() as u64;
    if len < term.min_length {
        return false;
    }
    if term.max_length.map(|max| len > max).unwrap_or(false) {
        return false;
    }
    parse_anchored(&term.pattern)
        .map(|r| matches(&r, s))
        .unwrap_or(true)
}

fn validates_array(term: &crate::term::ArrayTerm, items: &[Value]) -> bool {
    let len = items.len() as u64;
    if len < term.min_items {
        return false;
    }
    if term.max_items.map(|max| len > max).unwrap_or(false) {
        return false;
    }
    if term.unique_items {
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                if items[i] == items[j] {
                    return false;
                }
            }
        }
    }
    match &term.items {
        Items::Single(schema) => items.iter().all(|v| validates(schema, v)),
        Items::Tuple(tuple) => {
            for (i, value) in items.iter().enumerate() {
                let ok = match tuple.get(i) {
                    Some(schema) => validates(schema, value),
                    None => match &term.additional_items {
                        Additional::Forbidden => false,
                        Additional::Allowed => true,
                        Additional::Schema(schema) => validates(schema, value),
                    },
                };
                if !ok {
                    return false;
                }
            }
            true
        }
    }
}

fn validates_object(term: &crate::term::ObjectTerm, object: &serde_json::Map<String, Value>) -> bool {
    if (object.len() as u64) < term.min_properties {
        return false;
    }
    if term.max_properties.map(|max| object.len() as u64 > max).unwrap_or(false) {
        return false;
    }
    for key in &term.required {
        if !object.contains_key(key) {
            return false;
        }
    }
    for (key, value) in object {
        if let Some(schema) = term.properties.get(key) {
            if !validates(schema, value) {
                return false;
            }
            continue;
        }
        let mut matched_pattern = false;
        for (pattern, schema) in &term.pattern_properties {
            if parse_anchored(pattern).map(|r| matches(&r, key)).unwrap_or(false) {
                matched_pattern = true;
                if !validates(schema, value) {
                    return false;
                }
            }
        }
        if matched_pattern {
            continue;
        }
        match &term.additional_properties {
            Additional::Forbidden => return false,
            Additional::Allowed => {}
            Additional::Schema(schema) => {
                if !validates(schema, value) {
                    return false;
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::{restrict, validates};
    use crate::interval::Interval;
    use crate::term::Schema;
    use serde_json::json;

    #[test]
    fn test_restrict_keeps_only_matching_values() {
        let schema = Schema::numeric_integer(Interval::closed(0.0, 10.0), None);
        let candidates = vec![json!(1), json!(20), json!(5)];
        let kept = restrict(&schema, &candidates);
        assert_eq!(kept, vec![json!(1), json!(5)]);
    }

    #[test]
    fn test_validates_string_pattern() {
        let schema = Schema::string(0, None, "^ab*$");
        assert!(validates(&schema, &json!("abbb")));
        assert!(!validates(&schema, &json!("xyz")));
    }
}
