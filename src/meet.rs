//! Meet engine (spec.md §4.2): `S₁ ∧ S₂`, the greatest lower bound.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::interval::lcm_f64;
use crate::regex_algebra::{intersect_pattern, is_empty_intersection, is_wildcard, parse_anchored};
use crate::term::{Additional, ArrayTerm, Items, Kind, NumericTerm, ObjectTerm, Schema, StringTerm};

/// `S₁ ∧ S₂`.
pub(crate) fn meet(a: &Schema, b: &Schema) -> Schema {
    if a.is_bot() || b.is_bot() {
        return Schema::bot();
    }
    if matches!(a.kind, Kind::Top) && a.enum_values.is_none() {
        return apply_enum_overlay(b.clone(), a, b);
    }
    if matches!(b.kind, Kind::Top) && b.enum_values.is_none() {
        return apply_enum_overlay(a.clone(), a, b);
    }
    if a == b {
        return a.clone();
    }

    if let Kind::AnyOf(branches) = &b.kind {
        let met: Vec<Schema> = branches.iter().map(|br| meet(a, br)).collect();
        return Schema::any_of(met);
    }
    if let Kind::AnyOf(branches) = &a.kind {
        let met: Vec<Schema> = branches.iter().map(|br| meet(br, b)).collect();
        return Schema::any_of(met);
    }

    let base = match (&a.kind, &b.kind) {
        (Kind::String(s1), Kind::String(s2)) => meet_string(s1, s2),
        (Kind::Integer(n1), Kind::Integer(n2)) => meet_numeric(n1, n2, true),
        (Kind::Integer(n1), Kind::Number(n2)) | (Kind::Number(n2), Kind::Integer(n1)) => meet_numeric(n1, n2, true),
        (Kind::Number(n1), Kind::Number(n2)) => meet_numeric(n1, n2, false),
        (Kind::Boolean, Kind::Boolean) => Schema::boolean(),
        (Kind::Null, Kind::Null) => Schema::null(),
        (Kind::Array(a1), Kind::Array(a2)) => meet_array(a1, a2),
        (Kind::Object(o1), Kind::Object(o2)) => meet_object(o1, o2),
        // Top with its own `enum` reaches here (the no-enum case short-circuits
        // above); it constrains nothing beyond its enum, so the other operand's
        // kind survives and `apply_enum_overlay` below intersects the enums.
        (Kind::Top, _) => b.clone(),
        (_, Kind::Top) => a.clone(),
        _ => Schema::bot(),
    };

    apply_enum_overlay(base, a, b)
}

/// Enum overlay after meet (spec.md §4.2): the surviving enum is the subset
/// of either operand's enum values that still validates against `base`.
fn apply_enum_overlay(base: Schema, a: &Schema, b: &Schema) -> Schema {
    if base.is_bot() {
        return base;
    }
    let mut candidates: Vec<Value> = Vec::new();
    if let Some(values) = &a.enum_values {
        candidates.extend(values.iter().cloned());
    }
    if let Some(values) = &b.enum_values {
        for v in values {
            if !candidates.contains(v) {
                candidates.push(v.clone());
            }
        }
    }
    if candidates.is_empty() {
        return base;
    }
    let surviving: Vec<Value> = candidates
        .into_iter()
        .filter(|v| {
            a.enum_values.as_ref().map(|vals| vals.contains(v)).unwrap_or(true)
                && b.enum_values.as_ref().map(|vals| vals.contains(v)).unwrap_or(true)
        })
        .collect();
    base.with_enum(surviving)
}

fn meet_string(s1: &StringTerm, s2: &StringTerm) -> Schema {
    let min_length = s1.min_length.max(s2.min_length);
    let max_length = match (s1.max_length, s2.max_length) {
        (None, None) => None,
        (Some(m), None) | (None, Some(m)) => Some(m),
        (Some(a), Some(b)) => Some(a.min(b)),
    };
    let pattern = if is_wildcard(&s1.pattern) {
        s2.pattern.clone()
    } else if is_wildcard(&s2.pattern) {
        s1.pattern.clone()
    } else if s1.pattern == s2.pattern {
        s1.pattern.clone()
    } else {
        match (parse_anchored(&s1.pattern), parse_anchored(&s2.pattern)) {
            (Ok(r1), Ok(r2)) if is_empty_intersection(&r1, &r2) => return Schema::bot(),
            _ => intersect_pattern(&s1.pattern, &s2.pattern),
        }
    };
    Schema::string(min_length, max_length, pattern)
}

fn meet_interval(i1: crate::interval::Interval, i2: crate::interval::Interval) -> crate::interval::Interval {
    i1.meet(&i2)
}

fn meet_numeric(n1: &NumericTerm, n2: &NumericTerm, integer: bool) -> Schema {
    let interval = meet_interval(n1.interval, n2.interval);
    let multiple_of = match (n1.multiple_of, n2.multiple_of) {
        (None, None) => None,
        (Some(m), None) | (None, Some(m)) => Some(m),
        (Some(a), Some(b)) => Some(lcm_f64(a, b)),
    };
    if integer {
        Schema::numeric_integer(interval, multiple_of)
    } else {
        Schema::numeric_number(interval, multiple_of)
    }
}

fn meet_min_max(a: u64, b: u64) -> u64 {
    a.max(b)
}

fn meet_opt_max(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(x),
        (Some(x), Some(y)) => Some(x.min(y)),
    }
}

fn meet_additional(a: &Additional, b: &Additional) -> Additional {
    match (a, b) {
        (Additional::Forbidden, _) | (_, Additional::Forbidden) => Additional::Forbidden,
        (Additional::Allowed, Additional::Allowed) => Additional::Allowed,
        (Additional::Allowed, Additional::Schema(s)) | (Additional::Schema(s), Additional::Allowed) => {
            Additional::Schema(s.clone())
        }
        (Additional::Schema(s1), Additional::Schema(s2)) => Additional::Schema(Box::new(meet(s1, s2))),
    }
}

fn meet_array(a1: &ArrayTerm, a2: &ArrayTerm) -> Schema {
    let min_items = meet_min_max(a1.min_items, a2.min_items);
    let max_items = meet_opt_max(a1.max_items, a2.max_items);
    let unique_items = a1.unique_items || a2.unique_items;

    let (items, additional_items) = match (&a1.items, &a2.items) {
        (Items::Single(s1), Items::Single(s2)) => (Items::Single(Box::new(meet(s1, s2))), meet_additional(&a1.additional_items, &a2.additional_items)),
        (Items::Single(single), Items::Tuple(tuple)) => meet_single_tuple(single, tuple, &a2.additional_items),
        (Items::Tuple(tuple), Items::Single(single)) => meet_single_tuple(single, tuple, &a1.additional_items),
        (Items::Tuple(t1), Items::Tuple(t2)) => {
            let (longer, shorter, longer_additional, shorter_additional) = if t1.len() >= t2.len() {
                (t1, t2, &a1.additional_items, &a2.additional_items)
            } else {
                (t2, t1, &a2.additional_items, &a1.additional_items)
            };
            let mut result = Vec::with_capacity(longer.len());
            let mut forced_false = false;
            for i in 0..longer.len() {
                let met = if i < shorter.len() {
                    meet(&longer[i], &shorter[i])
                } else {
                    match shorter_additional {
                        Additional::Forbidden => Schema::bot(),
                        Additional::Allowed => longer[i].clone(),
                        Additional::Schema(s) => meet(&longer[i], s),
                    }
                };
                if met.is_bot() {
                    forced_false = true;
                    result.push(met);
                    break;
                }
                result.push(met);
            }
            let additional = if forced_false {
                Additional::Forbidden
            } else {
                meet_additional(longer_additional, shorter_additional)
            };
            (Items::Tuple(result), additional)
        }
    };

    Schema::array(ArrayTerm {
        min_items,
        max_items,
        items,
        additional_items,
        unique_items,
    })
}

/// Meets a single-schema side against a tuple side (spec.md §4.2): each
/// tuple position meets the single schema, and the tuple side's
/// `additionalItems` combines with the single schema per the `true`/`false`/
/// schema cases spelled out there.
fn meet_single_tuple(single: &Schema, tuple: &[Schema], tuple_additional: &Additional) -> (Items, Additional) {
    let new_tuple: Vec<Schema> = tuple.iter().map(|t| meet(t, single)).collect();
    let new_additional = match tuple_additional {
        Additional::Allowed => Additional::Schema(Box::new(single.clone())),
        Additional::Forbidden => Additional::Forbidden,
        Additional::Schema(s) => Additional::Schema(Box::new(meet(s, single))),
    };
    (Items::Tuple(new_tuple), new_additional)
}

fn meet_object(o1: &ObjectTerm, o2: &ObjectTerm) -> Schema {
    let required: BTreeSet<String> = o1.required.union(&o2.required).cloned().collect();
    let min_properties = meet_min_max(o1.min_properties, o2.min_properties);
    let max_properties = meet_opt_max(o1.max_properties, o2.max_properties);
    let additional_properties = meet_additional(&o1.additional_properties, &o2.additional_properties);

    let mut properties: BTreeMap<String, Schema> = BTreeMap::new();
    for key in o1.properties.keys().chain(o2.properties.keys()) {
        if properties.contains_key(key) {
            continue;
        }
        let merged = match (o1.properties.get(key), o2.properties.get(key)) {
            (Some(s1), Some(s2)) => meet(s1, s2),
            (Some(s1), None) => s1.clone(),
            (None, Some(s2)) => s2.clone(),
            (None, None) => unreachable!(),
        };
        properties.insert(key.clone(), merged);
    }

    let mut pattern_properties: BTreeMap<String, Schema> = BTreeMap::new();
    for pattern in o1.pattern_properties.keys().chain(o2.pattern_properties.keys()) {
        if pattern_properties.contains_key(pattern) {
            continue;
        }
        let merged = match (o1.pattern_properties.get(pattern), o2.pattern_properties.get(pattern)) {
            (Some(s1), Some(s2)) => meet(s1, s2),
            (Some(s1), None) => s1.clone(),
            (None, Some(s2)) => s2.clone(),
            (None, None) => unreachable!(),
        };
        pattern_properties.insert(pattern.clone(), merged);
    }

    Schema::object(ObjectTerm {
        properties,
        pattern_properties,
        required,
        min_properties,
        max_properties,
        additional_properties,
    })
}

#[cfg(test)]
mod tests {
    use super::meet;
    use crate::interval::Interval;
    use crate::term::Schema;
    use test_case::test_case;

    #[test]
    fn test_meet_with_top_is_identity() {
        let s = Schema::numeric_integer(Interval::closed(0.0, 10.0), None);
        assert_eq!(meet(&s, &Schema::top()), s);
    }

    #[test]
    fn test_meet_with_bot_is_bot() {
        let s = Schema::numeric_integer(Interval::closed(0.0, 10.0), None);
        assert!(meet(&s, &Schema::bot()).is_bot());
    }

    #[test]
    fn test_meet_typeless_enum_with_integer_range_keeps_enum() {
        let s1 = Schema::top().with_enum(vec![serde_json::json!(1), serde_json::json!(2)]);
        let s2 = Schema::numeric_integer(Interval::closed(0.0, 5.0), None);
        let result = meet(&s1, &s2);
        assert!(!result.is_bot(), "both enum members lie within the integer range");
        assert_eq!(result.enum_values, Some(vec![serde_json::json!(1), serde_json::json!(2)]));
    }

    #[test]
    fn test_meet_numeric_intervals() {
        let a = Schema::numeric_integer(Interval::closed(0.0, 10.0), None);
        let b = Schema::numeric_integer(Interval::closed(5.0, 20.0), None);
        let result = meet(&a, &b);
        match result.kind {
            crate::term::Kind::Integer(term) => {
                assert_eq!(term.interval, Interval::closed(5.0, 10.0));
            }
            other => panic!("expected Integer, got {other:?}"),
        }
    }

    #[test_case("^a$", "^b$" => true; "disjoint string patterns meet to bot")]
    fn test_meet_string_disjoint_patterns(p1: &str, p2: &str) -> bool {
        let a = Schema::string(0, None, p1);
        let b = Schema::string(0, None, p2);
        meet(&a, &b).is_bot()
    }

    #[test]
    fn test_meet_incompatible_types_is_bot() {
        let a = Schema::boolean();
        let b = Schema::null();
        assert!(meet(&a, &b).is_bot());
    }
}
