//! Subtype engine (spec.md §4.3): `S₁ ≤ S₂`.

use crate::enum_overlay::validates;
use crate::regex_algebra::{is_subset, is_wildcard, parse_anchored};
use crate::term::{Additional, ArrayTerm, Items, Kind, NumericTerm, ObjectTerm, Schema, StringTerm};

/// `S₁ ≤ S₂`.
pub(crate) fn is_subtype(a: &Schema, b: &Schema) -> bool {
    if a == b {
        return true;
    }
    if matches!(a.kind, Kind::Bot) {
        return true;
    }
    if matches!(b.kind, Kind::Top) && b.enum_values.is_none() {
        return true;
    }
    // spec.md §9: `Top._isSubtype`'s fallthrough is corrected here to
    // "Top ≤ S iff S = Top" rather than left unspecified. Guarded on
    // a.enum_values so a typeless schema carrying its own `enum` falls
    // through to the enum-overlay check below instead of being rejected here.
    if matches!(a.kind, Kind::Top) && a.enum_values.is_none() {
        return matches!(b.kind, Kind::Top) && b.enum_values.is_none();
    }

    if let Kind::AnyOf(branches) = &b.kind {
        return branches.iter().any(|br| is_subtype(a, br));
    }
    if let Kind::AnyOf(branches) = &a.kind {
        return branches.iter().all(|br| is_subtype(br, b));
    }

    // Enum overlay (spec.md §4.3): short-circuits the rest once S1 has an enum.
    if let Some(values) = &a.enum_values {
        return values.iter().all(|v| validates(b, v));
    }

    // Right-side enum restriction (supplemental, see DESIGN.md): S1 without
    // its own enum can only be a subtype of a finite-enum S2 when S1's whole
    // denotation is itself finite and contained in that enum. Only Boolean
    // and Null are decided here; every other variant conservatively fails.
    if let Some(values) = &b.enum_values {
        let covers_enum = match &a.kind {
            Kind::Boolean => {
                values.contains(&serde_json::json!(true)) && values.contains(&serde_json::json!(false))
            }
            Kind::Null => values.contains(&serde_json::Value::Null),
            _ => false,
        };
        if !covers_enum {
            return false;
        }
    }

    match &a.kind {
        Kind::String(s1) => match &b.kind {
            Kind::String(s2) => is_subtype_string(s1, s2),
            _ => false,
        },
        Kind::Integer(n1) => match &b.kind {
            Kind::Integer(n2) => is_subtype_numeric(n1, n2, false),
            Kind::Number(n2) => is_subtype_numeric(n1, n2, false),
            _ => false,
        },
        Kind::Number(n1) => match &b.kind {
            Kind::Number(n2) => is_subtype_numeric(n1, n2, false),
            Kind::Integer(n2) => is_subtype_numeric(n1, n2, true),
            _ => false,
        },
        Kind::Boolean => matches!(b.kind, Kind::Boolean),
        Kind::Null => matches!(b.kind, Kind::Null),
        Kind::Array(a1) => match &b.kind {
            Kind::Array(a2) => is_subtype_array(a1, a2),
            _ => false,
        },
        Kind::Object(o1) => match &b.kind {
            Kind::Object(o2) => is_subtype_object(o1, o2),
            _ => false,
        },
        Kind::Top | Kind::Bot | Kind::AnyOf(_) => unreachable!("handled above"),
    }
}

fn is_subtype_string(s1: &StringTerm, s2: &StringTerm) -> bool {
    if s1.min_length < s2.min_length {
        return false;
    }
    if let Some(max2) = s2.max_length {
        if s1.max_length.map(|max1| max1 > max2).unwrap_or(true) {
            return false;
        }
    }
    if is_wildcard(&s2.pattern) || s1.pattern == s2.pattern {
        return true;
    }
    match (parse_anchored(&s1.pattern), parse_anchored(&s2.pattern)) {
        (Ok(r1), Ok(r2)) => is_subset(&r1, &r2),
        _ => false,
    }
}

/// `numeric_target_is_integer` handles the `Number ≤ Integer` case, which
/// additionally requires `multipleOf` to be integer-valued (spec.md §4.3).
fn is_subtype_numeric(n1: &NumericTerm, n2: &NumericTerm, numeric_target_is_integer: bool) -> bool {
    if !n2.interval.contains_interval(&n1.interval) {
        return false;
    }
    if numeric_target_is_integer {
        let integer_valued = n1.multiple_of.map(|m| m.fract() == 0.0).unwrap_or(false);
        if !integer_valued {
            return false;
        }
    }
    match (n1.multiple_of, n2.multiple_of) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(m1), Some(m2)) => m1 == m2 || crate::interval::is_multiple_of(m1, m2),
    }
}

fn additional_as_schema(additional: &Additional) -> Schema {
    match additional {
        Additional::Allowed => Schema::top(),
        Additional::Forbidden => Schema::bot(),
        Additional::Schema(s) => (**s).clone(),
    }
}

fn is_subtype_array(a1: &ArrayTerm, a2: &ArrayTerm) -> bool {
    let min_ok = a1.min_items >= a2.min_items;
    let max_ok = match a2.max_items {
        None => true,
        Some(max2) => a1.max_items.map(|max1| max1 <= max2).unwrap_or(false),
    };
    if !min_ok || !max_ok {
        return false;
    }
    if a1.unique_items < a2.unique_items {
        return false;
    }

    match (&a1.items, &a2.items) {
        (Items::Single(i1), Items::Single(i2)) => is_subtype(i1, i2),
        (Items::Single(single), Items::Tuple(tuple)) => {
            if !tuple.iter().all(|t| is_subtype(single, t)) {
                return false;
            }
            if a1.additional_items.is_allowed() {
                is_subtype(&Schema::top(), &additional_as_schema(&a2.additional_items))
            } else {
                true
            }
        }
        (Items::Tuple(tuple), Items::Single(single)) => {
            if !tuple.iter().all(|t| is_subtype(t, single)) {
                return false;
            }
            match &a1.additional_items {
                Additional::Schema(s) => is_subtype(s, single),
                _ => true,
            }
        }
        (Items::Tuple(t1), Items::Tuple(t2)) => {
            let common = t1.len().min(t2.len());
            for i in 0..common {
                if !is_subtype(&t1[i], &t2[i]) {
                    return false;
                }
            }
            let left_extra_ok = t1[common..].iter().all(|s| is_subtype(s, &additional_as_schema(&a2.additional_items)));
            let right_extra_ok = t2[common..].iter().all(|s| is_subtype(&additional_as_schema(&a1.additional_items), s));
            if !left_extra_ok || !right_extra_ok {
                return false;
            }
            is_subtype(&additional_as_schema(&a1.additional_items), &additional_as_schema(&a2.additional_items))
        }
    }
}

/// Returns every schema a property named `key` would validate against on
/// `term`: the literal property, every matching pattern, or
/// `additionalProperties` — always indexed into the *target* schema (spec.md
/// §9's correction of the source's `k.properties[k]` bug).
fn schemas_for_key<'a>(term: &'a ObjectTerm, key: &str) -> Vec<&'a Schema> {
    if let Some(schema) = term.properties.get(key) {
        return vec![schema];
    }
    let matched: Vec<&Schema> = term
        .pattern_properties
        .iter()
        .filter(|(pattern, _)| {
            parse_anchored(pattern)
                .map(|r| crate::regex_algebra::matches(&r, key))
                .unwrap_or(false)
        })
        .map(|(_, schema)| schema)
        .collect();
    if !matched.is_empty() {
        return matched;
    }
    vec![]
}

fn is_subtype_object(o1: &ObjectTerm, o2: &ObjectTerm) -> bool {
    let min_ok = o1.min_properties >= o2.min_properties;
    let max_ok = match o2.max_properties {
        None => true,
        Some(max2) => o1.max_properties.map(|max1| max1 <= max2).unwrap_or(false),
    };
    if !min_ok || !max_ok {
        return false;
    }
    if !o1.required.is_superset(&o2.required) {
        return false;
    }

    // (c) extra properties named on the right but not on the left.
    for key in o2.properties.keys() {
        if o1.properties.contains_key(key) {
            continue;
        }
        if o1.pattern_properties.keys().any(|p| {
            parse_anchored(p).map(|r| crate::regex_algebra::matches(&r, key)).unwrap_or(false)
        }) {
            continue;
        }
        if !is_subtype(&additional_as_schema(&o1.additional_properties), &o2.properties[key]) {
            return false;
        }
    }

    // (d) right-side patterns not present on the left: left's
    // additionalProperties must cover them whenever their language is infinite.
    for (pattern, schema) in &o2.pattern_properties {
        if o1.pattern_properties.contains_key(pattern) {
            continue;
        }
        let infinite = parse_anchored(pattern).map(|r| !crate::regex_algebra::is_finite(&r)).unwrap_or(true);
        if infinite && !is_subtype(&additional_as_schema(&o1.additional_properties), schema) {
            return false;
        }
    }

    // (e) matched name/pattern pairs on both sides.
    for (key, s1) in &o1.properties {
        for s2 in schemas_for_key(o2, key) {
            if !is_subtype(s1, s2) {
                return false;
            }
        }
    }
    for (pattern, s2) in &o2.pattern_properties {
        if let Some(s1) = o1.pattern_properties.get(pattern) {
            if !is_subtype(s1, s2) {
                return false;
            }
        }
    }
    for key in &o1.required {
        for s2 in schemas_for_key(o2, key) {
            let s1_candidates = schemas_for_key(o1, key);
            let owned_top = Schema::top();
            let effective_s1 = s1_candidates.first().copied().unwrap_or(&owned_top);
            if !is_subtype(effective_s1, s2) {
                return false;
            }
        }
    }

    // (f) additionalProperties ordering: false < schema < true.
    is_subtype(&additional_as_schema(&o1.additional_properties), &additional_as_schema(&o2.additional_properties))
}

#[cfg(test)]
mod tests {
    use super::is_subtype;
    use crate::interval::Interval;
    use crate::term::Schema;
    use test_case::test_case;

    #[test]
    fn test_reflexivity() {
        let s = Schema::numeric_integer(Interval::closed(0.0, 10.0), None);
        assert!(is_subtype(&s, &s));
    }

    #[test]
    fn test_bot_is_subtype_of_everything() {
        assert!(is_subtype(&Schema::bot(), &Schema::top()));
        assert!(is_subtype(&Schema::bot(), &Schema::boolean()));
    }

    #[test]
    fn test_top_is_subtype_only_of_top() {
        assert!(is_subtype(&Schema::top(), &Schema::top()));
        assert!(!is_subtype(&Schema::top(), &Schema::boolean()));
    }

    #[test]
    fn test_integer_subtype_of_number() {
        let integer = Schema::numeric_integer(Interval::closed(0.0, 10.0), None);
        let number = crate::term::Schema::numeric_number(Interval::everything(), None);
        assert!(is_subtype(&integer, &number));
    }

    #[test]
    fn test_typeless_enum_reaches_enum_overlay_not_top_branch() {
        let s1 = Schema::top().with_enum(vec![serde_json::json!(1), serde_json::json!(2)]);
        let s2 = Schema::numeric_integer(Interval::closed(0.0, 5.0), None);
        assert!(is_subtype(&s1, &s2), "a typeless enum should be checked via the enum overlay, not rejected by the Top branch");
    }

    #[test_case("^ab$", "^a.*$" => true)]
    #[test_case("^a.*$", "^ab$" => false)]
    fn test_string_pattern_subtype(p1: &str, p2: &str) -> bool {
        let a = Schema::string(0, None, p1);
        let b = Schema::string(0, None, p2);
        is_subtype(&a, &b)
    }
}
