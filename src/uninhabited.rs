//! Uninhabitedness check (spec.md §4.5): `⟦S⟧ = ∅`.
//!
//! Invoked by every [`crate::term::Schema`] constructor; never called
//! directly on a term that hasn't just been built, since terms are
//! immutable afterwards and the check is already baked into their shape.

use crate::interval::is_multiple_of;
use crate::regex_algebra::{is_empty_intersection, parse_anchored};
use crate::term::{Additional, Items, Kind, Schema};

/// `true` iff `schema` (about to be wrapped/returned by a constructor)
/// denotes the empty set, by spec.md §4.5's per-variant rules.
pub(crate) fn is_uninhabited_kind(schema: &Schema) -> bool {
    if let Some(values) = &schema.enum_values {
        if values.is_empty() {
            return true;
        }
    }
    match &schema.kind {
        Kind::Top | Kind::Boolean | Kind::Null => false,
        Kind::Bot => true,
        Kind::Integer(term) | Kind::Number(term) => {
            if term.interval.is_empty() {
                return true;
            }
            if let Some(m) = term.multiple_of {
                if let (crate::interval::Bound::Finite(lo), crate::interval::Bound::Finite(hi)) =
                    (term.interval.lo, term.interval.hi)
                {
                    return !any_multiple_in_range(lo, hi, m);
                }
            }
            false
        }
        Kind::String(term) => {
            let interval_empty = term
                .max_length
                .map(|max| term.min_length > max)
                .unwrap_or(false);
            if interval_empty {
                return true;
            }
            match parse_anchored(&term.pattern) {
                Ok(regex) => {
                    let any_len = crate::regex_algebra::parse_anchored(".*").unwrap();
                    is_empty_intersection(&regex, &any_len)
                }
                Err(_) => false,
            }
        }
        Kind::Array(term) => {
            let interval_empty = term
                .max_items
                .map(|max| term.min_items > max)
                .unwrap_or(false);
            if interval_empty {
                return true;
            }
            match &term.items {
                Items::Tuple(items) => {
                    if items.iter().any(Schema::is_bot) {
                        return true;
                    }
                    if term.additional_items.is_forbidden()
                        && term.min_items > items.len() as u64
                    {
                        return true;
                    }
                    false
                }
                Items::Single(_) => false,
            }
        }
        Kind::Object(term) => {
            if term
                .max_properties
                .map(|max| term.min_properties > max)
                .unwrap_or(false)
            {
                return true;
            }
            if term.max_properties.map(|max| term.required.len() as u64 > max).unwrap_or(false) {
                return true;
            }
            if matches!(term.additional_properties, Additional::Forbidden) {
                for key in &term.required {
                    let named = term.properties.contains_key(key);
                    let matched = term.pattern_properties.keys().any(|pattern| {
                        parse_anchored(pattern)
                            .ok()
                            .map(|p| pattern_matches_literal(&p, key))
                            .unwrap_or(false)
                    });
                    if !named && !matched {
                        return true;
                    }
                }
            }
            false
        }
        Kind::AnyOf(branches) => branches.iter().all(Schema::is_bot),
    }
}

fn any_multiple_in_range(lo: f64, hi: f64, divisor: f64) -> bool {
    if divisor <= 0.0 {
        return true;
    }
    let start = (lo / divisor).ceil() * divisor;
    start <= hi + 1e-9 && is_multiple_of(start, divisor)
}

/// `true` iff the anchored pattern `p` matches the literal string `key`
/// exactly (used to decide whether a `patternProperties` entry covers a
/// `required` key name).
fn pattern_matches_literal(p: &crate::regex_algebra::Regex, key: &str) -> bool {
    crate::regex_algebra::matches(p, key)
}

#[cfg(test)]
mod tests {
    use super::is_uninhabited_kind;
    use crate::interval::Interval;
    use crate::term::Schema;
    use test_case::test_case;

    #[test_case(Schema::numeric_integer(Interval::closed(0.0, 10.0), None) => false)]
    #[test_case(Schema::numeric_integer(Interval::closed(10.0, 0.0), None) => true)]
    fn test_numeric(schema: Schema) -> bool {
        is_uninhabited_kind(&schema)
    }

    #[test]
    fn test_bot_is_uninhabited() {
        assert!(is_uninhabited_kind(&Schema::bot()));
    }

    #[test]
    fn test_top_is_inhabited() {
        assert!(!is_uninhabited_kind(&Schema::top()));
    }
}
