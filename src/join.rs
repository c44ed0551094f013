//! Join engine (spec.md §4.4): `S₁ ∨ S₂`, realized as `AnyOf`.

use crate::term::{Kind, Schema};

/// `S₁ ∨ S₂`.
pub(crate) fn join(a: &Schema, b: &Schema) -> Schema {
    if a.is_bot() {
        return b.clone();
    }
    if b.is_bot() {
        return a.clone();
    }
    if matches!(a.kind, Kind::Top) && a.enum_values.is_none() {
        return a.clone();
    }
    if matches!(b.kind, Kind::Top) && b.enum_values.is_none() {
        return b.clone();
    }
    if a == b {
        return a.clone();
    }
    Schema::any_of(vec![a.clone(), b.clone()])
}

#[cfg(test)]
mod tests {
    use super::join;
    use crate::interval::Interval;
    use crate::term::{Kind, Schema};

    #[test]
    fn test_join_with_bot_is_identity() {
        let s = Schema::numeric_integer(Interval::closed(0.0, 10.0), None);
        assert_eq!(join(&s, &Schema::bot()), s);
    }

    #[test]
    fn test_join_with_top_is_top() {
        let s = Schema::boolean();
        assert!(join(&s, &Schema::top()).is_top());
    }

    #[test]
    fn test_join_distinct_is_any_of() {
        let a = Schema::boolean();
        let b = Schema::null();
        match join(&a, &b).kind {
            Kind::AnyOf(branches) => assert_eq!(branches.len(), 2),
            other => panic!("expected AnyOf, got {other:?}"),
        }
    }

    #[test]
    fn test_join_equal_is_identity() {
        let s = Schema::boolean();
        assert_eq!(join(&s, &s), s);
    }
}
