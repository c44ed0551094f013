//! # jsonsubschema
//!
//! Decides the subschema relation between two JSON Schema (draft-4 numeric
//! style) documents: given `S1` and `S2`, whether every value accepted by
//! `S1` is also accepted by `S2`.
//!
//! The core is a typed lattice of schema terms (see [`term`]) under meet
//! (`∧`), join (`∨`), a subtype decision procedure (`≤`), canonicalization of
//! `allOf`/`anyOf`/`not`, and an uninhabitedness test. Metaschema validation,
//! JSON I/O and the command-line front end are external collaborators (see
//! the `cli` crate in this workspace), not part of this library.
//!
//! ```rust
//! use jsonsubschema::is_subschema;
//! use serde_json::json;
//!
//! let left = json!({"type": "integer", "minimum": 0, "maximum": 10});
//! let right = json!({"type": "number"});
//! assert_eq!(is_subschema(&left, &right).unwrap(), true);
//! ```
#![warn(
    clippy::pedantic,
    clippy::doc_markdown,
    clippy::redundant_closure,
    clippy::explicit_iter_loop,
    clippy::match_same_arms,
    clippy::needless_borrow,
    clippy::print_stdout,
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    variant_size_differences
)]

mod canonicalize;
mod constants;
pub mod config;
pub mod error;
mod enum_overlay;
mod interval;
mod join;
mod meet;
mod primitive_type;
mod regex_algebra;
mod subtype;
mod term;
mod uninhabited;

use serde_json::Value;

pub use config::Config;
pub use error::{ErrorCode, SubschemaError};

use canonicalize::Side;

/// `⟦S1⟧ ⊆ ⟦S2⟧`: decides whether every JSON value accepted by `s1` is also
/// accepted by `s2`, using the default [`Config`].
///
/// # Errors
/// Returns [`SubschemaError::InvalidInput`] if either document isn't a
/// recognizable JSON Schema shape, or [`SubschemaError::Unsupported`] if
/// `s1` uses `oneOf` (spec.md §9) or either side uses an unrestricted `not`.
pub fn is_subschema(s1: &Value, s2: &Value) -> Result<bool, SubschemaError> {
    is_subschema_with_config(s1, s2, &Config::default())
}

/// As [`is_subschema`], with an explicit [`Config`].
#[jsonsubschema_rule_processor_logger::log_call]
pub fn is_subschema_with_config(s1: &Value, s2: &Value, config: &Config) -> Result<bool, SubschemaError> {
    let left = canonicalize::canonicalize(s1, Side::Left, config)?;
    let right = canonicalize::canonicalize(s2, Side::Right, config)?;
    Ok(subtype::is_subtype(&left, &right))
}

/// `S1 ∧ S2`: the schema whose denotation is `⟦S1⟧ ∩ ⟦S2⟧`, as a JSON Schema
/// document.
///
/// # Errors
/// As [`is_subschema`]. Both operands are canonicalized as the left side of
/// `≤` (so `oneOf` is unsupported in either).
pub fn meet(s1: &Value, s2: &Value) -> Result<Value, SubschemaError> {
    meet_with_config(s1, s2, &Config::default())
}

/// As [`meet`], with an explicit [`Config`].
#[jsonsubschema_rule_processor_logger::log_call]
pub fn meet_with_config(s1: &Value, s2: &Value, config: &Config) -> Result<Value, SubschemaError> {
    let left = canonicalize::canonicalize(s1, Side::Left, config)?;
    let right = canonicalize::canonicalize(s2, Side::Left, config)?;
    Ok(meet::meet(&left, &right).into_json())
}

/// `S1 ∨ S2`: the schema whose denotation is `⟦S1⟧ ∪ ⟦S2⟧`, as a JSON Schema
/// document.
///
/// # Errors
/// As [`is_subschema`].
pub fn join(s1: &Value, s2: &Value) -> Result<Value, SubschemaError> {
    join_with_config(s1, s2, &Config::default())
}

/// As [`join`], with an explicit [`Config`].
#[jsonsubschema_rule_processor_logger::log_call]
pub fn join_with_config(s1: &Value, s2: &Value, config: &Config) -> Result<Value, SubschemaError> {
    let left = canonicalize::canonicalize(s1, Side::Left, config)?;
    let right = canonicalize::canonicalize(s2, Side::Left, config)?;
    Ok(join::join(&left, &right).into_json())
}

/// `⟦S⟧ = ∅`: whether `schema` denotes no JSON value at all.
///
/// # Errors
/// As [`is_subschema`].
pub fn is_uninhabited(schema: &Value) -> Result<bool, SubschemaError> {
    is_uninhabited_with_config(schema, &Config::default())
}

/// As [`is_uninhabited`], with an explicit [`Config`].
#[jsonsubschema_rule_processor_logger::log_call]
pub fn is_uninhabited_with_config(schema: &Value, config: &Config) -> Result<bool, SubschemaError> {
    let term = canonicalize::canonicalize(schema, Side::Left, config)?;
    Ok(term.is_bot())
}

#[cfg(test)]
mod tests {
    use super::{is_subschema, is_uninhabited, join, meet};
    use serde_json::json;
    use test_case::test_case;

    // Concrete scenarios from spec.md §8.
    #[test_case(
        json!({"type":"integer","minimum":0,"maximum":10}),
        json!({"type":"number"})
        => true; "integer range is subtype of number")]
    #[test_case(
        json!({"type":"number","multipleOf":2}),
        json!({"type":"integer"})
        => true; "integer-valued multiple of number is subtype of integer")]
    #[test_case(
        json!({"type":"string","pattern":"^ab$"}),
        json!({"type":"string","pattern":"^a.*$"})
        => true; "literal string matches prefix wildcard pattern")]
    #[test_case(
        json!({"type":"array","items":[{"type":"integer"},{"type":"string"}],"additionalItems":false}),
        json!({"type":"array","items":{"type":"integer"}})
        => false; "tuple second position string is not subtype of integer")]
    #[test_case(
        json!({"type":"object","required":["a","b"],"properties":{"a":{"type":"integer"},"b":{"type":"string"}}}),
        json!({"type":"object","required":["a"],"properties":{"a":{"type":"number"}}})
        => true; "object with more required keys is subtype of less restrictive object")]
    #[test_case(
        json!({"type":"integer","enum":[1,2,3]}),
        json!({"type":"integer","minimum":1,"maximum":2})
        => false; "enum value outside target range fails")]
    fn test_is_subschema_scenarios(s1: serde_json::Value, s2: serde_json::Value) -> bool {
        is_subschema(&s1, &s2).unwrap()
    }

    #[test]
    fn test_one_of_on_left_is_unsupported() {
        let s1 = json!({"oneOf": [{"type": "string"}, {"type": "integer"}]});
        let s2 = json!({"type": "string"});
        let err = is_subschema(&s1, &s2).unwrap_err();
        assert_eq!(err.error_code(), super::ErrorCode::Unsupported);
    }

    #[test]
    fn test_meet_round_trip_with_top() {
        let s = json!({"type": "integer", "minimum": 0});
        let result = meet(&s, &json!(true)).unwrap();
        assert_eq!(is_subschema(&result, &s).unwrap(), true);
        assert_eq!(is_subschema(&s, &result).unwrap(), true);
    }

    #[test]
    fn test_join_round_trip_with_bot() {
        let s = json!({"type": "boolean"});
        let result = join(&s, &json!(false)).unwrap();
        assert_eq!(is_subschema(&result, &s).unwrap(), true);
        assert_eq!(is_subschema(&s, &result).unwrap(), true);
    }

    #[test]
    fn test_is_uninhabited_empty_interval() {
        let s = json!({"type": "integer", "minimum": 10, "maximum": 0});
        assert_eq!(is_uninhabited(&s).unwrap(), true);
    }

    #[test]
    fn test_is_uninhabited_top_is_false() {
        assert_eq!(is_uninhabited(&json!(true)).unwrap(), false);
    }
}
