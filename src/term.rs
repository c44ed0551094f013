//! The schema term model (spec.md §3): a tagged-variant representation of a
//! canonicalized JSON Schema, with a shared `enum` overlay (spec.md §9,
//! "Enum as overlay").

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::constants::WILDCARD_PATTERN;
use crate::interval::Interval;
use crate::uninhabited::is_uninhabited_kind;

/// `items` on an array term: either one schema applied to every position, or
/// an ordered per-position tuple (spec.md §3, "Tuple form (array)").
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Items {
    Single(Box<Schema>),
    Tuple(Vec<Schema>),
}

/// `additionalItems`/`additionalProperties`: ordered `false < schema < true`
/// per spec.md §4.3(f).
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Additional {
    Forbidden,
    Schema(Box<Schema>),
    Allowed,
}

impl Additional {
    pub(crate) fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden)
    }

    pub(crate) fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StringTerm {
    pub(crate) min_length: u64,
    pub(crate) max_length: Option<u64>,
    pub(crate) pattern: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NumericTerm {
    pub(crate) interval: Interval,
    pub(crate) multiple_of: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ArrayTerm {
    pub(crate) min_items: u64,
    pub(crate) max_items: Option<u64>,
    pub(crate) items: Items,
    pub(crate) additional_items: Additional,
    pub(crate) unique_items: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ObjectTerm {
    pub(crate) properties: BTreeMap<String, Schema>,
    pub(crate) pattern_properties: BTreeMap<String, Schema>,
    pub(crate) required: BTreeSet<String>,
    pub(crate) min_properties: u64,
    pub(crate) max_properties: Option<u64>,
    pub(crate) additional_properties: Additional,
}

/// The variant tag, without the shared `enum` overlay (spec.md §3 table).
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Kind {
    Top,
    Bot,
    String(StringTerm),
    Integer(NumericTerm),
    Number(NumericTerm),
    Boolean,
    Null,
    Array(ArrayTerm),
    Object(ObjectTerm),
    /// Flat: no branch is itself `AnyOf` (spec.md §3 invariant).
    AnyOf(Vec<Schema>),
}

/// A schema term: a [`Kind`] plus the shared `enum` overlay (spec.md §9).
///
/// Construction always goes through [`Schema::new`] or one of the
/// convenience constructors below, which enforce spec.md §3's invariants and
/// collapse the result to [`Schema::bot`] when [`crate::uninhabited`]
/// determines the term denotes the empty set.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Schema {
    pub(crate) kind: Kind,
    pub(crate) enum_values: Option<Vec<Value>>,
}

impl Schema {
    pub(crate) fn top() -> Self {
        Self {
            kind: Kind::Top,
            enum_values: None,
        }
    }

    pub(crate) fn bot() -> Self {
        Self {
            kind: Kind::Bot,
            enum_values: None,
        }
    }

    pub(crate) fn is_top(&self) -> bool {
        matches!(self.kind, Kind::Top) && self.enum_values.is_none()
    }

    pub(crate) fn is_bot(&self) -> bool {
        matches!(self.kind, Kind::Bot)
    }

    /// Wraps `kind` with an optional enum, checks invariants, and collapses
    /// to `Bot` if the result is uninhabited (spec.md §3 lifecycle).
    pub(crate) fn new(kind: Kind, enum_values: Option<Vec<Value>>) -> Self {
        let enum_values = enum_values.filter(|v| !v.is_empty());
        let schema = Self { kind, enum_values };
        if is_uninhabited_kind(&schema) {
            Self::bot()
        } else {
            schema
        }
    }

    /// `min_length > max_length` is not rejected here; it collapses to
    /// `Bot` via the uninhabitedness check invoked by [`Schema::new`],
    /// matching spec.md §3's "empty length interval" treatment.
    pub(crate) fn string(min_length: u64, max_length: Option<u64>, pattern: impl Into<String>) -> Self {
        Self::new(
            Kind::String(StringTerm {
                min_length,
                max_length,
                pattern: pattern.into(),
            }),
            None,
        )
    }

    pub(crate) fn string_wildcard() -> Self {
        Self::string(0, None, WILDCARD_PATTERN)
    }

    pub(crate) fn numeric_integer(interval: Interval, multiple_of: Option<f64>) -> Self {
        Self::new(Kind::Integer(NumericTerm { interval, multiple_of }), None)
    }

    pub(crate) fn numeric_number(interval: Interval, multiple_of: Option<f64>) -> Self {
        Self::new(Kind::Number(NumericTerm { interval, multiple_of }), None)
    }

    pub(crate) fn boolean() -> Self {
        Self::new(Kind::Boolean, None)
    }

    pub(crate) fn null() -> Self {
        Self::new(Kind::Null, None)
    }

    pub(crate) fn array(array: ArrayTerm) -> Self {
        Self::new(Kind::Array(array), None)
    }

    pub(crate) fn object(object: ObjectTerm) -> Self {
        Self::new(Kind::Object(object), None)
    }

    /// Flattens nested `AnyOf` branches and drops uninhabited ones (spec.md
    /// §3 invariant + §4.4's "uninhabited branches are dropped").
    pub(crate) fn any_of(branches: Vec<Schema>) -> Self {
        let mut flat = Vec::with_capacity(branches.len());
        for branch in branches {
            if branch.is_bot() {
                continue;
            }
            match branch.kind {
                Kind::AnyOf(inner) => flat.extend(inner),
                _ => flat.push(branch),
            }
        }
        let mut deduped: Vec<Schema> = Vec::with_capacity(flat.len());
        for schema in flat {
            if !deduped.contains(&schema) {
                deduped.push(schema);
            }
        }
        let flat = deduped;
        match flat.len() {
            0 => Self::bot(),
            1 => flat.into_iter().next().unwrap(),
            _ => Self {
                kind: Kind::AnyOf(flat),
                enum_values: None,
            },
        }
    }

    pub(crate) fn with_enum(mut self, values: Vec<Value>) -> Self {
        let filtered = crate::enum_overlay::restrict(&self, &values);
        if filtered.is_empty() {
            return Self::bot();
        }
        self.enum_values = Some(filtered);
        if is_uninhabited_kind(&self) {
            Self::bot()
        } else {
            self
        }
    }

    /// Converts a term back into a JSON Schema document. This is a
    /// best-effort re-serialization (the numeric/string/array/object shapes
    /// are reconstructed directly; `AnyOf` becomes `anyOf`) used by the
    /// public facade's `meet`/`join` results.
    pub(crate) fn into_json(self) -> Value {
        use serde_json::{json, Map};

        let mut obj = match self.kind {
            Kind::Top => return Value::Bool(true),
            Kind::Bot => return Value::Bool(false),
            Kind::Boolean => json!({"type": "boolean"}),
            Kind::Null => json!({"type": "null"}),
            Kind::String(term) => {
                let mut m = Map::new();
                m.insert("type".into(), json!("string"));
                if term.min_length > 0 {
                    m.insert("minLength".into(), json!(term.min_length));
                }
                if let Some(max) = term.max_length {
                    m.insert("maxLength".into(), json!(max));
                }
                if !crate::regex_algebra::is_wildcard(&term.pattern) {
                    m.insert("pattern".into(), json!(term.pattern));
                }
                Value::Object(m)
            }
            Kind::Integer(term) => numeric_to_json("integer", term),
            Kind::Number(term) => numeric_to_json("number", term),
            Kind::Array(term) => array_to_json(term),
            Kind::Object(term) => object_to_json(term),
            Kind::AnyOf(branches) => {
                json!({"anyOf": branches.into_iter().map(Schema::into_json).collect::<Vec<_>>()})
            }
        };

        if let Some(values) = self.enum_values {
            if let Value::Object(ref mut m) = obj {
                m.insert("enum".into(), Value::Array(values));
            }
        }
        obj
    }
}

fn numeric_to_json(type_name: &str, term: NumericTerm) -> Value {
    use serde_json::{json, Map};
    let mut m = Map::new();
    m.insert("type".into(), json!(type_name));
    match term.interval.lo {
        crate::interval::Bound::Finite(v) => {
            if term.interval.lo_exclusive {
                m.insert("exclusiveMinimum".into(), json!(true));
            }
            m.insert("minimum".into(), json!(v));
        }
        _ => {}
    }
    match term.interval.hi {
        crate::interval::Bound::Finite(v) => {
            if term.interval.hi_exclusive {
                m.insert("exclusiveMaximum".into(), json!(true));
            }
            m.insert("maximum".into(), json!(v));
        }
        _ => {}
    }
    if let Some(multiple) = term.multiple_of {
        m.insert("multipleOf".into(), json!(multiple));
    }
    Value::Object(m)
}

fn array_to_json(term: ArrayTerm) -> Value {
    use serde_json::{json, Map};
    let mut m = Map::new();
    m.insert("type".into(), json!("array"));
    if term.min_items > 0 {
        m.insert("minItems".into(), json!(term.min_items));
    }
    if let Some(max) = term.max_items {
        m.insert("maxItems".into(), json!(max));
    }
    if term.unique_items {
        m.insert("uniqueItems".into(), json!(true));
    }
    match term.items {
        Items::Single(schema) => {
            m.insert("items".into(), schema.into_json());
        }
        Items::Tuple(schemas) => {
            m.insert(
                "items".into(),
                Value::Array(schemas.into_iter().map(Schema::into_json).collect()),
            );
            match term.additional_items {
                Additional::Forbidden => {
                    m.insert("additionalItems".into(), json!(false));
                }
                Additional::Schema(s) => {
                    m.insert("additionalItems".into(), s.into_json());
                }
                Additional::Allowed => {}
            }
        }
    }
    Value::Object(m)
}

fn object_to_json(term: ObjectTerm) -> Value {
    use serde_json::{json, Map};
    let mut m = Map::new();
    m.insert("type".into(), json!("object"));
    if !term.properties.is_empty() {
        let props: Map<String, Value> = term
            .properties
            .into_iter()
            .map(|(k, v)| (k, v.into_json()))
            .collect();
        m.insert("properties".into(), Value::Object(props));
    }
    if !term.pattern_properties.is_empty() {
        let props: Map<String, Value> = term
            .pattern_properties
            .into_iter()
            .map(|(k, v)| (k, v.into_json()))
            .collect();
        m.insert("patternProperties".into(), Value::Object(props));
    }
    if !term.required.is_empty() {
        m.insert("required".into(), json!(term.required.into_iter().collect::<Vec<_>>()));
    }
    if term.min_properties > 0 {
        m.insert("minProperties".into(), json!(term.min_properties));
    }
    if let Some(max) = term.max_properties {
        m.insert("maxProperties".into(), json!(max));
    }
    match term.additional_properties {
        Additional::Forbidden => {
            m.insert("additionalProperties".into(), json!(false));
        }
        Additional::Schema(s) => {
            m.insert("additionalProperties".into(), s.into_json());
        }
        Additional::Allowed => {}
    }
    Value::Object(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;

    #[test]
    fn test_string_empty_interval_collapses_to_bot() {
        let schema = Schema::string(10, Some(5), "^.*$");
        assert!(schema.is_bot());
    }

    #[test]
    fn test_string_wildcard_is_not_bot() {
        assert!(!Schema::string_wildcard().is_bot());
    }

    #[test]
    fn test_any_of_flattens_nested() {
        let inner = Schema::any_of(vec![Schema::boolean(), Schema::null()]);
        let outer = Schema::any_of(vec![inner, Schema::numeric_integer(Interval::everything(), None)]);
        match outer.kind {
            Kind::AnyOf(branches) => assert_eq!(branches.len(), 3),
            other => panic!("expected AnyOf, got {other:?}"),
        }
    }

    #[test]
    fn test_any_of_single_branch_unwraps() {
        let schema = Schema::any_of(vec![Schema::boolean()]);
        assert_eq!(schema, Schema::boolean());
    }

    #[test]
    fn test_any_of_all_bot_collapses() {
        let schema = Schema::any_of(vec![Schema::bot(), Schema::bot()]);
        assert!(schema.is_bot());
    }

    #[test]
    fn test_top_is_top() {
        assert!(Schema::top().is_top());
    }
}
