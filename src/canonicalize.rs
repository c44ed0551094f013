//! Canonicalization (spec.md §4.1): turns raw `serde_json::Value` input into
//! a [`crate::term::Schema`], folding `allOf` via meet, flattening `anyOf`,
//! and rewriting the restricted form of `not` into an `anyOf`.

use std::convert::TryFrom;

use serde_json::{Map, Value};

use crate::config::{Config, OneOfStrategy};
use crate::error::SubschemaError;
use crate::interval::Interval;
use crate::meet::meet;
use crate::primitive_type::{PrimitiveType, ALL};
use crate::regex_algebra::complement_pattern;
use crate::term::{Additional, ArrayTerm, Items, ObjectTerm, Schema};

/// Which operand of `≤`/`meet` a schema is being canonicalized as.
/// `oneOf` is unsupported on the left (spec.md §9) but a sound `anyOf`
/// over-approximation on the right (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// Canonicalizes `value` at the document root (empty path breadcrumb).
pub(crate) fn canonicalize(value: &Value, side: Side, config: &Config) -> Result<Schema, SubschemaError> {
    canonicalize_at(value, "#", side, config, 0)
}

fn canonicalize_at(
    value: &Value,
    path: &str,
    side: Side,
    config: &Config,
    depth: usize,
) -> Result<Schema, SubschemaError> {
    if depth > config.max_depth {
        return Err(SubschemaError::Internal {
            message: format!("recursion depth exceeded at {path}"),
        });
    }
    match value {
        Value::Bool(true) => Ok(Schema::top()),
        Value::Bool(false) => Ok(Schema::bot()),
        Value::Object(obj) => canonicalize_object(obj, path, side, config, depth),
        other => Err(SubschemaError::invalid(
            path,
            format!("expected a schema object or boolean, found {other}"),
        )),
    }
}

fn canonicalize_object(
    obj: &Map<String, Value>,
    path: &str,
    side: Side,
    config: &Config,
    depth: usize,
) -> Result<Schema, SubschemaError> {
    if obj.is_empty() {
        return Ok(Schema::top());
    }

    if let Some(not_value) = obj.get("not") {
        if obj.len() == 1 {
            return canonicalize_not(not_value, path, side, config, depth);
        }
    }

    if let Some(Value::Array(branches)) = obj.get("allOf") {
        let mut acc = Schema::top();
        for (i, branch) in branches.iter().enumerate() {
            let sub_path = format!("{path}/allOf/{i}");
            let branch_schema = canonicalize_at(branch, &sub_path, side, config, depth + 1)?;
            acc = meet(&acc, &branch_schema);
        }
        return Ok(apply_enum(acc, obj, path)?);
    }

    if let Some(Value::Array(branches)) = obj.get("anyOf") {
        let mut flat = Vec::with_capacity(branches.len());
        for (i, branch) in branches.iter().enumerate() {
            let sub_path = format!("{path}/anyOf/{i}");
            flat.push(canonicalize_at(branch, &sub_path, side, config, depth + 1)?);
        }
        return Ok(apply_enum(Schema::any_of(flat), obj, path)?);
    }

    if let Some(Value::Array(branches)) = obj.get("oneOf") {
        match side {
            Side::Left => {
                return Err(SubschemaError::unsupported("oneOf", path));
            }
            Side::Right => match config.one_of_strategy {
                OneOfStrategy::AnyOfOverApproximation => {
                    let mut flat = Vec::with_capacity(branches.len());
                    for (i, branch) in branches.iter().enumerate() {
                        let sub_path = format!("{path}/oneOf/{i}");
                        flat.push(canonicalize_at(branch, &sub_path, side, config, depth + 1)?);
                    }
                    return Ok(apply_enum(Schema::any_of(flat), obj, path)?);
                }
            },
        }
    }

    let Some(type_value) = obj.get("type") else {
        // No explicit "type": the distilled spec only describes "true"/"false"/
        // "not":{} for type-less schemas. Beyond that, treat it as Top with the
        // enum overlay applied, matching the original Python source's reliance
        // on an explicit "type" keyword to dispatch to a constructor (see
        // DESIGN.md).
        return apply_enum(Schema::top(), obj, path);
    };

    match type_value {
        Value::String(_) => {
            let ty = PrimitiveType::try_from(type_value).map_err(|e| SubschemaError::invalid(path, e))?;
            let schema = build_primitive(ty, obj, path, side, config, depth)?;
            apply_enum(schema, obj, path)
        }
        Value::Array(types) => {
            let mut branches = Vec::with_capacity(types.len());
            for t in types {
                let ty = PrimitiveType::try_from(t).map_err(|e| SubschemaError::invalid(path, e))?;
                branches.push(build_primitive(ty, obj, path, side, config, depth)?);
            }
            apply_enum(Schema::any_of(branches), obj, path)
        }
        other => Err(SubschemaError::invalid(path, format!("invalid \"type\": {other}"))),
    }
}

fn apply_enum(schema: Schema, obj: &Map<String, Value>, path: &str) -> Result<Schema, SubschemaError> {
    match obj.get("enum") {
        Some(Value::Array(values)) => Ok(schema.with_enum(values.clone())),
        Some(other) => Err(SubschemaError::invalid(path, format!("\"enum\" must be an array, found {other}"))),
        None => Ok(schema),
    }
}

fn build_primitive(
    ty: PrimitiveType,
    obj: &Map<String, Value>,
    path: &str,
    side: Side,
    config: &Config,
    depth: usize,
) -> Result<Schema, SubschemaError> {
    match ty {
        PrimitiveType::Boolean => Ok(Schema::boolean()),
        PrimitiveType::Null => Ok(Schema::null()),
        PrimitiveType::String => build_string(obj, path),
        PrimitiveType::Integer => build_numeric(obj, path, true),
        PrimitiveType::Number => build_numeric(obj, path, false),
        PrimitiveType::Array => build_array(obj, path, side, config, depth),
        PrimitiveType::Object => build_object(obj, path, side, config, depth),
    }
}

fn as_u64(value: Option<&Value>, path: &str, field: &str) -> Result<Option<u64>, SubschemaError> {
    match value {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| SubschemaError::invalid(path, format!("\"{field}\" must be a non-negative integer"))),
    }
}

fn build_string(obj: &Map<String, Value>, path: &str) -> Result<Schema, SubschemaError> {
    let min_length = as_u64(obj.get("minLength"), path, "minLength")?.unwrap_or(0);
    let max_length = as_u64(obj.get("maxLength"), path, "maxLength")?;
    let pattern = match obj.get("pattern") {
        Some(Value::String(p)) => p.clone(),
        Some(other) => return Err(SubschemaError::invalid(path, format!("\"pattern\" must be a string, found {other}"))),
        None => crate::constants::WILDCARD_PATTERN.to_string(),
    };
    Ok(Schema::string(min_length, max_length, pattern))
}

fn build_numeric(obj: &Map<String, Value>, path: &str, integer: bool) -> Result<Schema, SubschemaError> {
    let minimum = obj.get("minimum").and_then(Value::as_f64);
    let maximum = obj.get("maximum").and_then(Value::as_f64);
    let exclusive_min = obj.get("exclusiveMinimum").and_then(Value::as_bool).unwrap_or(false);
    let exclusive_max = obj.get("exclusiveMaximum").and_then(Value::as_bool).unwrap_or(false);
    let multiple_of = match obj.get("multipleOf") {
        Some(v) => Some(
            v.as_f64()
                .ok_or_else(|| SubschemaError::invalid(path, "\"multipleOf\" must be a number"))?,
        ),
        None => None,
    };

    let mut interval = Interval::everything();
    if let Some(min) = minimum {
        interval.lo = crate::interval::Bound::Finite(min);
        interval.lo_exclusive = exclusive_min;
    }
    if let Some(max) = maximum {
        interval.hi = crate::interval::Bound::Finite(max);
        interval.hi_exclusive = exclusive_max;
    }

    // Integer terms coerce exclusive bounds to ±1 inclusive form (spec.md §3).
    if integer {
        if let (crate::interval::Bound::Finite(min), true) = (interval.lo, interval.lo_exclusive) {
            interval.lo = crate::interval::Bound::Finite(min.floor() + 1.0);
            interval.lo_exclusive = false;
        }
        if let (crate::interval::Bound::Finite(max), true) = (interval.hi, interval.hi_exclusive) {
            interval.hi = crate::interval::Bound::Finite(max.ceil() - 1.0);
            interval.hi_exclusive = false;
        }
        Ok(Schema::numeric_integer(interval, multiple_of))
    } else {
        Ok(Schema::numeric_number(interval, multiple_of))
    }
}

fn build_array(
    obj: &Map<String, Value>,
    path: &str,
    side: Side,
    config: &Config,
    depth: usize,
) -> Result<Schema, SubschemaError> {
    let min_items = as_u64(obj.get("minItems"), path, "minItems")?.unwrap_or(0);
    let max_items = as_u64(obj.get("maxItems"), path, "maxItems")?;
    let unique_items = obj.get("uniqueItems").and_then(Value::as_bool).unwrap_or(false);

    let items = match obj.get("items") {
        None => Items::Single(Box::new(Schema::top())),
        Some(Value::Array(list)) => {
            let mut schemas = Vec::with_capacity(list.len());
            for (i, item) in list.iter().enumerate() {
                let sub_path = format!("{path}/items/{i}");
                schemas.push(canonicalize_at(item, &sub_path, side, config, depth + 1)?);
            }
            Items::Tuple(schemas)
        }
        Some(single) => {
            let sub_path = format!("{path}/items");
            Items::Single(Box::new(canonicalize_at(single, &sub_path, side, config, depth + 1)?))
        }
    };

    let additional_items = match obj.get("additionalItems") {
        None => Additional::Allowed,
        Some(Value::Bool(true)) => Additional::Allowed,
        Some(Value::Bool(false)) => Additional::Forbidden,
        Some(schema_value) => {
            let sub_path = format!("{path}/additionalItems");
            Additional::Schema(Box::new(canonicalize_at(schema_value, &sub_path, side, config, depth + 1)?))
        }
    };

    Ok(Schema::array(ArrayTerm {
        min_items,
        max_items,
        items,
        additional_items,
        unique_items,
    }))
}

fn build_object(
    obj: &Map<String, Value>,
    path: &str,
    side: Side,
    config: &Config,
    depth: usize,
) -> Result<Schema, SubschemaError> {
    let min_properties = as_u64(obj.get("minProperties"), path, "minProperties")?.unwrap_or(0);
    let max_properties = as_u64(obj.get("maxProperties"), path, "maxProperties")?;

    let required = match obj.get("required") {
        Some(Value::Array(names)) => names
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| SubschemaError::invalid(path, "\"required\" entries must be strings"))
            })
            .collect::<Result<_, _>>()?,
        _ => Default::default(),
    };

    let properties = match obj.get("properties") {
        Some(Value::Object(map)) => {
            let mut out = std::collections::BTreeMap::new();
            for (key, schema_value) in map {
                let sub_path = format!("{path}/properties/{key}");
                out.insert(key.clone(), canonicalize_at(schema_value, &sub_path, side, config, depth + 1)?);
            }
            out
        }
        _ => Default::default(),
    };

    let pattern_properties = match obj.get("patternProperties") {
        Some(Value::Object(map)) => {
            let mut out = std::collections::BTreeMap::new();
            for (pattern, schema_value) in map {
                let sub_path = format!("{path}/patternProperties/{pattern}");
                out.insert(pattern.clone(), canonicalize_at(schema_value, &sub_path, side, config, depth + 1)?);
            }
            out
        }
        _ => Default::default(),
    };

    let additional_properties = match obj.get("additionalProperties") {
        None => Additional::Allowed,
        Some(Value::Bool(true)) => Additional::Allowed,
        Some(Value::Bool(false)) => Additional::Forbidden,
        Some(schema_value) => {
            let sub_path = format!("{path}/additionalProperties");
            Additional::Schema(Box::new(canonicalize_at(schema_value, &sub_path, side, config, depth + 1)?))
        }
    };

    Ok(Schema::object(ObjectTerm {
        properties,
        pattern_properties,
        required,
        min_properties,
        max_properties,
        additional_properties,
    }))
}

/// `{"not": S}`: supported only when `S` has a single primitive `type`
/// (spec.md §4.1). Anything else is `Unsupported`.
fn canonicalize_not(
    not_value: &Value,
    path: &str,
    side: Side,
    config: &Config,
    depth: usize,
) -> Result<Schema, SubschemaError> {
    if let Value::Object(inner) = not_value {
        if inner.is_empty() {
            return Ok(Schema::bot());
        }
        if let Some(Value::String(type_str)) = inner.get("type") {
            let ty = PrimitiveType::try_from(type_str.as_str()).map_err(|e| SubschemaError::invalid(path, e))?;
            let sub_path = format!("{path}/not");
            let inner_schema = build_primitive(ty, inner, &sub_path, side, config, depth + 1)?;
            let mut branches: Vec<Schema> = ALL
                .iter()
                .copied()
                .filter(|&t| t != ty)
                .map(default_term_for)
                .collect();
            if let Some(complement) = type_specific_complement(ty, &inner_schema) {
                branches.push(complement);
            }
            return Ok(Schema::any_of(branches));
        }
    }
    Err(SubschemaError::unsupported("not", path))
}

fn default_term_for(ty: PrimitiveType) -> Schema {
    match ty {
        PrimitiveType::Array => Schema::array(ArrayTerm {
            min_items: 0,
            max_items: None,
            items: Items::Single(Box::new(Schema::top())),
            additional_items: Additional::Allowed,
            unique_items: false,
        }),
        PrimitiveType::Boolean => Schema::boolean(),
        PrimitiveType::Integer => Schema::numeric_integer(Interval::everything(), None),
        PrimitiveType::Null => Schema::null(),
        PrimitiveType::Number => Schema::numeric_number(Interval::everything(), None),
        PrimitiveType::Object => Schema::object(ObjectTerm {
            properties: Default::default(),
            pattern_properties: Default::default(),
            required: Default::default(),
            min_properties: 0,
            max_properties: None,
            additional_properties: Additional::Allowed,
        }),
        PrimitiveType::String => Schema::string_wildcard(),
    }
}

/// Type-specific complement used by `not` (spec.md §4.3): only strings are
/// defined; every other primitive's complement remains an open question and
/// is intentionally omitted here rather than guessed.
fn type_specific_complement(ty: PrimitiveType, schema: &Schema) -> Option<Schema> {
    match (ty, &schema.kind) {
        (PrimitiveType::String, crate::term::Kind::String(term)) => {
            let mut branches = Vec::new();
            if term.min_length > 0 {
                branches.push(Schema::string(0, Some(term.min_length - 1), crate::constants::WILDCARD_PATTERN));
            }
            if let Some(max) = term.max_length {
                branches.push(Schema::string(max + 1, None, crate::constants::WILDCARD_PATTERN));
            }
            if !crate::regex_algebra::is_wildcard(&term.pattern) {
                branches.push(Schema::string(0, None, complement_pattern(&term.pattern)));
            }
            Some(Schema::any_of(branches))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{canonicalize, Side};
    use crate::config::Config;
    use serde_json::json;

    #[test]
    fn test_true_is_top() {
        let schema = canonicalize(&json!(true), Side::Left, &Config::default()).unwrap();
        assert!(schema.is_top());
    }

    #[test]
    fn test_false_is_bot() {
        let schema = canonicalize(&json!(false), Side::Left, &Config::default()).unwrap();
        assert!(schema.is_bot());
    }

    #[test]
    fn test_one_of_unsupported_on_left() {
        let value = json!({"oneOf": [{"type": "string"}, {"type": "integer"}]});
        let result = canonicalize(&value, Side::Left, &Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_one_of_allowed_on_right() {
        let value = json!({"oneOf": [{"type": "string"}, {"type": "integer"}]});
        let result = canonicalize(&value, Side::Right, &Config::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_not_empty_object_is_bot() {
        let value = json!({"not": {}});
        let schema = canonicalize(&value, Side::Left, &Config::default()).unwrap();
        assert!(schema.is_bot());
    }

    #[test]
    fn test_all_of_folds_via_meet() {
        let value = json!({
            "allOf": [
                {"type": "integer", "minimum": 0},
                {"type": "integer", "maximum": 10}
            ]
        });
        let schema = canonicalize(&value, Side::Left, &Config::default()).unwrap();
        assert!(!schema.is_bot());
    }
}
