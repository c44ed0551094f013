use serde_json::Value;
use std::convert::TryFrom;

/// The 7 primitive types recognized by JSON Schema draft-4.
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

/// All 7 primitive types, in a stable order.
pub(crate) const ALL: [PrimitiveType; 7] = [
    PrimitiveType::Array,
    PrimitiveType::Boolean,
    PrimitiveType::Integer,
    PrimitiveType::Null,
    PrimitiveType::Number,
    PrimitiveType::Object,
    PrimitiveType::String,
];

impl TryFrom<&str> for PrimitiveType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "array" => Ok(Self::Array),
            "boolean" => Ok(Self::Boolean),
            "integer" => Ok(Self::Integer),
            "null" => Ok(Self::Null),
            "number" => Ok(Self::Number),
            "object" => Ok(Self::Object),
            "string" => Ok(Self::String),
            _ => Err(format!(r#""{}" is not a recognized primitive type"#, value)),
        }
    }
}

impl TryFrom<&Value> for PrimitiveType {
    type Error = String;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        if let Some(value_str) = value.as_str() {
            Self::try_from(value_str)
        } else {
            Err(format!("Expected Value::String(...), found {:?}", value))
        }
    }
}

impl ToString for PrimitiveType {
    fn to_string(&self) -> String {
        match self {
            Self::Array => "array".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Integer => "integer".to_string(),
            Self::Null => "null".to_string(),
            Self::Number => "number".to_string(),
            Self::Object => "object".to_string(),
            Self::String => "string".to_string(),
        }
    }
}

impl PrimitiveType {
    /// `true` iff `self` is `Integer` and `other` is `Number` (integer is a subtype of number).
    #[inline]
    pub(crate) fn is_integer_and(self, other: Self) -> bool {
        self == Self::Integer && other == Self::Number
    }
}

#[cfg(test)]
mod tests {
    use super::{PrimitiveType, ALL};
    use serde_json::{json, Value};
    use std::convert::TryFrom;
    use test_case::test_case;

    #[test_case("array" => Ok(PrimitiveType::Array))]
    #[test_case("boolean" => Ok(PrimitiveType::Boolean))]
    #[test_case("integer" => Ok(PrimitiveType::Integer))]
    #[test_case("null" => Ok(PrimitiveType::Null))]
    #[test_case("number" => Ok(PrimitiveType::Number))]
    #[test_case("object" => Ok(PrimitiveType::Object))]
    #[test_case("string" => Ok(PrimitiveType::String))]
    #[test_case("something" => Err(r#""something" is not a recognized primitive type"#.to_string()))]
    fn test_from_str_to_primitive_type(value: &str) -> Result<PrimitiveType, String> {
        PrimitiveType::try_from(value)
    }

    #[test_case(&json!("string") => Ok(PrimitiveType::String))]
    #[test_case(&json!(1) => Err("Expected Value::String(...), found Number(1)".to_string()))]
    fn test_try_from_value(value: &Value) -> Result<PrimitiveType, String> {
        PrimitiveType::try_from(value)
    }

    #[test_case(PrimitiveType::Integer, PrimitiveType::Number => true)]
    #[test_case(PrimitiveType::Number, PrimitiveType::Integer => false)]
    #[test_case(PrimitiveType::Integer, PrimitiveType::Integer => false)]
    fn test_is_integer_and(a: PrimitiveType, b: PrimitiveType) -> bool {
        a.is_integer_and(b)
    }

    #[test]
    fn test_all_has_seven_entries() {
        assert_eq!(ALL.len(), 7);
    }
}
