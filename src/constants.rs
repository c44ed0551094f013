use std::collections::HashSet;

lazy_static::lazy_static! {
    /// Keywords recognized by the canonicalizer (spec.md §6). Any other JSON Schema
    /// keyword present on an input document is ignored, not rejected.
    pub(crate) static ref RECOGNIZED_KEYWORDS: HashSet<&'static str> = [
        "type",
        "enum",
        "minimum",
        "maximum",
        "exclusiveMinimum",
        "exclusiveMaximum",
        "multipleOf",
        "minLength",
        "maxLength",
        "pattern",
        "minItems",
        "maxItems",
        "uniqueItems",
        "items",
        "additionalItems",
        "minProperties",
        "maxProperties",
        "required",
        "properties",
        "patternProperties",
        "additionalProperties",
        "allOf",
        "anyOf",
        "oneOf",
        "not",
    ]
    .iter()
    .copied()
    .collect();
}

/// The default, maximally-permissive anchored string pattern: matches every string.
pub(crate) const WILDCARD_PATTERN: &str = "^.*$";

#[cfg(test)]
mod tests {
    use super::RECOGNIZED_KEYWORDS;

    #[test]
    fn test_recognized_keywords_contains_type() {
        assert!(RECOGNIZED_KEYWORDS.contains("type"));
    }

    #[test]
    fn test_recognized_keywords_does_not_contain_format() {
        assert!(!RECOGNIZED_KEYWORDS.contains("format"));
    }
}
