//! Configuration knobs for the subschema decision procedure.

use serde::{Deserialize, Serialize};

/// How `oneOf` is treated when it appears on the right-hand side of `≤`.
///
/// `oneOf` on the *left* is always `Unsupported` (spec.md §9); on the right,
/// the canonicalizer dispatches on this value. Only one variant exists today
/// (the sound-but-incomplete `anyOf` over-approximation), named here so a
/// future stricter strategy has a place to plug in rather than a magic constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OneOfStrategy {
    /// Treat `oneOf` as `anyOf` (sound over-approximation of "exactly one").
    #[default]
    AnyOfOverApproximation,
}

/// Options controlling canonicalization and traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Maximum nesting depth walked while canonicalizing a schema. Guards against
    /// stack overflow on pathologically deep (but finite) schemas; see spec.md §5.
    pub max_depth: usize,
    /// Strategy used for `oneOf` on the right-hand side of `≤`.
    pub one_of_strategy: OneOfStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 256,
            one_of_strategy: OneOfStrategy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_depth, 256);
    }
}
