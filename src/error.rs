//! Error types surfaced by schema canonicalization and the public facade.
//!
//! Algebra operations on already-constructed [`crate::term::Schema`] values
//! (`meet`, `join`, `is_uninhabited`) are total and never fail — only turning
//! a raw [`serde_json::Value`] into a `Schema` (canonicalization) can fail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine-readable error codes, independent of `Display` wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// The input document does not describe a valid JSON Schema shape this crate understands.
    InvalidInput,
    /// A recognized-but-unsupported construct was used (`oneOf` on the left of `≤`, general `not`).
    Unsupported,
    /// An internal invariant was violated; this is a bug, not a user error.
    Internal,
}

/// Errors produced while deciding the subschema relation.
#[derive(Debug, Error)]
pub enum SubschemaError {
    /// `path` is a best-effort JSON-Pointer-like breadcrumb to the offending subschema.
    #[error("invalid schema at {path}: {message}")]
    InvalidInput { path: String, message: String },

    /// Raised instead of guessing: `oneOf` on the left of `≤`, or `not` over anything
    /// other than a single primitive `type`, per spec.
    #[error("unsupported construct `{construct}` at {path}")]
    Unsupported { construct: String, path: String },

    /// An algebra operation produced a term that violates its own invariants.
    #[error("internal inconsistency: {message}")]
    Internal { message: String },
}

impl SubschemaError {
    /// The stable [`ErrorCode`] for this error, for embedding in structured logs or FFI.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::Unsupported { .. } => ErrorCode::Unsupported,
            Self::Internal { .. } => ErrorCode::Internal,
        }
    }

    pub(crate) fn unsupported(construct: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Unsupported {
            construct: construct.into(),
            path: path.into(),
        }
    }

    pub(crate) fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, SubschemaError};
    use test_case::test_case;

    #[test_case(SubschemaError::invalid("#/foo", "bad") => ErrorCode::InvalidInput)]
    #[test_case(SubschemaError::unsupported("oneOf", "#") => ErrorCode::Unsupported)]
    #[test_case(SubschemaError::Internal { message: "x".into() } => ErrorCode::Internal)]
    fn test_error_code(err: SubschemaError) -> ErrorCode {
        err.error_code()
    }
}
