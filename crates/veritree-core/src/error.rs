use crate::value::FieldKind;
use thiserror::Error as ThisError;

///
/// Error
///
/// Engine faults surfaced synchronously to the caller. Domain diagnostics
/// (stored `Message`s) are caller-owned state, never faults; idempotent
/// no-ops (duplicate code, re-attach, re-declare, removal of an unknown
/// field or code) are not errors either.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("property \"{0}\" not found")]
    PropertyNotFound(String),

    #[error("type mismatch for property \"{name}\": {expected} cannot hold {actual}")]
    TypeMismatch {
        name: String,
        expected: FieldKind,
        actual: String,
    },
}

impl Error {
    /// Shorthand for a `PropertyNotFound` fault on `name`.
    pub(crate) fn not_found(name: &str) -> Self {
        Self::PropertyNotFound(name.to_string())
    }

    /// Shorthand for a `TypeMismatch` fault on `name`.
    pub(crate) fn mismatch(name: &str, expected: &FieldKind, actual: &crate::value::Value) -> Self {
        Self::TypeMismatch {
            name: name.to_string(),
            expected: expected.clone(),
            actual: actual.kind_name().to_string(),
        }
    }
}
