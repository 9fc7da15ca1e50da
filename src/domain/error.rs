//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid input at the edges of the core.
///
/// Parsing ambiguity, unknown courses and cycles are not errors; they
/// degrade to notes, dropped words or childless leaves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("not a course code: {0:?}")]
    InvalidCourseCode(String),

    #[error("invalid course record {code:?}: {reason}")]
    InvalidRecord { code: String, reason: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
