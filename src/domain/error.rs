//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid domain data handed to the core.
///
/// Tree, search and selection operations never fail; only compiling an
/// organization chart can.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid rank rule '{pattern}': {reason}")]
    InvalidRankRule { pattern: String, reason: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
