//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::traits::FetchError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("loading units failed: {0}")]
    Load(#[from] FetchError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("units not loaded")]
    NotLoaded,
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
