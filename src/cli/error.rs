//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::traits::FetchError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("cannot render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Output(_) => crate::exitcode::SOFTWARE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Picker { .. } => crate::exitcode::SOFTWARE,
                InfraError::Application(app) => match app {
                    ApplicationError::Load(FetchError::Io { .. }) => crate::exitcode::NOINPUT,
                    ApplicationError::Load(FetchError::Parse { .. }) => crate::exitcode::DATAERR,
                    ApplicationError::Load(FetchError::Unavailable { .. }) => {
                        crate::exitcode::UNAVAILABLE
                    }
                    ApplicationError::Config { .. } | ApplicationError::Domain(_) => {
                        crate::exitcode::CONFIG
                    }
                    ApplicationError::NotLoaded => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}
