//! Errors raised outside the selector session: filesystem writes and the picker.

use thiserror::Error;

use crate::application::ApplicationError;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Filesystem failure while writing CLI artifacts (config template).
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The interactive picker could not run; cancelling is not an error.
    #[error("picker failed: {message}")]
    Picker { message: String },
}

impl InfraError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn picker(message: impl Into<String>) -> Self {
        Self::Picker {
            message: message.into(),
        }
    }
}

pub type InfraResult<T> = Result<T, InfraError>;
