//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid listing {source_name}: {message}")]
    InvalidListing {
        source_name: String,
        message: String,
    },
}

impl ApplicationError {
    pub fn invalid_listing(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidListing {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
