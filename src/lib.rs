pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod session;
pub mod ui;
pub mod views;

#[cfg(test)]
pub(crate) mod test_support;

use api::{ApiError, ErrorKind};
use session::SessionError;

/// Errors surfaced by the view models.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// API error kind, when the failure came from a request.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Api(e) => Some(e.kind()),
            Error::Session(_) | Error::InvalidInput(_) => None,
        }
    }

    pub fn user_message(&self) -> &'static str {
        api::GENERIC_ERROR_MESSAGE
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
