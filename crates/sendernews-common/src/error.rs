//! Error types for SenderNews

use thiserror::Error;

/// Main error type for SenderNews
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unexpected Sender.net API response: HTTP {status}")]
    Api { status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Credential error: {0}")]
    Crypto(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Option store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for SenderNews
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the HTTP status code the host should report for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config(_) => 500,
            Error::Auth(_) => 401,
            Error::Api { .. } => 502,
            Error::Transport(_) => 504,
            Error::Crypto(_) => 500,
            Error::Validation(_) => 422,
            Error::Store(_) => 500,
            Error::Internal(_) => 500,
            Error::Other(_) => 500,
        }
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::Auth(_) => "UNAUTHORIZED",
            Error::Api { .. } => "UPSTREAM_ERROR",
            Error::Transport(_) => "UPSTREAM_UNREACHABLE",
            Error::Crypto(_) => "CREDENTIAL_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Store(_) => "STORE_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the message is meant to be shown to the site administrator
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Auth(_) | Error::Validation(_))
    }
}
