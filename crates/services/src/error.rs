//! Shared error types for the services crate.

use thiserror::Error;
use url::Url;

use quiz_core::model::BankError;

/// Failure to obtain a playable question bank. Every variant ends the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("question request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed question payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Session(#[from] quiz_core::Error),
    #[error("connection error: {0}")]
    Connection(String),
}

/// Failure to record results. Logged, never shown to the player.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsSubmitError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("connection error: {0}")]
    Connection(String),
}

/// Returned by `QuizLoopService::start` when the quiz cannot be played.
///
/// The player must be sent to `redirect_to`; nothing is retried.
#[derive(Debug, Error)]
#[error("quiz could not be loaded ({source}), redirecting to {redirect_to}")]
pub struct LoadFailure {
    pub redirect_to: Url,
    #[source]
    pub source: BankLoadError,
}

/// Errors emitted while moving a started session forward.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Core(#[from] quiz_core::Error),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid base url {raw:?}: {source}")]
    InvalidBaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base url {0} cannot carry endpoint paths")]
    NotABase(String),
}
