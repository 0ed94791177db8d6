//! Shared error types for the services crate.

use thiserror::Error;

use storage::sqlite::SqliteInitError;

use crate::sessions::SessionPhaseKind;

/// Failures talking to the exam backend.
///
/// A 404 on a question body is not an error; it is reported as `Ok(None)`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("backend returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("could not decode backend response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status)
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Errors emitted by the review session controller.
///
/// These describe actions that are not valid in the current phase; the
/// session state is left untouched when one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhaseKind,
    },
    #[error("answer already submitted; selection is frozen")]
    SelectionFrozen,
    #[error("no answer selected")]
    NoSelection,
    #[error("choice {index} is out of range for a question with {len} choices")]
    ChoiceOutOfRange { index: usize, len: usize },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
