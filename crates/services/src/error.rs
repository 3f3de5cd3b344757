//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::QuizError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while fetching a resource.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("failed to fetch {path} ({status})")]
    HttpStatus {
        path: String,
        status: reqwest::StatusCode,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid JSON: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid resource path: {0}")]
    InvalidPath(String),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("invalid question reference: {0:?}")]
    InvalidReference(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("progress could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors emitted by `SignInService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignInError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("sign-in record could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoopError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

impl QuizLoopError {
    /// Whether the load succeeded but produced no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, QuizLoopError::Quiz(QuizError::Empty))
    }
}

/// Errors from interpreting page entry parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryError {
    #[error("no test or question specified")]
    NothingToLoad,
}

/// A configuration value that could not be interpreted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {key} value: {raw}")]
pub struct ConfigValueError {
    pub key: &'static str,
    pub raw: String,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    SignIn(#[from] SignInError),
    #[error("invalid base url {raw:?}: {source}")]
    BaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
}
