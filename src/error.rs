use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CacheError {
    #[error("Cached value for {key} has a different type")]
    TypeMismatch { key: String },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Only channel failures surface here; fetch failures are published as
/// `RepositorySnapshot::error` instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RepositoryError {
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    #[error("Index {index} is outside the filtered list of {len} users")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
