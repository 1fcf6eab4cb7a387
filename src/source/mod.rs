//! Driven port for loading the user list from its remote home.
//!
//! The repository owns retry and caching; adapters only perform one request
//! and classify what went wrong.

mod http;

pub use http::HttpUserSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::UserRecord;

/// Errors surfaced by a single fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection or transport failure before a response arrived.
    #[error("Network error: {message}")]
    Transport { message: String },
    #[error("Network timeout: {message}")]
    Timeout { message: String },
    /// Non-2xx response. `body` falls back to the status text when empty.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Invalid user payload: {message}")]
    Decode { message: String },
    #[error("Fetch cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Return whether retrying this error is expected to help.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } | Self::Http { .. } => true,
            Self::Cancelled => false,
            Self::Decode { .. } => self.to_string().contains("Network"),
        }
    }
}

/// Port for loading every directory user in one request.
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, FetchError>;
}

/// Decode a JSON array of users.
pub fn parse_users(body: &[u8]) -> Result<Vec<UserRecord>, FetchError> {
    serde_json::from_slice(body)
        .map_err(|error| FetchError::decode(format!("invalid user list JSON: {error}")))
}
