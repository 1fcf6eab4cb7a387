//! Reqwest-backed user source.
//!
//! Owns transport details only: the GET itself, timeout and HTTP status
//! mapping, and JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, instrument};

use super::{parse_users, FetchError, UserSource};
use crate::domain::UserRecord;

const USER_AGENT: &str = concat!("user-directory/", env!("CARGO_PKG_VERSION"));

pub struct HttpUserSource {
    client: Client,
    endpoint: Url,
}

impl HttpUserSource {
    /// Build a source whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl UserSource for HttpUserSource {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        debug!("Sending request");
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let users = parse_users(body.as_ref())?;
        debug!(user_count = users.len(), "Decoded user list");
        Ok(users)
    }
}

fn map_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            message: error.to_string(),
        }
    } else if error.is_decode() {
        FetchError::decode(error.to_string())
    } else {
        FetchError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> FetchError {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    let detail = if text.is_empty() {
        status.canonical_reason().unwrap_or("Unknown status").to_owned()
    } else {
        text.to_owned()
    };
    FetchError::http(status.as_u16(), detail)
}
