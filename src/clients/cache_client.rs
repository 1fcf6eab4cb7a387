use std::any::Any;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, warn};

use super::macros::{client_method, client_shutdown};
use crate::error::CacheError;
use crate::messages::{CacheRequest, CachedValue};

/// Client for the process-wide cache. Cheap to clone; every clone talks to
/// the same store.
#[derive(Clone)]
pub struct CacheClient {
    sender: mpsc::Sender<CacheRequest>,
}

impl CacheClient {
    pub fn new(sender: mpsc::Sender<CacheRequest>) -> Self {
        Self { sender }
    }

    /// Returns the stored value whether fresh or stale. Reading a stale entry
    /// raises the staleness flag until the next `set`.
    #[instrument(skip(self))]
    pub async fn get<T: Any + Send + Sync>(&self, key: &str) -> Result<Option<Arc<T>>, CacheError> {
        debug!("Sending request");
        let Some(value) = self.get_raw(key.to_owned()).await? else {
            return Ok(None);
        };
        match value.downcast::<T>() {
            Ok(typed) => Ok(Some(typed)),
            Err(_) => {
                warn!("Cached value has an unexpected type");
                Err(CacheError::TypeMismatch {
                    key: key.to_owned(),
                })
            }
        }
    }

    /// Overwrites the entry and its timestamp.
    #[instrument(skip(self, value))]
    pub async fn set<T: Any + Send + Sync>(&self, key: &str, value: Arc<T>) -> Result<(), CacheError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Set {
                key: key.to_owned(),
                value: value as CachedValue,
                respond_to,
            })
            .await
            .map_err(|_| CacheError::ActorCommunicationError("Actor closed".to_string()))?;
        response
            .await
            .map_err(|_| CacheError::ActorCommunicationError("Actor dropped".to_string()))?
    }

    async fn get_raw(&self, key: String) -> Result<Option<CachedValue>, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Get { key, respond_to })
            .await
            .map_err(|_| CacheError::ActorCommunicationError("Actor closed".to_string()))?;
        response
            .await
            .map_err(|_| CacheError::ActorCommunicationError("Actor dropped".to_string()))?
    }
}

client_method!(CacheClient => fn invalidate(key: String) -> bool as CacheRequest::Invalidate, Error = CacheError);
client_method!(CacheClient => fn clear() -> usize as CacheRequest::Clear, Error = CacheError);
client_method!(CacheClient => fn is_stale() -> bool as CacheRequest::IsStale, Error = CacheError);
client_shutdown!(CacheClient, CacheRequest, CacheError);
