use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use super::entry::CacheEntry;
use crate::clients::CacheClient;
use crate::error::CacheError;
use crate::messages::{CacheRequest, CachedValue, ServiceResponse};

/// Owns every cache entry. Requests are handled one at a time, so each key
/// sees writes in arrival order and the last `set` wins.
pub struct CacheService {
    receiver: mpsc::Receiver<CacheRequest>,
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    stale: bool,
}

impl CacheService {
    pub fn new(buffer_size: usize, ttl: Duration) -> (Self, CacheClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            entries: HashMap::new(),
            ttl,
            stale: false,
        };
        (service, CacheClient::new(sender))
    }

    #[instrument(name = "cache_service", skip(self), fields(ttl_ms = self.ttl.as_millis()))]
    pub async fn run(mut self) {
        info!("CacheService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CacheRequest::Get { key, respond_to } => self.handle_get(key, respond_to),
                CacheRequest::Set {
                    key,
                    value,
                    respond_to,
                } => self.handle_set(key, value, respond_to),
                CacheRequest::Invalidate { key, respond_to } => {
                    self.handle_invalidate(key, respond_to);
                }
                CacheRequest::Clear { respond_to } => self.handle_clear(respond_to),
                CacheRequest::IsStale { respond_to } => {
                    let _ = respond_to.send(Ok(self.stale));
                }
                CacheRequest::Shutdown => {
                    info!("CacheService shutting down");
                    break;
                }
            }
        }

        info!("CacheService stopped");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_get(&mut self, key: String, respond_to: ServiceResponse<Option<CachedValue>, CacheError>) {
        let now = Instant::now();
        let value = match self.entries.get(&key) {
            Some(entry) => {
                if !entry.is_fresh(now, self.ttl) {
                    debug!(age_ms = entry.age(now).as_millis(), "Entry is stale");
                    self.stale = true;
                }
                Some(entry.value.clone())
            }
            None => {
                debug!("Cache miss");
                None
            }
        };

        let _ = respond_to.send(Ok(value));
    }

    #[instrument(skip(self, value, respond_to))]
    fn handle_set(&mut self, key: String, value: CachedValue, respond_to: ServiceResponse<(), CacheError>) {
        self.entries.insert(key, CacheEntry::new(value, Instant::now()));
        self.stale = false;
        debug!("Entry written");
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_invalidate(&mut self, key: String, respond_to: ServiceResponse<bool, CacheError>) {
        let removed = self.entries.remove(&key).is_some();
        debug!(removed, "Entry invalidated");
        let _ = respond_to.send(Ok(removed));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_clear(&mut self, respond_to: ServiceResponse<usize, CacheError>) {
        let removed = self.entries.len();
        self.entries.clear();
        info!(removed, "Cache cleared");
        let _ = respond_to.send(Ok(removed));
    }
}
