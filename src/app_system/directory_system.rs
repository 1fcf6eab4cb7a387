use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::cache_actor::CacheService;
use crate::clients::{CacheClient, SearchSessionClient, UserRepositoryClient};
use crate::config::DirectoryConfig;
use crate::domain::ColorMode;
use crate::repository_actor::{RepositorySnapshot, UserRepositoryService, USERS_CACHE_KEY};
use crate::search_actor::SearchSessionService;
use crate::source::{HttpUserSource, UserSource};

const CHANNEL_BUFFER: usize = 32;

/// The main application system that orchestrates all services.
///
/// Owns the process-wide cache and the user repository. Search sessions are
/// opened on demand and share the repository's published list.
pub struct DirectorySystem {
    pub cache_client: CacheClient,
    pub repository_client: UserRepositoryClient,
    config: DirectoryConfig,
    sessions: Vec<SearchSessionClient>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl DirectorySystem {
    /// Start the services against the configured HTTP endpoint.
    pub fn new(config: DirectoryConfig) -> Result<Self, String> {
        let source = HttpUserSource::new(config.endpoint.clone(), config.request_timeout)
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Start the services against any [`UserSource`].
    pub fn with_source(config: DirectoryConfig, source: Arc<dyn UserSource>) -> Self {
        // 1. Cache
        let (cache_service, cache_client) = CacheService::new(CHANNEL_BUFFER, config.cache_ttl);
        let cache_handle = tokio::spawn(cache_service.run());

        // 2. Repository (depends on the cache)
        let (repository_service, repository_client) =
            UserRepositoryService::new(CHANNEL_BUFFER, cache_client.clone(), source, config.retry.clone());
        let repository_handle = tokio::spawn(repository_service.run());

        info!(endpoint = %config.endpoint, "Directory system started");

        Self {
            cache_client,
            repository_client,
            config,
            sessions: Vec::new(),
            handles: vec![cache_handle, repository_handle],
        }
    }

    /// Open a search session following the repository's list.
    pub fn open_search(&mut self, color_mode: ColorMode) -> SearchSessionClient {
        let (service, client) = SearchSessionService::new(
            CHANNEL_BUFFER,
            self.repository_client.subscribe(),
            &self.config,
            color_mode,
        );
        self.handles.push(tokio::spawn(service.run()));
        self.sessions.push(client.clone());
        client
    }

    /// Drop the cached list and fetch it again, waiting for the outcome.
    pub async fn refresh(&self) -> Result<RepositorySnapshot, String> {
        let dropped = self
            .cache_client
            .invalidate(USERS_CACHE_KEY.to_string())
            .await
            .map_err(|e| e.to_string())?;
        debug!(dropped, "Invalidated cached users");

        self.repository_client.reload().await.map_err(|e| e.to_string())?;
        self.repository_client
            .wait_until_settled()
            .await
            .map_err(|e| e.to_string())
    }

    /// Stop sessions first, then the repository (cancelling any fetch), then
    /// the cache.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        for session in &self.sessions {
            // A session that already stopped is fine.
            let _ = session.shutdown().await;
        }
        self.repository_client
            .shutdown()
            .await
            .map_err(|e| e.to_string())?;
        match self.cache_client.clear().await {
            Ok(removed) => debug!(removed, "Cache cleared"),
            Err(e) => warn!(error = %e, "Failed to clear cache"),
        }
        self.cache_client.shutdown().await.map_err(|e| e.to_string())?;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Service task failed: {:?}", e);
                return Err(format!("Service task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
