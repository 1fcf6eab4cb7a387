use std::any::Any;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::domain::UserRecord;
use crate::error::{CacheError, RepositoryError, SearchError};
use crate::repository_actor::RepositorySnapshot;
use crate::search_actor::KeyOutcome;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Type-erased cache payload. Clients downcast on the way out.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

/// Typed message enums for actor communication. Each variant includes parameters
/// and a oneshot channel for responses.

pub enum CacheRequest {
    Get {
        key: String,
        respond_to: ServiceResponse<Option<CachedValue>, CacheError>,
    },
    Set {
        key: String,
        value: CachedValue,
        respond_to: ServiceResponse<(), CacheError>,
    },
    Invalidate {
        key: String,
        respond_to: ServiceResponse<bool, CacheError>,
    },
    Clear {
        respond_to: ServiceResponse<usize, CacheError>,
    },
    IsStale {
        respond_to: ServiceResponse<bool, CacheError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum RepositoryRequest {
    Activate {
        respond_to: ServiceResponse<RepositorySnapshot, RepositoryError>,
    },
    Reload {
        respond_to: ServiceResponse<(), RepositoryError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum SearchRequest {
    TypeQuery {
        text: String,
        respond_to: ServiceResponse<(), SearchError>,
    },
    KeyDown {
        key: String,
        respond_to: ServiceResponse<KeyOutcome, SearchError>,
    },
    SelectItem {
        index: usize,
        respond_to: ServiceResponse<UserRecord, SearchError>,
    },
    SetDebounceWindow {
        window_ms: u64,
        respond_to: ServiceResponse<(), SearchError>,
    },
    Shutdown,
}
