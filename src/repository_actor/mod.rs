//! The directory's single data source: cache first, remote second.

mod retry;
mod service;
mod snapshot;

pub use service::{UserRepositoryService, USERS_CACHE_KEY};
pub use snapshot::RepositorySnapshot;
