//! Cloneable handles for talking to the directory's services.

mod macros;

mod cache_client;
mod repository_client;
mod search_client;

pub use cache_client::CacheClient;
pub use repository_client::UserRepositoryClient;
pub use search_client::SearchSessionClient;
