//! Process-wide key/value cache with a single shared time-to-live.

mod entry;
mod service;

pub use service::CacheService;
