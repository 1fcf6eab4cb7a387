//! Search sessions over the repository's user list.

mod controller;
mod debounce;
mod service;
mod viewport;

pub use controller::KeyOutcome;
pub use service::{SearchSessionService, SearchView};
pub use viewport::visible_range;
