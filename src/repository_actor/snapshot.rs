use std::sync::Arc;

use crate::domain::UserRecord;

/// Where the current fetch session stands.
///
/// `Idle -> Loading -> {Success, Failed}`; `Failed` re-enters `Loading` on reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// What the repository publishes to its subscribers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RepositorySnapshot {
    /// Sorted by formatted last name.
    pub users: Arc<Vec<UserRecord>>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: FetchPhase,
}
