use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument};

use super::macros::{client_method, client_shutdown};
use crate::error::RepositoryError;
use crate::messages::RepositoryRequest;
use crate::repository_actor::RepositorySnapshot;

/// Client for the user repository. Requests go through the actor; published
/// state is read straight from the watch channel.
#[derive(Clone)]
pub struct UserRepositoryClient {
    sender: mpsc::Sender<RepositoryRequest>,
    snapshots: watch::Receiver<RepositorySnapshot>,
}

impl UserRepositoryClient {
    pub fn new(sender: mpsc::Sender<RepositoryRequest>, snapshots: watch::Receiver<RepositorySnapshot>) -> Self {
        Self { sender, snapshots }
    }

    /// A receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<RepositorySnapshot> {
        self.snapshots.clone()
    }

    /// Wait for the current load, if any, to finish.
    #[instrument(skip(self))]
    pub async fn wait_until_settled(&self) -> Result<RepositorySnapshot, RepositoryError> {
        debug!("Waiting for repository to settle");
        let mut snapshots = self.snapshots.clone();
        let settled = snapshots
            .wait_for(|snapshot| !snapshot.loading)
            .await
            .map_err(|_| RepositoryError::ActorCommunicationError("Actor dropped".to_string()))?;
        Ok(settled.clone())
    }
}

client_method!(UserRepositoryClient => fn activate() -> RepositorySnapshot as RepositoryRequest::Activate, Error = RepositoryError);
client_method!(UserRepositoryClient => fn reload() -> () as RepositoryRequest::Reload, Error = RepositoryError);
client_shutdown!(UserRepositoryClient, RepositoryRequest, RepositoryError);
