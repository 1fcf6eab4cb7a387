use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument};

use super::macros::{client_method, client_shutdown};
use crate::domain::UserRecord;
use crate::error::SearchError;
use crate::messages::SearchRequest;
use crate::search_actor::{KeyOutcome, SearchView};

/// Handle to one search session. Input events go through the actor; the
/// rendered view is read from the watch channel.
#[derive(Clone)]
pub struct SearchSessionClient {
    sender: mpsc::Sender<SearchRequest>,
    view: watch::Receiver<SearchView>,
}

impl SearchSessionClient {
    pub fn new(sender: mpsc::Sender<SearchRequest>, view: watch::Receiver<SearchView>) -> Self {
        Self { sender, view }
    }

    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }

    /// Wait until `query` has made it through the debouncer.
    #[instrument(skip(self))]
    pub async fn wait_for_query(&self, query: &str) -> Result<SearchView, SearchError> {
        debug!("Waiting for debounced query");
        let mut view = self.view.clone();
        let applied = view
            .wait_for(|view| view.debounced_query == query)
            .await
            .map_err(|_| SearchError::ActorCommunicationError("Actor dropped".to_string()))?;
        Ok(applied.clone())
    }
}

client_method!(SearchSessionClient => fn type_query(text: String) -> () as SearchRequest::TypeQuery, Error = SearchError);
client_method!(SearchSessionClient => fn key_down(key: String) -> KeyOutcome as SearchRequest::KeyDown, Error = SearchError);
client_method!(SearchSessionClient => fn select_item(index: usize) -> UserRecord as SearchRequest::SelectItem, Error = SearchError);
client_method!(SearchSessionClient => fn set_debounce_window(window_ms: u64) -> () as SearchRequest::SetDebounceWindow, Error = SearchError);
client_shutdown!(SearchSessionClient, SearchRequest, SearchError);
