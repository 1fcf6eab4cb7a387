use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use super::controller::{KeyOutcome, ListItem, NavKey, SearchController};
use super::debounce::Debouncer;
use crate::clients::SearchSessionClient;
use crate::config::DirectoryConfig;
use crate::domain::{ColorMode, UserRecord};
use crate::error::SearchError;
use crate::messages::{SearchRequest, ServiceResponse};
use crate::repository_actor::RepositorySnapshot;

/// Everything a presentation layer needs to draw one search session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    pub query_text: String,
    pub debounced_query: String,
    pub items: Vec<ListItem>,
    pub selected_index: Option<usize>,
    pub selected_user: Option<UserRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

#[cfg(test)]
impl SearchView {
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.label.as_str()).collect()
    }
}

enum Event {
    Request(Option<SearchRequest>),
    RepositoryChanged(bool),
    DebounceElapsed,
}

/// One search session: raw query text goes through the debouncer, the
/// debounced query filters the repository's list, and keys move the
/// selection. State is published as a [`SearchView`].
pub struct SearchSessionService {
    receiver: mpsc::Receiver<SearchRequest>,
    repository: watch::Receiver<RepositorySnapshot>,
    view: watch::Sender<SearchView>,
    controller: SearchController,
    debouncer: Debouncer<String>,
    query_text: String,
    color_mode: ColorMode,
    loading: bool,
    error: Option<String>,
}

impl SearchSessionService {
    pub fn new(
        buffer_size: usize,
        mut repository: watch::Receiver<RepositorySnapshot>,
        config: &DirectoryConfig,
        color_mode: ColorMode,
    ) -> (Self, SearchSessionClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (view, view_receiver) = watch::channel(SearchView::default());

        let snapshot = repository.borrow_and_update().clone();
        let mut controller = SearchController::new(config.list_id.clone());
        controller.set_users(&snapshot.users);

        let service = Self {
            receiver,
            repository,
            view,
            controller,
            debouncer: Debouncer::new(String::new(), config.debounce_window),
            query_text: String::new(),
            color_mode,
            loading: snapshot.loading,
            error: snapshot.error,
        };
        service.publish();

        let client = SearchSessionClient::new(sender, view_receiver);
        (service, client)
    }

    #[instrument(name = "search_session", skip(self))]
    pub async fn run(mut self) {
        info!("SearchSession starting");
        let mut repository_open = true;

        loop {
            let deadline = self.debouncer.deadline();
            let event = tokio::select! {
                msg = self.receiver.recv() => Event::Request(msg),
                changed = self.repository.changed(), if repository_open => {
                    Event::RepositoryChanged(changed.is_ok())
                }
                () = sleep_until_due(deadline) => Event::DebounceElapsed,
            };

            match event {
                Event::Request(Some(SearchRequest::TypeQuery { text, respond_to })) => {
                    self.handle_type_query(text, respond_to);
                }
                Event::Request(Some(SearchRequest::KeyDown { key, respond_to })) => {
                    self.handle_key_down(key, respond_to);
                }
                Event::Request(Some(SearchRequest::SelectItem { index, respond_to })) => {
                    self.handle_select_item(index, respond_to);
                }
                Event::Request(Some(SearchRequest::SetDebounceWindow { window_ms, respond_to })) => {
                    self.handle_set_debounce_window(window_ms, respond_to);
                }
                Event::Request(Some(SearchRequest::Shutdown) | None) => {
                    info!("SearchSession shutting down");
                    break;
                }
                Event::RepositoryChanged(true) => self.handle_repository_changed(),
                Event::RepositoryChanged(false) => {
                    debug!("Repository closed, keeping last user list");
                    repository_open = false;
                }
                Event::DebounceElapsed => self.handle_debounce_elapsed(),
            }
        }

        info!("SearchSession stopped");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_type_query(&mut self, text: String, respond_to: ServiceResponse<(), SearchError>) {
        debug!("Processing query input");
        self.debouncer.push(text.clone(), Instant::now());
        self.query_text = text;
        self.publish();
        let _ = respond_to.send(Ok(()));
    }

    fn handle_debounce_elapsed(&mut self) {
        let Some(query) = self.debouncer.poll(Instant::now()).cloned() else {
            return;
        };
        self.controller.set_query(&query);
        info!(query = %query, matches = self.controller.len(), "Applied debounced query");
        self.publish();
    }

    #[instrument(skip(self, respond_to))]
    fn handle_key_down(&mut self, key: String, respond_to: ServiceResponse<KeyOutcome, SearchError>) {
        let outcome = self
            .controller
            .handle_key(NavKey::from_key_name(&key), |index| debug!(index, "Item selected"));
        if outcome.committed {
            if let Some(user) = self.controller.selected_user() {
                info!(user_id = user.id, "User committed from keyboard");
            }
        }
        self.publish();
        let _ = respond_to.send(Ok(outcome));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_select_item(&mut self, index: usize, respond_to: ServiceResponse<UserRecord, SearchError>) {
        let len = self.controller.len();
        let result = self
            .controller
            .commit(index)
            .cloned()
            .ok_or(SearchError::IndexOutOfRange { index, len });

        match &result {
            Ok(user) => {
                info!(user_id = user.id, "User committed");
                self.publish();
            }
            Err(e) => debug!(error = %e, "Selection rejected"),
        }
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_set_debounce_window(&mut self, window_ms: u64, respond_to: ServiceResponse<(), SearchError>) {
        self.debouncer
            .set_window(Duration::from_millis(window_ms), Instant::now());
        let _ = respond_to.send(Ok(()));
    }

    fn handle_repository_changed(&mut self) {
        let snapshot = self.repository.borrow_and_update().clone();
        debug!(
            user_count = snapshot.users.len(),
            loading = snapshot.loading,
            "Repository published"
        );
        self.controller.set_users(&snapshot.users);
        self.loading = snapshot.loading;
        self.error = snapshot.error;
        self.publish();
    }

    fn publish(&self) {
        self.view.send_replace(SearchView {
            query_text: self.query_text.clone(),
            debounced_query: self.debouncer.published().clone(),
            items: self.controller.items(self.color_mode),
            selected_index: self.controller.selected_index(),
            selected_user: self.controller.selected_user().cloned(),
            loading: self.loading,
            error: self.error.clone(),
        });
    }
}

async fn sleep_until_due(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
