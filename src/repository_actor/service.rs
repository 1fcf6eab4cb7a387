use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn, Instrument};

use super::retry::fetch_with_retry;
use super::snapshot::{FetchPhase, RepositorySnapshot};
use crate::clients::{CacheClient, UserRepositoryClient};
use crate::config::RetryPolicy;
use crate::domain::{sort_by_last_name, UserRecord};
use crate::error::RepositoryError;
use crate::messages::{RepositoryRequest, ServiceResponse};
use crate::source::{FetchError, UserSource};

/// Cache key under which the sorted user list is stored.
pub const USERS_CACHE_KEY: &str = "users_data";

type FetchOutcome = Result<Vec<UserRecord>, FetchError>;

enum Event {
    Request(Option<RepositoryRequest>),
    FetchFinished(FetchOutcome),
}

/// Root actor for user data. Consults the cache, runs at most one remote
/// fetch at a time, and publishes [`RepositorySnapshot`]s through a watch
/// channel.
pub struct UserRepositoryService {
    receiver: mpsc::Receiver<RepositoryRequest>,
    completions: mpsc::Receiver<FetchOutcome>,
    completion_sender: mpsc::Sender<FetchOutcome>,
    cache: CacheClient,
    source: Arc<dyn UserSource>,
    retry: RetryPolicy,
    state: watch::Sender<RepositorySnapshot>,
    session: CancellationToken,
    in_flight: bool,
}

impl UserRepositoryService {
    pub fn new(
        buffer_size: usize,
        cache: CacheClient,
        source: Arc<dyn UserSource>,
        retry: RetryPolicy,
    ) -> (Self, UserRepositoryClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completion_sender, completions) = mpsc::channel(1);
        let (state, snapshots) = watch::channel(RepositorySnapshot::default());
        let service = Self {
            receiver,
            completions,
            completion_sender,
            cache,
            source,
            retry,
            state,
            session: CancellationToken::new(),
            in_flight: false,
        };
        let client = UserRepositoryClient::new(sender, snapshots);
        (service, client)
    }

    #[instrument(name = "user_repository", skip(self))]
    pub async fn run(mut self) {
        info!("UserRepository starting");

        loop {
            let event = tokio::select! {
                msg = self.receiver.recv() => Event::Request(msg),
                Some(outcome) = self.completions.recv() => Event::FetchFinished(outcome),
            };

            match event {
                Event::Request(Some(RepositoryRequest::Activate { respond_to })) => {
                    self.handle_activate(respond_to).await;
                }
                Event::Request(Some(RepositoryRequest::Reload { respond_to })) => {
                    self.handle_reload(respond_to);
                }
                Event::Request(Some(RepositoryRequest::Shutdown) | None) => {
                    info!("UserRepository shutting down");
                    break;
                }
                Event::FetchFinished(outcome) => self.handle_fetch_finished(outcome).await,
            }
        }

        // Aborts any in-flight request; its result is never applied.
        self.session.cancel();
        info!("UserRepository stopped");
    }

    /// Publish cached data straight away; go to the network only when the
    /// cache is empty or stale.
    #[instrument(skip(self, respond_to))]
    async fn handle_activate(&mut self, respond_to: ServiceResponse<RepositorySnapshot, RepositoryError>) {
        debug!("Processing activate request");

        let cached = match self.cache.get::<Vec<UserRecord>>(USERS_CACHE_KEY).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "Cache lookup failed, treating as miss");
                None
            }
        };

        match cached {
            Some(users) => {
                let stale = self.cache.is_stale().await.unwrap_or(false);
                info!(user_count = users.len(), stale, "Serving users from cache");
                let in_flight = self.in_flight;
                self.state.send_modify(|snapshot| {
                    snapshot.users = users;
                    snapshot.loading = in_flight;
                    if !in_flight {
                        snapshot.phase = FetchPhase::Success;
                    }
                });
                if stale {
                    self.start_fetch();
                }
            }
            None => {
                debug!("No cached users");
                self.start_fetch();
            }
        }

        let _ = respond_to.send(Ok(self.state.borrow().clone()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_reload(&mut self, respond_to: ServiceResponse<(), RepositoryError>) {
        debug!("Processing reload request");
        self.start_fetch();
        let _ = respond_to.send(Ok(()));
    }

    /// Single-flight: a request made while a fetch is running joins it.
    fn start_fetch(&mut self) {
        if self.in_flight {
            debug!("Fetch already in flight, joining it");
            return;
        }
        self.in_flight = true;
        self.state.send_modify(|snapshot| {
            snapshot.loading = true;
            snapshot.error = None;
            snapshot.phase = FetchPhase::Loading;
        });

        let source = Arc::clone(&self.source);
        let policy = self.retry.clone();
        let token = self.session.child_token();
        let completions = self.completion_sender.clone();

        tokio::spawn(
            async move {
                let outcome = fetch_with_retry(source.as_ref(), &policy, &token).await;
                if token.is_cancelled() {
                    debug!("Session ended, dropping fetch result");
                    return;
                }
                let _ = completions.send(outcome).await;
            }
            .instrument(tracing::info_span!("fetch_users")),
        );
    }

    #[instrument(skip(self, outcome))]
    async fn handle_fetch_finished(&mut self, outcome: FetchOutcome) {
        self.in_flight = false;

        match outcome {
            Ok(users) => {
                let sorted = Arc::new(sort_by_last_name(&users));
                info!(user_count = sorted.len(), "Users loaded");
                self.state.send_modify(|snapshot| {
                    snapshot.users = Arc::clone(&sorted);
                    snapshot.loading = false;
                    snapshot.error = None;
                    snapshot.phase = FetchPhase::Success;
                });
                if let Err(e) = self.cache.set(USERS_CACHE_KEY, sorted).await {
                    warn!(error = %e, "Failed to write users to cache");
                }
            }
            Err(FetchError::Cancelled) => {
                debug!("Fetch cancelled");
                self.state.send_modify(|snapshot| snapshot.loading = false);
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch users");
                let message = e.to_string();
                // Previously published users stay in place.
                self.state.send_modify(|snapshot| {
                    snapshot.loading = false;
                    snapshot.error = Some(message);
                    snapshot.phase = FetchPhase::Failed;
                });
            }
        }
    }
}
