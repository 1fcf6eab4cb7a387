//! # Mock Framework
//!
//! Test doubles for the [`UserSource`] port.
//!
//! Use [`create_mock_source`] when the test should answer each fetch itself,
//! through [`expect_fetch`]. Use [`ScriptedUserSource`] when a queue of canned
//! responses is enough.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::domain::UserRecord;
use crate::source::{FetchError, UserSource};

pub type FetchResponder = oneshot::Sender<Result<Vec<UserRecord>, FetchError>>;

/// One `fetch_users` call waiting for the test to answer it.
pub struct FetchCall {
    pub respond_to: FetchResponder,
}

/// A source whose every fetch is forwarded to the test.
///
/// Dropping the fetch future (cancellation) drops the receiving half, so the
/// test can observe it with [`oneshot::Sender::is_closed`].
pub struct MockUserSource {
    calls: mpsc::Sender<FetchCall>,
}

#[async_trait]
impl UserSource for MockUserSource {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        let (respond_to, response) = oneshot::channel();
        self.calls
            .send(FetchCall { respond_to })
            .await
            .map_err(|_| FetchError::transport("mock receiver dropped"))?;
        response
            .await
            .map_err(|_| FetchError::transport("mock responder dropped"))?
    }
}

/// Creates a mock source and the receiver its fetch calls arrive on.
pub fn create_mock_source(buffer_size: usize) -> (Arc<MockUserSource>, mpsc::Receiver<FetchCall>) {
    let (calls, receiver) = mpsc::channel(buffer_size);
    (Arc::new(MockUserSource { calls }), receiver)
}

/// Helper to wait for the next fetch and hand back its responder.
pub async fn expect_fetch(receiver: &mut mpsc::Receiver<FetchCall>) -> Option<FetchResponder> {
    receiver.recv().await.map(|call| call.respond_to)
}

/// A source answering from a queue of canned results.
///
/// Once the queue runs dry it keeps returning the last error it handed out,
/// or a transport error if it never failed.
pub struct ScriptedUserSource {
    responses: Mutex<VecDeque<Result<Vec<UserRecord>, FetchError>>>,
    last_error: Mutex<Option<FetchError>>,
    calls: AtomicUsize,
}

impl ScriptedUserSource {
    pub fn new(responses: Vec<Result<Vec<UserRecord>, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last_error: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with `error`.
    pub fn failing(error: FetchError) -> Self {
        let source = Self::new(Vec::new());
        *source.last_error.lock().unwrap() = Some(error);
        source
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserSource for ScriptedUserSource {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        let mut last_error = self.last_error.lock().unwrap();
        match next {
            Some(Err(error)) => {
                *last_error = Some(error.clone());
                Err(error)
            }
            Some(Ok(users)) => Ok(users),
            None => Err(last_error
                .clone()
                .unwrap_or_else(|| FetchError::transport("no scripted response left"))),
        }
    }
}

/// The first four users of the public sample directory.
pub fn sample_users() -> Vec<UserRecord> {
    vec![
        UserRecord::new(1, "Leanne Graham")
            .with_email("Sincere@april.biz")
            .with_company("Romaguera-Crona"),
        UserRecord::new(2, "Ervin Howell")
            .with_email("Shanna@melissa.tv")
            .with_company("Deckow-Crist"),
        UserRecord::new(3, "Clementine Bauch")
            .with_email("Nathan@yesenia.net")
            .with_company("Romaguera-Jacobson"),
        UserRecord::new(4, "Mrs. Dennis Schulist")
            .with_email("Karley_Dach@jasper.info")
            .with_company("Robel-Corkery"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source() {
        let (source, mut receiver) = create_mock_source(10);

        let fetch_task = tokio::spawn(async move { source.fetch_users().await });

        let responder = expect_fetch(&mut receiver).await.expect("Expected a fetch");
        responder.send(Ok(sample_users())).unwrap();

        let users = fetch_task.await.unwrap().unwrap();
        assert_eq!(users.len(), 4);
    }

    #[tokio::test]
    async fn test_scripted_source_repeats_last_error() {
        let source = ScriptedUserSource::new(vec![
            Err(FetchError::http(503, "Service Unavailable")),
            Ok(sample_users()),
        ]);

        assert!(source.fetch_users().await.is_err());
        assert!(source.fetch_users().await.is_ok());
        assert_eq!(
            source.fetch_users().await,
            Err(FetchError::http(503, "Service Unavailable"))
        );
        assert_eq!(source.calls(), 3);
    }
}
