use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::domain::UserRecord;
use crate::source::{FetchError, UserSource};

/// Fetch the user list, retrying retryable failures with exponential backoff.
///
/// Cancelling `token` drops the in-flight request or the pending delay and
/// resolves to [`FetchError::Cancelled`].
pub async fn fetch_with_retry(
    source: &dyn UserSource,
    policy: &RetryPolicy,
    token: &CancellationToken,
) -> Result<Vec<UserRecord>, FetchError> {
    let mut retry = 0;
    loop {
        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => return Err(FetchError::Cancelled),
            outcome = source.fetch_users() => outcome,
        };

        let error = match outcome {
            Ok(users) => {
                debug!(attempt = retry + 1, user_count = users.len(), "Fetch succeeded");
                return Ok(users);
            }
            Err(error) => error,
        };

        if !error.is_retryable() || retry >= policy.max_retries {
            warn!(error = %error, attempts = retry + 1, "Giving up on fetch");
            return Err(error);
        }

        let delay = policy.delay_for(retry);
        retry += 1;
        warn!(
            error = %error,
            retries_left = policy.max_retries - retry + 1,
            delay_ms = delay.as_millis(),
            "Retrying fetch"
        );

        tokio::select! {
            biased;
            () = token.cancelled() => return Err(FetchError::Cancelled),
            () = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::domain::UserRecord;
    use crate::mock_framework::{create_mock_source, expect_fetch, ScriptedUserSource};

    #[tokio::test(start_paused = true)]
    async fn test_retries_with_growing_delays_then_gives_up() {
        let source = ScriptedUserSource::failing(FetchError::http(500, "Internal Server Error"));
        let started = Instant::now();

        let error = fetch_with_retry(&source, &RetryPolicy::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(error, FetchError::http(500, "Internal Server Error"));
        assert_eq!(source.calls(), 4);
        // 1000 + 1500 + 2250
        assert_eq!(started.elapsed(), Duration::from_millis(4750));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failure() {
        let source = ScriptedUserSource::new(vec![
            Err(FetchError::transport("connection reset")),
            Ok(vec![UserRecord::new(1, "Leanne Graham")]),
        ]);

        let users = fetch_with_retry(&source, &RetryPolicy::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_decode_errors_are_not_retried() {
        let source = ScriptedUserSource::failing(FetchError::decode("expected `[`"));

        let error = fetch_with_retry(&source, &RetryPolicy::immediate(3), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(error, FetchError::Decode { .. }));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_request() {
        let (source, mut fetches) = create_mock_source(4);
        let token = CancellationToken::new();

        let task = {
            let token = token.clone();
            tokio::spawn(async move {
                fetch_with_retry(source.as_ref(), &RetryPolicy::default(), &token).await
            })
        };

        let responder = expect_fetch(&mut fetches).await.expect("Expected a fetch");
        token.cancel();

        assert_eq!(task.await.unwrap(), Err(FetchError::Cancelled));
        // The request future was dropped, so nobody is listening any more.
        assert!(responder.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let source = ScriptedUserSource::failing(FetchError::transport("offline"));
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            canceller.cancel();
        });

        let error = fetch_with_retry(&source, &RetryPolicy::default(), &token)
            .await
            .unwrap_err();

        assert_eq!(error, FetchError::Cancelled);
        assert_eq!(source.calls(), 1);
    }
}
