//! Cancellable pacing delay used between discussion turns.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How a [`cancellable_delay`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayOutcome {
    /// The full duration passed
    Elapsed,
    /// The token was cancelled first
    Interrupted,
}

impl DelayOutcome {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, DelayOutcome::Interrupted)
    }
}

/// Wait for `duration`, or until `token` is cancelled, whichever comes
/// first. An already-cancelled token returns immediately.
pub async fn cancellable_delay(duration: Duration, token: &CancellationToken) -> DelayOutcome {
    tokio::select! {
        biased;
        _ = token.cancelled() => DelayOutcome::Interrupted,
        _ = tokio::time::sleep(duration) => DelayOutcome::Elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_delay_elapses() {
        let token = CancellationToken::new();
        let start = Instant::now();
        let outcome = cancellable_delay(Duration::from_millis(5000), &token).await;
        assert_eq!(outcome, DelayOutcome::Elapsed);
        assert!(start.elapsed() >= Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_token_returns_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        let start = Instant::now();
        let outcome = cancellable_delay(Duration::from_secs(60), &token).await;
        assert_eq!(outcome, DelayOutcome::Interrupted);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_wakes_waiter_early() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        let outcome = cancellable_delay(Duration::from_millis(5000), &token).await;
        assert!(outcome.is_interrupted());
        assert!(start.elapsed() < Duration::from_millis(300));
    }
}
