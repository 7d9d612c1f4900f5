use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::warn;

use crate::fetcher::{FetchFailure, FetchOutcome};

/// Flat-delay retry. `max_retries` counts attempts after the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_retries: usize,
  pub delay: Duration,
}

impl RetryPolicy {
  pub const fn new(max_retries: usize, delay: Duration) -> Self {
    Self { max_retries, delay }
  }

  /// Single attempt; the first failure is final.
  pub const fn none() -> Self {
    Self { max_retries: 0, delay: Duration::ZERO }
  }

  pub fn total_attempts(&self) -> usize {
    self.max_retries + 1
  }

  fn strategy(&self) -> std::iter::Take<FixedInterval> {
    let millis = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX);
    FixedInterval::from_millis(millis).take(self.max_retries)
  }
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self::new(3, Duration::from_secs(3))
  }
}

/// Runs `fetch_call` until it succeeds, yields a non-retryable outcome, or the
/// policy is exhausted. Attempts never overlap.
pub async fn with_retry<P, F, Fut>(policy: &RetryPolicy, mut fetch_call: F) -> FetchOutcome<P>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = FetchOutcome<P>>,
{
  let total = policy.total_attempts();
  let mut attempt = 0usize;
  let result = RetryIf::spawn(
    policy.strategy(),
    || {
      attempt += 1;
      let current = attempt;
      let call = fetch_call();
      async move {
        let result = call.await.into_result();
        if let Err(failure) = &result {
          if failure.is_retryable() && total > 1 {
            warn!("attempt {}/{} failed: {}", current, total, failure);
          }
        }
        result
      }
    },
    |failure: &FetchFailure| failure.is_retryable(),
  )
  .await;
  result.into()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_policy_matches_news_widget() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.total_attempts(), 4);
    assert_eq!(policy.delay, Duration::from_secs(3));
  }

  #[test]
  fn strategy_is_flat() {
    let delays: Vec<Duration> = RetryPolicy::new(3, Duration::from_millis(250)).strategy().collect();
    assert_eq!(delays, vec![Duration::from_millis(250); 3]);
    assert_eq!(RetryPolicy::none().strategy().count(), 0);
  }
}
