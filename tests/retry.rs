use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};
use warp::http::StatusCode;
use warp::Filter;

use smarthub::fetcher::{FetchFailure, FetchOutcome, HttpFetcher};
use smarthub::retry::{with_retry, RetryPolicy};

#[tokio::test(start_paused = true)]
async fn exhausted_policy_makes_one_plus_max_retries_attempts() {
  let attempts = AtomicUsize::new(0);
  let start = Instant::now();
  let outcome: FetchOutcome<u32> = with_retry(&RetryPolicy::new(3, Duration::from_secs(3)), || {
    attempts.fetch_add(1, Ordering::SeqCst);
    async { FetchOutcome::Failure(FetchFailure::Timeout) }
  })
  .await;

  assert_eq!(outcome, FetchOutcome::Failure(FetchFailure::Timeout));
  assert_eq!(attempts.load(Ordering::SeqCst), 4);
  let elapsed = start.elapsed();
  assert!(elapsed >= Duration::from_secs(9) && elapsed < Duration::from_secs(10), "{:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn success_stops_retrying() {
  let attempts = AtomicUsize::new(0);
  let outcome: FetchOutcome<u32> = with_retry(&RetryPolicy::new(3, Duration::from_secs(3)), || {
    let n = attempts.fetch_add(1, Ordering::SeqCst);
    async move {
      if n < 2 {
        FetchOutcome::Failure(FetchFailure::HttpError(502))
      } else {
        FetchOutcome::Success(7)
      }
    }
  })
  .await;

  assert_eq!(assert_ok!(outcome.into_result()), 7);
  assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn empty_result_is_not_retried() {
  let attempts = AtomicUsize::new(0);
  let start = Instant::now();
  let outcome: FetchOutcome<u32> = with_retry(&RetryPolicy::default(), || {
    attempts.fetch_add(1, Ordering::SeqCst);
    async { FetchOutcome::Failure(FetchFailure::EmptyResult) }
  })
  .await;

  assert_eq!(assert_err!(outcome.into_result()), FetchFailure::EmptyResult);
  assert_eq!(attempts.load(Ordering::SeqCst), 1);
  assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn no_retry_policy_makes_a_single_attempt() {
  let attempts = AtomicUsize::new(0);
  let outcome: FetchOutcome<u32> = with_retry(&RetryPolicy::none(), || {
    attempts.fetch_add(1, Ordering::SeqCst);
    async { FetchOutcome::Failure(FetchFailure::NetworkError("refused".into())) }
  })
  .await;

  assert!(!outcome.is_success());
  assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn recovers_from_a_flapping_upstream() {
  let hits = Arc::new(AtomicUsize::new(0));
  let counter = hits.clone();
  let route = warp::path("news").map(move || {
    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
      warp::reply::with_status(warp::reply::json(&serde_json::json!({})), StatusCode::BAD_GATEWAY)
    } else {
      warp::reply::with_status(warp::reply::json(&serde_json::json!(["ok"])), StatusCode::OK)
    }
  });
  let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
  tokio::spawn(server);

  let fetcher = HttpFetcher::new("smarthub-tests/1.0", Duration::from_secs(2)).unwrap();
  let url = format!("http://{}/news", addr);
  let outcome: FetchOutcome<Vec<String>> =
    with_retry(&RetryPolicy::new(3, Duration::from_millis(20)), || fetcher.fetch(&url)).await;

  assert_eq!(outcome, FetchOutcome::Success(vec!["ok".to_string()]));
  assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn timed_out_attempts_use_up_the_retry_budget() {
  let hits = Arc::new(AtomicUsize::new(0));
  let counter = hits.clone();
  let route = warp::path("weather").and_then(move || {
    counter.fetch_add(1, Ordering::SeqCst);
    async {
      tokio::time::sleep(Duration::from_millis(500)).await;
      Ok::<_, warp::Rejection>(warp::reply::json(&serde_json::json!({})))
    }
  });
  let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
  tokio::spawn(server);

  let fetcher = HttpFetcher::new("smarthub-tests/1.0", Duration::from_secs(2)).unwrap();
  let url = format!("http://{}/weather", addr);
  let outcome: FetchOutcome<serde_json::Value> = with_retry(&RetryPolicy::new(3, Duration::from_millis(20)), || {
    fetcher.fetch_with_timeout(&url, Duration::from_millis(100))
  })
  .await;

  assert_eq!(outcome, FetchOutcome::Failure(FetchFailure::Timeout));
  assert_eq!(hits.load(Ordering::SeqCst), 4);
}
