use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
  #[error("request timed out")]
  Timeout,
  #[error("upstream returned HTTP {0}")]
  HttpError(u16),
  #[error("network error: {0}")]
  NetworkError(String),
  #[error("upstream returned an empty body")]
  EmptyResult,
}

impl FetchFailure {
  /// Transport failures get another attempt; an empty result is an answer.
  pub fn is_retryable(&self) -> bool {
    !matches!(self, FetchFailure::EmptyResult)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<P> {
  Success(P),
  Failure(FetchFailure),
}

impl<P> FetchOutcome<P> {
  pub fn into_result(self) -> Result<P, FetchFailure> {
    match self {
      FetchOutcome::Success(payload) => Ok(payload),
      FetchOutcome::Failure(failure) => Err(failure),
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, FetchOutcome::Success(_))
  }
}

impl<P> From<Result<P, FetchFailure>> for FetchOutcome<P> {
  fn from(result: Result<P, FetchFailure>) -> Self {
    match result {
      Ok(payload) => FetchOutcome::Success(payload),
      Err(failure) => FetchOutcome::Failure(failure),
    }
  }
}

/// One-shot HTTP GETs classified into a `FetchOutcome`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: Client,
  timeout: Duration,
}

impl HttpFetcher {
  pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
    let client = Client::builder().user_agent(user_agent).build()?;
    Ok(Self { client, timeout })
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  pub async fn fetch<P: DeserializeOwned>(&self, url: &str) -> FetchOutcome<P> {
    self.fetch_with_timeout(url, self.timeout).await
  }

  /// Send and body read share one deadline. On expiry the request future is
  /// dropped, which aborts the connection.
  pub async fn fetch_with_timeout<P: DeserializeOwned>(&self, url: &str, limit: Duration) -> FetchOutcome<P> {
    match timeout(limit, self.get_body(url)).await {
      Ok(Ok(body)) => decode(&body).into(),
      Ok(Err(failure)) => FetchOutcome::Failure(failure),
      Err(_) => {
        debug!("GET {} exceeded {:?}", url, limit);
        FetchOutcome::Failure(FetchFailure::Timeout)
      }
    }
  }

  async fn get_body(&self, url: &str) -> Result<Vec<u8>, FetchFailure> {
    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| FetchFailure::NetworkError(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
      return Err(FetchFailure::HttpError(status.as_u16()));
    }
    let body = response
      .bytes()
      .await
      .map_err(|e| FetchFailure::NetworkError(e.to_string()))?;
    Ok(body.to_vec())
  }
}

/// Decodes a 2xx body. Whitespace-only bodies count as no result at all.
pub fn decode<P: DeserializeOwned>(body: &[u8]) -> Result<P, FetchFailure> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Err(FetchFailure::EmptyResult);
  }
  serde_json::from_slice(body).map_err(|e| FetchFailure::NetworkError(format!("malformed payload: {}", e)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_list_is_a_success() {
    let outcome: Result<Vec<u32>, _> = decode(b"[]");
    assert_eq!(outcome, Ok(vec![]));
  }

  #[test]
  fn blank_body_is_an_empty_result() {
    let outcome: Result<Vec<u32>, _> = decode(b"  \n");
    assert_eq!(outcome, Err(FetchFailure::EmptyResult));
  }

  #[test]
  fn malformed_body_is_a_network_error() {
    let outcome: Result<Vec<u32>, _> = decode(b"{\"items\": [");
    assert!(matches!(outcome, Err(FetchFailure::NetworkError(msg)) if msg.starts_with("malformed payload")));
  }

  #[test]
  fn only_empty_result_is_final() {
    assert!(FetchFailure::Timeout.is_retryable());
    assert!(FetchFailure::HttpError(502).is_retryable());
    assert!(FetchFailure::NetworkError("refused".into()).is_retryable());
    assert!(!FetchFailure::EmptyResult.is_retryable());
  }
}
