//! Last-good payload per widget and the stale-versus-fresh display policy.

use crate::fetcher::{FetchFailure, FetchOutcome};
use crate::panel::{Notice, PanelBody};

/// What the panel should show when a refresh does not produce content.
#[derive(Debug, Clone, PartialEq)]
pub struct Fallbacks {
  /// Shown on a transport failure while nothing has been cached.
  pub failure: PanelBody,
  /// Shown when the upstream answers with an empty body.
  pub empty: Notice,
}

impl Fallbacks {
  pub fn new(failure_message: &str) -> Self {
    Self {
      failure: PanelBody::Notice(Notice::transport(failure_message).with_hint("Prøver igjen snart")),
      empty: Notice::empty_upstream("Ingen data"),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
  Rendered(PanelBody),
  /// A transport failure with a cached payload on screen: leave it alone.
  Suppressed(String),
  ErrorShown(PanelBody),
}

impl Applied {
  /// The body to push to the panel, if any.
  pub fn into_body(self) -> Option<PanelBody> {
    match self {
      Applied::Rendered(body) | Applied::ErrorShown(body) => Some(body),
      Applied::Suppressed(_) => None,
    }
  }
}

#[derive(Debug)]
pub struct RenderCache<P> {
  last_good: Option<P>,
}

impl<P> Default for RenderCache<P> {
  fn default() -> Self {
    Self { last_good: None }
  }
}

impl<P> RenderCache<P> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn last_good(&self) -> Option<&P> {
    self.last_good.as_ref()
  }

  pub fn apply<R>(&mut self, outcome: FetchOutcome<P>, render: R, fallbacks: &Fallbacks) -> Applied
  where
    R: Fn(&P) -> Result<PanelBody, Notice>,
  {
    match outcome {
      FetchOutcome::Success(payload) => match render(&payload) {
        Ok(body) => self.commit(payload, body),
        Err(notice) if notice.is_transport() => self.transport_failure(notice.message.clone(), PanelBody::Notice(notice)),
        Err(notice) => self.commit(payload, PanelBody::Notice(notice)),
      },
      FetchOutcome::Failure(FetchFailure::EmptyResult) => Applied::Rendered(PanelBody::Notice(fallbacks.empty.clone())),
      FetchOutcome::Failure(failure) => self.transport_failure(failure.to_string(), fallbacks.failure.clone()),
    }
  }

  fn commit(&mut self, payload: P, body: PanelBody) -> Applied {
    self.last_good = Some(payload);
    Applied::Rendered(body)
  }

  fn transport_failure(&self, reason: String, body: PanelBody) -> Applied {
    if self.last_good.is_some() {
      Applied::Suppressed(reason)
    } else {
      Applied::ErrorShown(body)
    }
  }
}
