use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{Applied, Fallbacks, RenderCache};
use crate::fetcher::FetchOutcome;
use crate::panel::{Notice, Panel, PanelBody, PanelSink};
use crate::retry::{with_retry, RetryPolicy};

pub type FetchFn<P> = Arc<dyn Fn() -> BoxFuture<'static, FetchOutcome<P>> + Send + Sync>;
pub type RenderFn<P> = Arc<dyn Fn(&P) -> Result<PanelBody, Notice> + Send + Sync>;

/// Where a single refresh ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
  Rendering,
  Suppressed,
  ErrorShown,
  /// A newer refresh landed while this one was in flight.
  Discarded,
}

/// Anything the scheduler can tick.
pub trait Refresh: Send + Sync {
  fn id(&self) -> &'static str;
  fn interval(&self) -> Duration;
  fn refresh(self: Arc<Self>) -> BoxFuture<'static, RefreshState>;
}

struct TaskState<P> {
  cache: RenderCache<P>,
  /// Last generation handed out.
  generation: u64,
  /// Newest generation whose response reached the cache.
  committed: u64,
}

pub struct WidgetTask<P> {
  id: &'static str,
  title: String,
  interval: Duration,
  fetch: FetchFn<P>,
  render: RenderFn<P>,
  retry: RetryPolicy,
  fallbacks: Fallbacks,
  sink: PanelSink,
  state: Mutex<TaskState<P>>,
}

impl<P: Send + 'static> WidgetTask<P> {
  pub fn new<F, Fut, R>(id: &'static str, title: impl Into<String>, interval: Duration, fetch: F, render: R, sink: PanelSink) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FetchOutcome<P>> + Send + 'static,
    R: Fn(&P) -> Result<PanelBody, Notice> + Send + Sync + 'static,
  {
    Self {
      id,
      title: title.into(),
      interval,
      fetch: Arc::new(move || fetch().boxed()),
      render: Arc::new(render),
      retry: RetryPolicy::none(),
      fallbacks: Fallbacks::new("Kunne ikke laste"),
      sink,
      state: Mutex::new(TaskState { cache: RenderCache::new(), generation: 0, committed: 0 }),
    }
  }

  pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  pub fn on_failure(mut self, body: PanelBody) -> Self {
    self.fallbacks.failure = body;
    self
  }

  pub fn on_empty(mut self, notice: Notice) -> Self {
    self.fallbacks.empty = notice;
    self
  }

  pub async fn has_cached_payload(&self) -> bool {
    self.state.lock().await.cache.last_good().is_some()
  }

  async fn run_refresh(self: Arc<Self>) -> RefreshState {
    let generation = {
      let mut state = self.state.lock().await;
      state.generation += 1;
      state.generation
    };

    let fetch = self.fetch.clone();
    let outcome = with_retry(&self.retry, || fetch()).await;

    let mut state = self.state.lock().await;
    // A slower refresh may still land while newer ones are in flight, but
    // never on top of a newer response.
    if generation <= state.committed {
      debug!("{}: dropping response from refresh #{}, #{} already landed", self.id, generation, state.committed);
      return RefreshState::Discarded;
    }
    state.committed = generation;

    let render = self.render.clone();
    let applied = state.cache.apply(outcome, |payload| render(payload), &self.fallbacks);
    drop(state);

    let refresh_state = match &applied {
      Applied::Rendered(_) => RefreshState::Rendering,
      Applied::Suppressed(reason) => {
        warn!("{}: refresh failed, keeping last good content: {}", self.id, reason);
        RefreshState::Suppressed
      }
      Applied::ErrorShown(_) => {
        warn!("{}: refresh failed with nothing cached", self.id);
        RefreshState::ErrorShown
      }
    };

    if let Some(body) = applied.into_body() {
      let panel = Panel { widget: self.id, title: self.title.clone(), body };
      if self.sink.send(panel).is_err() {
        info!("{}: display closed, dropping panel update", self.id);
      }
    }
    refresh_state
  }
}

impl<P: Send + 'static> Refresh for WidgetTask<P> {
  fn id(&self) -> &'static str {
    self.id
  }

  fn interval(&self) -> Duration {
    self.interval
  }

  fn refresh(self: Arc<Self>) -> BoxFuture<'static, RefreshState> {
    self.run_refresh().boxed()
  }
}
