use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_stream::{wrappers::IntervalStream, StreamExt};
use tracing::{error, info};

use crate::task::{Refresh, RefreshState};

/// Independent repeating timers, one per registered task.
#[derive(Default)]
pub struct Scheduler {
  tasks: Vec<Arc<dyn Refresh>>,
}

impl Scheduler {
  pub fn new() -> Self {
    Self { tasks: Vec::new() }
  }

  pub fn register<T: Refresh + 'static>(&mut self, task: T) {
    self.tasks.push(Arc::new(task));
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  /// Starts every timer. The first tick fires immediately. Must be called
  /// from within a tokio runtime.
  pub fn start(self) -> SchedulerHandle {
    let timers = self
      .tasks
      .into_iter()
      .map(|task| {
        info!("scheduling {} every {:?}", task.id(), task.interval());
        tokio::spawn(run_timer(task))
      })
      .collect();
    SchedulerHandle { timers }
  }

  /// Refreshes every task once, concurrently, and waits for all of them.
  pub async fn run_once(&self) -> Vec<(&'static str, Option<RefreshState>)> {
    let refreshes = self.tasks.iter().map(|task| {
      let id = task.id();
      let handle = tokio::spawn(task.clone().refresh());
      async move {
        match handle.await {
          Ok(state) => (id, Some(state)),
          Err(e) => {
            error!("{}: refresh aborted: {}", id, e);
            (id, None)
          }
        }
      }
    });
    join_all(refreshes).await
  }
}

async fn run_timer(task: Arc<dyn Refresh>) {
  let mut ticker = interval(task.interval());
  ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
  let mut ticks = IntervalStream::new(ticker);
  while ticks.next().await.is_some() {
    // Each refresh gets its own task so a slow or panicking fetch never
    // holds up the timer.
    let refresh = tokio::spawn(task.clone().refresh());
    let id = task.id();
    tokio::spawn(async move {
      if let Err(e) = refresh.await {
        error!("{}: refresh aborted: {}", id, e);
      }
    });
  }
}

pub struct SchedulerHandle {
  timers: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
  pub fn shutdown(self) {
    for timer in &self.timers {
      timer.abort();
    }
    info!("scheduler stopped {} timers", self.timers.len());
  }
}
