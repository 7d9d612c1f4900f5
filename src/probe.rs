use tokio::sync::mpsc::unbounded_channel;
use tracing::{info, warn};

use smarthub::{config::Config, fetcher::HttpFetcher, scheduler::Scheduler, widgets::register_all};

/// Refreshes every widget once and prints what the dashboard would show.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt::init();
  let config = Config::from_env();
  let fetcher = HttpFetcher::new(&config.user_agent, config.fetch_timeout)?;
  let (sink, mut panels) = unbounded_channel();
  let mut scheduler = Scheduler::new();
  register_all(&mut scheduler, &config, &fetcher, &sink);

  for (id, state) in scheduler.run_once().await {
    match state {
      Some(state) => info!("{}: {:?}", id, state),
      None => warn!("{}: refresh did not finish", id),
    }
  }

  while let Ok(panel) = panels.try_recv() {
    println!("{:<12} {}", panel.widget, panel.body.summary());
  }
  Ok(())
}
