use std::{
  error::Error,
  io,
  time::{Duration, Instant},
};

use crossterm::{
  event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind},
  execute,
  terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;
use tui::{backend::CrosstermBackend, Terminal};

use smarthub::{
  config::Config,
  dashboard::{ui, App},
  fetcher::HttpFetcher,
  logging::init_file_logging,
  panel::Panel,
  scheduler::Scheduler,
  widgets::register_all,
};

fn main() -> Result<(), Box<dyn Error>> {
  let config = Config::from_env();
  init_file_logging(&config.log_file)?;
  info!("starting dashboard against {}", config.backend_url);

  let rt = Runtime::new()?;
  let fetcher = HttpFetcher::new(&config.user_agent, config.fetch_timeout)?;
  let (sink, mut panels) = unbounded_channel::<Panel>();
  let mut scheduler = Scheduler::new();
  register_all(&mut scheduler, &config, &fetcher, &sink);
  let handle = {
    let _guard = rt.enter();
    scheduler.start()
  };

  enable_raw_mode()?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend)?;

  let mut app = App::new(config.idle_return);
  let tick_rate = Duration::from_millis(250);
  let mut last_tick = Instant::now();

  let result = loop {
    while let Ok(panel) = panels.try_recv() {
      app.apply(panel, Instant::now());
    }
    app.tick(Instant::now());
    if let Err(e) = terminal.draw(|f| ui(f, &app, Instant::now())) {
      break Err(e);
    }

    let timeout = tick_rate
      .checked_sub(last_tick.elapsed())
      .unwrap_or_else(|| Duration::from_secs(0));
    match event::poll(timeout) {
      Ok(true) => match event::read() {
        Ok(CEvent::Key(key)) if key.kind == KeyEventKind::Press => {
          if app.handle_key(key.code, Instant::now()) {
            break Ok(());
          }
        }
        Ok(_) => {}
        Err(e) => break Err(e),
      },
      Ok(false) => {}
      Err(e) => break Err(e),
    }
    if last_tick.elapsed() >= tick_rate {
      last_tick = Instant::now();
    }
  };

  disable_raw_mode()?;
  execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
  terminal.show_cursor()?;

  handle.shutdown();
  rt.shutdown_timeout(Duration::from_secs(1));
  info!("dashboard stopped");
  result.map_err(Into::into)
}
