//! The dashboard's widgets: payload render functions and the table that wires
//! each one to its endpoint, interval, and retry policy.

pub mod calendar;
pub mod departures;
pub mod football;
pub mod news;
pub mod shopping;
pub mod stocks;
pub mod temperature;
pub mod weather;

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::fetcher::{FetchOutcome, HttpFetcher};
use crate::models::{DeparturesResponse, Forecast, FootballResponse};
use crate::panel::{Notice, PanelBody, PanelSink};
use crate::retry::RetryPolicy;
use crate::scheduler::Scheduler;
use crate::task::WidgetTask;

pub const DEPARTURES: &str = "departures";
pub const NEWS: &str = "news";
pub const WEATHER: &str = "weather";
pub const FOOTBALL: &str = "football";
pub const STOCKS: &str = "stocks";
pub const CALENDAR: &str = "calendar";
pub const SHOPPING: &str = "shopping";
pub const TEMPERATURE: &str = "temperature";

/// Widget ids and panel titles, in display order.
pub const WIDGETS: &[(&str, &str)] = &[
  (DEPARTURES, "Bussavganger"),
  (WEATHER, "Vær"),
  (CALENDAR, "Kalender"),
  (SHOPPING, "Handleliste"),
  (FOOTBALL, "Fotball"),
  (STOCKS, "Aksjer"),
  (NEWS, "Nyheter"),
  (TEMPERATURE, "CPU"),
];

pub const NEWS_TIMEOUT: Duration = Duration::from_secs(30);
pub const NEWS_RETRY: RetryPolicy = RetryPolicy::new(3, Duration::from_secs(3));
pub const WEATHER_RETRY: RetryPolicy = RetryPolicy::new(3, Duration::from_secs(3));

pub fn interval_for(widget: &str) -> Duration {
  match widget {
    DEPARTURES | SHOPPING | TEMPERATURE => Duration::from_secs(30),
    FOOTBALL | STOCKS => Duration::from_secs(60),
    NEWS | CALENDAR => Duration::from_secs(5 * 60),
    WEATHER => Duration::from_secs(30 * 60),
    _ => Duration::from_secs(60),
  }
}

/// Keeps each request well inside its polling interval.
pub fn timeout_for(widget: &str, configured: Duration) -> Duration {
  configured.min(interval_for(widget) / 2)
}

pub fn title_for(widget: &str) -> &'static str {
  WIDGETS
    .iter()
    .find(|(id, _)| *id == widget)
    .map(|(_, title)| *title)
    .unwrap_or("Widget")
}

fn local_now() -> DateTime<FixedOffset> {
  Local::now().fixed_offset()
}

fn json_fetch<P>(fetcher: &HttpFetcher, url: String, timeout: Duration) -> impl Fn() -> BoxFuture<'static, FetchOutcome<P>> + Send + Sync + 'static
where
  P: DeserializeOwned + Send + 'static,
{
  let fetcher = fetcher.clone();
  move || {
    let fetcher = fetcher.clone();
    let url = url.clone();
    async move { fetcher.fetch_with_timeout(&url, timeout).await }.boxed()
  }
}

fn task<P, R>(widget: &'static str, url: String, timeout: Duration, fetcher: &HttpFetcher, render: R, sink: &PanelSink) -> WidgetTask<P>
where
  P: DeserializeOwned + Send + 'static,
  R: Fn(&P) -> Result<PanelBody, Notice> + Send + Sync + 'static,
{
  WidgetTask::new(
    widget,
    title_for(widget),
    interval_for(widget),
    json_fetch(fetcher, url, timeout_for(widget, timeout)),
    render,
    sink.clone(),
  )
}

/// Registers every fetched widget. The clock is drawn locally and has no task.
pub fn register_all(scheduler: &mut Scheduler, config: &Config, fetcher: &HttpFetcher, sink: &PanelSink) {
  let timeout = fetcher.timeout();
  let filter = departures::DestinationFilter::new(&config.excluded_destinations);

  scheduler.register(
    task(
      DEPARTURES,
      config.endpoint("departures"),
      timeout,
      fetcher,
      move |resp: &DeparturesResponse| departures::render(resp, &filter, local_now()),
      sink,
    )
    .on_failure(PanelBody::Notice(Notice::transport("Tilkoblingsfeil").with_hint("Prøver igjen om 30 sek")))
    .on_empty(Notice::empty_upstream("Ingen data fra Entur")),
  );

  scheduler.register(
    task(NEWS, config.endpoint("news/all"), NEWS_TIMEOUT, fetcher, news::render, sink)
      .with_retry(NEWS_RETRY)
      .on_failure(PanelBody::Notice(Notice::transport("Kunne ikke laste nyheter")))
      .on_empty(Notice::empty_upstream("Ingen nyheter")),
  );

  scheduler.register(
    task(WEATHER, config.weather_url(), timeout, fetcher, |fc: &Forecast| weather::render(fc, local_now()), sink)
      .with_retry(WEATHER_RETRY)
      .on_failure(PanelBody::Notice(Notice::transport("Kunne ikke laste værdata"))),
  );

  scheduler.register(
    task(FOOTBALL, config.endpoint("football"), timeout, fetcher, |resp: &FootballResponse| football::render(resp, local_now()), sink)
      .on_failure(PanelBody::Hidden)
      .on_empty(Notice::empty_upstream("Ingen kamper i dag")),
  );

  scheduler.register(
    task(STOCKS, config.endpoint("stocks"), timeout, fetcher, stocks::render, sink)
      .on_failure(PanelBody::Notice(Notice::transport("Kunne ikke laste aksjer")))
      .on_empty(Notice::empty_upstream("Ingen aksjedata")),
  );

  scheduler.register(
    task(CALENDAR, config.endpoint("calendar"), timeout, fetcher, calendar::render, sink)
      .on_failure(PanelBody::Notice(Notice::transport("Kunne ikke laste kalender").with_hint("Prøver igjen snart")))
      .on_empty(Notice::empty_upstream("Ingen hendelser")),
  );

  scheduler.register(
    task(SHOPPING, config.endpoint("shopping"), timeout, fetcher, shopping::render, sink)
      .on_failure(PanelBody::Notice(Notice::transport("Kunne ikke laste")))
      .on_empty(Notice::empty_upstream("Listen er tom!")),
  );

  scheduler.register(
    task(TEMPERATURE, config.endpoint("temperature"), timeout, fetcher, temperature::render, sink)
      .on_failure(PanelBody::Notice(Notice::transport("--°C"))),
  );
}
