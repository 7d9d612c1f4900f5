use std::sync::LazyLock;

use chrono::{DateTime, Duration, FixedOffset};
use regex::Regex;

use crate::models::{Forecast, ForecastEntry};
use crate::panel::{Notice, PanelBody, PanelLine, Tone};

pub const FORECAST_SLOTS: usize = 4;

static DAY_NIGHT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_day|_night|_polartwilight").expect("static pattern"));

const DESCRIPTIONS: &[(&str, &str)] = &[
  ("clearsky", "Klarvær"),
  ("fair", "Lettskyet"),
  ("partlycloudy", "Delvis skyet"),
  ("cloudy", "Skyet"),
  ("lightrainshowers", "Lette regnbyger"),
  ("rainshowers", "Regnbyger"),
  ("heavyrainshowers", "Kraftige regnbyger"),
  ("lightrainshowersandthunder", "Lette regnbyger og torden"),
  ("rainshowersandthunder", "Regnbyger og torden"),
  ("heavyrainshowersandthunder", "Kraftige regnbyger og torden"),
  ("lightsleetshowers", "Lette sluddbyger"),
  ("sleetshowers", "Sluddbyger"),
  ("heavysleetshowers", "Kraftige sluddbyger"),
  ("lightsnowshowers", "Lette snøbyger"),
  ("snowshowers", "Snøbyger"),
  ("heavysnowshowers", "Kraftige snøbyger"),
  ("lightrain", "Lett regn"),
  ("rain", "Regn"),
  ("heavyrain", "Kraftig regn"),
  ("lightrainandthunder", "Lett regn og torden"),
  ("rainandthunder", "Regn og torden"),
  ("heavyrainandthunder", "Kraftig regn og torden"),
  ("lightsleet", "Lett sludd"),
  ("sleet", "Sludd"),
  ("heavysleet", "Kraftig sludd"),
  ("lightsnow", "Lett snø"),
  ("snow", "Snø"),
  ("heavysnow", "Kraftig snø"),
  ("fog", "Tåke"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherTheme {
  Sunny,
  PartlyCloudy,
  Cloudy,
  Rainy,
  Snowy,
  Thunder,
}

impl WeatherTheme {
  pub fn from_symbol(symbol: &str) -> Self {
    let base = base_symbol(symbol);
    if base.contains("snow") {
      WeatherTheme::Snowy
    } else if base.contains("thunder") {
      WeatherTheme::Thunder
    } else if base.contains("rain") || base.contains("sleet") {
      WeatherTheme::Rainy
    } else if base == "cloudy" || base == "fog" {
      WeatherTheme::Cloudy
    } else if base == "partlycloudy" {
      WeatherTheme::PartlyCloudy
    } else {
      WeatherTheme::Sunny
    }
  }

  pub fn tone(self) -> Tone {
    match self {
      WeatherTheme::Sunny => Tone::Warn,
      WeatherTheme::PartlyCloudy | WeatherTheme::Cloudy => Tone::Muted,
      WeatherTheme::Rainy => Tone::Accent,
      WeatherTheme::Snowy => Tone::Normal,
      WeatherTheme::Thunder => Tone::Bad,
    }
  }
}

pub fn base_symbol(symbol: &str) -> String {
  DAY_NIGHT_SUFFIX.replace_all(symbol, "").into_owned()
}

/// Norwegian description, or the raw symbol code when unknown.
pub fn describe(symbol: &str) -> String {
  let base = base_symbol(symbol);
  DESCRIPTIONS
    .iter()
    .find(|(code, _)| *code == base)
    .map(|(_, text)| text.to_string())
    .unwrap_or_else(|| symbol.to_string())
}

pub fn wind_direction(degrees: f64) -> &'static str {
  const DIRECTIONS: [&str; 8] = ["N", "NØ", "Ø", "SØ", "S", "SV", "V", "NV"];
  let index = (degrees / 45.0).round().rem_euclid(8.0) as usize;
  DIRECTIONS[index % 8]
}

/// Rounds half up, like the browser widgets did.
fn round_temp(value: f64) -> i64 {
  (value + 0.5).floor() as i64
}

/// Entries at least three hours ahead that carry a six hour summary, spaced
/// at least five hours apart.
pub fn pick_forecasts(timeseries: &[ForecastEntry], now: DateTime<FixedOffset>) -> Vec<&ForecastEntry> {
  let mut picked: Vec<&ForecastEntry> = Vec::new();
  for entry in timeseries {
    if picked.len() >= FORECAST_SLOTS {
      break;
    }
    if entry.time - now < Duration::hours(3) || entry.data.next_6_hours.is_none() {
      continue;
    }
    match picked.last() {
      Some(last) if entry.time - last.time < Duration::hours(5) => {}
      _ => picked.push(entry),
    }
  }
  picked
}

pub fn render(forecast: &Forecast, now: DateTime<FixedOffset>) -> Result<PanelBody, Notice> {
  let timeseries = forecast
    .properties
    .as_ref()
    .map(|p| p.timeseries.as_slice())
    .unwrap_or_default();
  let Some(current) = timeseries.first() else {
    return Err(Notice::empty_upstream("Ingen værdata").with_hint("Prøver igjen snart"));
  };

  let details = &current.data.instant.details;
  let symbol = current.data.symbol_1h_first().unwrap_or("cloudy");
  let theme = WeatherTheme::from_symbol(symbol);

  let mut lines = vec![
    PanelLine::new()
      .push(format!("{}°C  ", round_temp(details.air_temperature)), Tone::Heading)
      .push(describe(symbol), theme.tone()),
    PanelLine::new()
      .push(format!("Vind {} m/s {}", details.wind_speed, wind_direction(details.wind_from_direction)), Tone::Normal)
      .push(format!("  ·  {}% fuktighet", details.relative_humidity), Tone::Muted),
  ];

  for entry in pick_forecasts(timeseries, now) {
    let fd = &entry.data.instant.details;
    let symbol = entry.data.symbol_6h_first().unwrap_or("cloudy");
    let label = entry.time.with_timezone(now.offset()).format("%H:00");
    lines.push(
      PanelLine::new()
        .push(format!("{}  ", label), Tone::Muted)
        .push(format!("{:>3}°  ", round_temp(fd.air_temperature)), Tone::Normal)
        .push(format!("{} m/s  ", fd.wind_speed), Tone::Muted)
        .push(describe(symbol), WeatherTheme::from_symbol(symbol).tone()),
    );
  }
  Ok(PanelBody::Lines(lines))
}
