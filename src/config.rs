use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const MET_FORECAST_URL: &str = "https://api.met.no/weatherapi/locationforecast/2.0/compact";

/// Destinations heading away from the city centre. Departures whose
/// destination contains any of these (case-insensitive) are hidden.
pub const SOUTHBOUND_DESTINATIONS: &[&str] = &[
  "vadmyra",
  "fyllingsdalen",
  "løvstakk",
  "hesjaholtet",
  "skogsskiftet",
  "sletten",
  "fana",
  "nesttun",
  "birkelund",
  "støbotn",
  "laksevåg",
  "loddefjord",
  "storavatnet",
  "mathopen",
  "alvøen",
  "bønes",
  "olsvik",
  "søndre skogveien",
  "ravnanger terminal",
  "barliveien",
  "ågotnes terminal",
  "lyngbø",
  "wergeland",
  "straume terminal",
  "anglevik",
  "birkelandsskiftet",
  "hjelteryggen",
  "steinrusten",
  "brattholmen",
];

#[derive(Debug, Clone)]
pub struct Config {
  pub backend_url: String,
  pub weather_lat: f64,
  pub weather_lon: f64,
  pub user_agent: String,
  pub fetch_timeout: Duration,
  pub excluded_destinations: Vec<String>,
  pub idle_return: Duration,
  pub log_file: PathBuf,
}

impl Config {
  pub fn from_env() -> Self {
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    let backend_url = lookup("HUB_BACKEND_URL")
      .unwrap_or_else(|| DEFAULT_BACKEND_URL.into())
      .trim_end_matches('/')
      .to_string();
    let excluded_destinations = match lookup("HUB_EXCLUDED_DESTINATIONS") {
      Some(list) => list
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect(),
      None => SOUTHBOUND_DESTINATIONS.iter().map(|s| s.to_string()).collect(),
    };

    Self {
      backend_url,
      weather_lat: parse_or(lookup("HUB_WEATHER_LAT"), 60.3897),
      weather_lon: parse_or(lookup("HUB_WEATHER_LON"), 5.3186),
      user_agent: lookup("HUB_USER_AGENT").unwrap_or_else(|| "SmartHub-WH56/1.0 github.com/smarthub".into()),
      fetch_timeout: Duration::from_millis(parse_or(lookup("HUB_FETCH_TIMEOUT_MS"), 15_000)),
      excluded_destinations,
      idle_return: Duration::from_secs(parse_or(lookup("HUB_IDLE_RETURN_SECS"), 180)),
      log_file: lookup("HUB_LOG_FILE").unwrap_or_else(|| "smarthub.log".into()).into(),
    }
  }

  pub fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.backend_url, path.trim_start_matches('/'))
  }

  pub fn weather_url(&self) -> String {
    format!("{}?lat={}&lon={}", MET_FORECAST_URL, self.weather_lat, self.weather_lon)
  }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
  value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
