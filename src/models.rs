//! Payload shapes returned by the backend proxy and MET Norway.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Loose JSON truthiness for backend flags: absent, `null`, `false`, `0` and
/// `""` all mean unset.
pub fn is_truthy(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) => false,
    Some(Value::Bool(b)) => *b,
    Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
    Some(Value::String(s)) => !s.is_empty(),
    Some(Value::Array(_)) | Some(Value::Object(_)) => true,
  }
}

// Departures (Entur journey planner, proxied)

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeparturesResponse {
  #[serde(default)]
  pub error: Option<Value>,
  #[serde(default)]
  pub data: Option<DeparturesData>,
}

impl DeparturesResponse {
  /// The backend reports upstream trouble as a truthy `error` field.
  pub fn has_error(&self) -> bool {
    is_truthy(self.error.as_ref())
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeparturesData {
  #[serde(default)]
  pub stop_place: Option<StopPlace>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPlace {
  #[serde(default)]
  pub estimated_calls: Vec<EstimatedCall>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedCall {
  #[serde(default)]
  pub expected_departure_time: Option<DateTime<FixedOffset>>,
  #[serde(default)]
  pub aimed_departure_time: Option<DateTime<FixedOffset>>,
  #[serde(default)]
  pub destination_display: Option<DestinationDisplay>,
  #[serde(default)]
  pub service_journey: Option<ServiceJourney>,
}

impl EstimatedCall {
  pub fn departure_time(&self) -> Option<DateTime<FixedOffset>> {
    self.expected_departure_time.or(self.aimed_departure_time)
  }

  pub fn destination(&self) -> Option<&str> {
    self.destination_display.as_ref().and_then(|d| d.front_text.as_deref())
  }

  pub fn line_code(&self) -> Option<&str> {
    self
      .service_journey
      .as_ref()
      .and_then(|j| j.line.as_ref())
      .and_then(|l| l.public_code.as_deref())
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationDisplay {
  #[serde(default)]
  pub front_text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceJourney {
  #[serde(default)]
  pub line: Option<Line>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
  #[serde(default)]
  pub public_code: Option<String>,
}

// News

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
  pub title: String,
  #[serde(default)]
  pub source: Option<String>,
  #[serde(default)]
  pub source_color: Option<String>,
}

// Weather (MET Norway locationforecast compact)

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Forecast {
  #[serde(default)]
  pub properties: Option<ForecastProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastProperties {
  #[serde(default)]
  pub timeseries: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
  pub time: DateTime<FixedOffset>,
  pub data: ForecastData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastData {
  pub instant: InstantData,
  #[serde(default)]
  pub next_1_hours: Option<Period>,
  #[serde(default)]
  pub next_6_hours: Option<Period>,
}

impl ForecastData {
  pub fn symbol_1h_first(&self) -> Option<&str> {
    period_symbol(&self.next_1_hours).or_else(|| period_symbol(&self.next_6_hours))
  }

  pub fn symbol_6h_first(&self) -> Option<&str> {
    period_symbol(&self.next_6_hours).or_else(|| period_symbol(&self.next_1_hours))
  }
}

fn period_symbol(period: &Option<Period>) -> Option<&str> {
  period.as_ref().map(|p| p.summary.symbol_code.as_str())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstantData {
  pub details: InstantDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstantDetails {
  #[serde(default)]
  pub air_temperature: f64,
  #[serde(default)]
  pub wind_speed: f64,
  #[serde(default)]
  pub wind_from_direction: f64,
  #[serde(default)]
  pub relative_humidity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
  pub summary: PeriodSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummary {
  pub symbol_code: String,
}

// Football

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FootballResponse {
  #[serde(default)]
  pub show: bool,
  #[serde(default)]
  pub fixtures: Vec<Fixture>,
  #[serde(default)]
  pub deadline: Option<Deadline>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
  pub competition: String,
  pub home: String,
  pub away: String,
  pub kickoff: DateTime<FixedOffset>,
  #[serde(default)]
  pub started: bool,
  #[serde(default)]
  pub finished: bool,
  /// The feed sends the match minute as a string or a number.
  #[serde(default)]
  pub minute: Option<Value>,
  #[serde(default)]
  pub home_score: Option<u32>,
  #[serde(default)]
  pub away_score: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deadline {
  pub name: String,
  pub time: DateTime<FixedOffset>,
}

// Stocks

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
  pub symbol: String,
  #[serde(default)]
  pub price: f64,
  #[serde(default)]
  pub change: f64,
  #[serde(default)]
  pub currency: Option<String>,
  #[serde(default)]
  pub session: Option<String>,
  #[serde(default)]
  pub is_index: bool,
}

// Calendar

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarResponse {
  #[serde(default)]
  pub today: Vec<CalendarEvent>,
  #[serde(default)]
  pub tomorrow: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
  pub summary: String,
  #[serde(default)]
  pub time: Option<String>,
  #[serde(default)]
  pub end_time: Option<String>,
  #[serde(default)]
  pub all_day: bool,
}

// Shopping

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShoppingList {
  #[serde(default)]
  pub items: Vec<ShoppingItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingItem {
  pub text: String,
  #[serde(default)]
  pub checked: bool,
}

// CPU temperature

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemperatureReading {
  #[serde(default)]
  pub temperature: Option<f64>,
  #[serde(default)]
  pub unit: Option<String>,
  #[serde(default)]
  pub error: Option<Value>,
}

impl TemperatureReading {
  pub fn has_error(&self) -> bool {
    is_truthy(self.error.as_ref())
  }
}
