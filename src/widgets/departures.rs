use chrono::{DateTime, FixedOffset};

use crate::models::DeparturesResponse;
use crate::panel::{Notice, PanelBody, PanelLine, Tone};

pub const MAX_SHOWN: usize = 6;
/// Departures this close are unreachable from the door.
pub const MIN_LEAD_MINUTES: i64 = 2;
pub const SOON_MINUTES: i64 = 5;

/// Case-insensitive substring exclusion on destination names.
#[derive(Debug, Clone)]
pub struct DestinationFilter {
  excluded: Vec<String>,
}

impl DestinationFilter {
  pub fn new<I, S>(excluded: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self { excluded: excluded.into_iter().map(|s| s.as_ref().to_lowercase()).collect() }
  }

  pub fn allows(&self, destination: &str) -> bool {
    let dest = destination.to_lowercase();
    !self.excluded.iter().any(|ex| dest.contains(ex.as_str()))
  }
}

pub fn minutes_until(departure: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> i64 {
  let millis = (departure - now).num_milliseconds() as f64;
  (millis / 60_000.0).round() as i64
}

pub fn format_minutes(minutes: i64) -> String {
  match minutes {
    m if m <= 0 => "nå".to_string(),
    1 => "1 min".to_string(),
    m => format!("{} min", m),
  }
}

pub fn render(response: &DeparturesResponse, filter: &DestinationFilter, now: DateTime<FixedOffset>) -> Result<PanelBody, Notice> {
  if response.has_error() {
    return Err(Notice::transport("Kunne ikke hente avganger").with_hint("Sjekk nettverkstilkobling"));
  }
  let stop_place = response
    .data
    .as_ref()
    .and_then(|d| d.stop_place.as_ref())
    .ok_or_else(|| Notice::empty_upstream("Ingen data fra Entur").with_hint("Prøver igjen snart..."))?;

  if stop_place.estimated_calls.is_empty() {
    return Err(Notice::empty_upstream("Ingen avganger funnet"));
  }

  let northbound: Vec<_> = stop_place
    .estimated_calls
    .iter()
    .filter(|call| filter.allows(call.destination().unwrap_or("")))
    .collect();
  if northbound.is_empty() {
    return Err(Notice::empty_after_filter("Ingen avganger mot sentrum"));
  }

  let mut lines = Vec::new();
  for call in northbound {
    if lines.len() >= MAX_SHOWN {
      break;
    }
    let Some(time) = call.departure_time() else {
      continue;
    };
    let minutes = minutes_until(time, now);
    if minutes <= MIN_LEAD_MINUTES {
      continue;
    }
    let time_tone = if minutes <= SOON_MINUTES { Tone::Warn } else { Tone::Normal };
    lines.push(
      PanelLine::new()
        .push(format!("{:>4} ", call.line_code().unwrap_or("?")), Tone::Accent)
        .push(format!("{} ", call.destination().unwrap_or("Ukjent")), Tone::Normal)
        .push(format_minutes(minutes), time_tone),
    );
  }

  if lines.is_empty() {
    return Err(Notice::empty_after_filter("Ingen avganger snart").with_hint("Neste avgang om en stund"));
  }
  Ok(PanelBody::Lines(lines))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::panel::NoticeKind;
  use chrono::Duration;
  use serde_json::json;

  fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2025-03-10T08:00:00+01:00").unwrap()
  }

  fn call(line: &str, dest: &str, minutes_ahead: i64) -> serde_json::Value {
    json!({
      "expectedDepartureTime": (now() + Duration::minutes(minutes_ahead)).to_rfc3339(),
      "destinationDisplay": { "frontText": dest },
      "serviceJourney": { "line": { "publicCode": line } }
    })
  }

  fn response(calls: Vec<serde_json::Value>) -> DeparturesResponse {
    serde_json::from_value(json!({ "data": { "stopPlace": { "estimatedCalls": calls } } })).unwrap()
  }

  fn filter() -> DestinationFilter {
    DestinationFilter::new(["fana", "Loddefjord"])
  }

  fn shown(body: PanelBody) -> Vec<String> {
    match body {
      PanelBody::Lines(lines) => lines.iter().map(PanelLine::text).collect(),
      other => panic!("expected lines, got {:?}", other),
    }
  }

  #[test]
  fn error_flag_is_a_transport_notice() {
    let resp: DeparturesResponse = serde_json::from_value(json!({ "error": true })).unwrap();
    let notice = render(&resp, &filter(), now()).unwrap_err();
    assert_eq!(notice.kind, NoticeKind::TransportFailure);
    assert_eq!(notice.message, "Kunne ikke hente avganger");
  }

  #[test]
  fn missing_stop_place_is_empty_upstream() {
    let resp: DeparturesResponse = serde_json::from_value(json!({ "data": {} })).unwrap();
    let notice = render(&resp, &filter(), now()).unwrap_err();
    assert_eq!(notice.kind, NoticeKind::EmptyUpstream);
    assert_eq!(notice.message, "Ingen data fra Entur");
  }

  #[test]
  fn no_calls_is_no_departures_found() {
    let notice = render(&response(vec![]), &filter(), now()).unwrap_err();
    assert_eq!(notice.kind, NoticeKind::EmptyUpstream);
    assert_eq!(notice.message, "Ingen avganger funnet");
  }

  #[test]
  fn excluded_destinations_are_dropped_case_insensitively() {
    let resp = response(vec![
      call("3", "Birkelandsskiftet via FANA", 10),
      call("5", "Sentrum", 12),
      call("6", "LODDEFJORD", 14),
      call("20", "Åsane terminal", 16),
    ]);
    let lines = shown(render(&resp, &filter(), now()).unwrap());
    assert_eq!(lines, vec!["   5 Sentrum 12 min", "  20 Åsane terminal 16 min"]);
  }

  #[test]
  fn everything_excluded_is_empty_after_filter() {
    let resp = response(vec![call("3", "Fana", 10)]);
    let notice = render(&resp, &filter(), now()).unwrap_err();
    assert_eq!(notice.kind, NoticeKind::EmptyAfterFilter);
    assert_eq!(notice.message, "Ingen avganger mot sentrum");
  }

  #[test]
  fn departures_within_two_minutes_are_skipped_in_order() {
    let resp = response(vec![
      call("1", "Sentrum", 1),
      call("2", "Sentrum", 4),
      call("3", "Sentrum", 2),
      call("4", "Sentrum", 9),
      call("5", "Sentrum", 15),
    ]);
    let lines = shown(render(&resp, &filter(), now()).unwrap());
    assert_eq!(lines, vec!["   2 Sentrum 4 min", "   4 Sentrum 9 min", "   5 Sentrum 15 min"]);
  }

  #[test]
  fn soon_departures_get_warning_tone() {
    let resp = response(vec![call("2", "Sentrum", 4), call("4", "Sentrum", 9)]);
    match render(&resp, &filter(), now()).unwrap() {
      PanelBody::Lines(lines) => {
        assert_eq!(lines[0].segments[2].tone, Tone::Warn);
        assert_eq!(lines[1].segments[2].tone, Tone::Normal);
      }
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn at_most_six_are_shown() {
    let calls = (0..10).map(|i| call(&i.to_string(), "Sentrum", 5 + i)).collect();
    let lines = shown(render(&response(calls), &filter(), now()).unwrap());
    assert_eq!(lines.len(), MAX_SHOWN);
  }

  #[test]
  fn only_imminent_departures_is_nothing_soon() {
    let resp = response(vec![call("1", "Sentrum", 0), call("2", "Sentrum", 2)]);
    let notice = render(&resp, &filter(), now()).unwrap_err();
    assert_eq!(notice.kind, NoticeKind::EmptyAfterFilter);
    assert_eq!(notice.message, "Ingen avganger snart");
  }

  #[test]
  fn minute_labels() {
    assert_eq!(format_minutes(-1), "nå");
    assert_eq!(format_minutes(0), "nå");
    assert_eq!(format_minutes(1), "1 min");
    assert_eq!(format_minutes(7), "7 min");
  }

  #[test]
  fn minutes_are_rounded() {
    let dep = now() + Duration::seconds(150);
    assert_eq!(minutes_until(dep, now()), 3);
    let dep = now() + Duration::seconds(89);
    assert_eq!(minutes_until(dep, now()), 1);
  }
}
