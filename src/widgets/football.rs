use chrono::{DateTime, FixedOffset};

use crate::models::{Deadline, Fixture, FootballResponse};
use crate::panel::{Notice, PanelBody, PanelLine, Tone};

/// Panel heading derived from which competitions play today.
pub fn title(fixtures: &[Fixture]) -> &'static str {
  let has = |code: &str| fixtures.iter().any(|f| f.competition == code);
  match (has("PL"), has("CL")) {
    (true, true) => "PL & CL",
    (false, true) => "Champions League",
    _ => "Premier League",
  }
}

pub fn deadline_label(deadline: &Deadline, now: DateTime<FixedOffset>) -> String {
  let remaining = deadline.time - now;
  if remaining.num_milliseconds() <= 0 {
    return format!("{} passert", deadline.name);
  }
  let hours = remaining.num_hours();
  let minutes = remaining.num_minutes() % 60;
  if hours > 0 {
    format!("⏱ {}: {}t {}m", deadline.name, hours, minutes)
  } else {
    format!("⏱ {}: {}m", deadline.name, minutes)
  }
}

fn minute_label(minute: Option<&serde_json::Value>) -> Option<String> {
  let text = match minute? {
    serde_json::Value::String(s) => s.trim().to_string(),
    serde_json::Value::Number(n) => n.to_string(),
    _ => return None,
  };
  if text.is_empty() || text == "-1" {
    None
  } else {
    Some(format!("{}'", text))
  }
}

pub fn fixture_line(fixture: &Fixture, now: DateTime<FixedOffset>) -> PanelLine {
  let (status, status_tone) = if fixture.finished {
    ("FT".to_string(), Tone::Muted)
  } else if fixture.started {
    (minute_label(fixture.minute.as_ref()).unwrap_or_else(|| "LIVE".into()), Tone::Bad)
  } else {
    (fixture.kickoff.with_timezone(now.offset()).format("%H:%M").to_string(), Tone::Normal)
  };
  let score = if fixture.started || fixture.finished {
    format!("{}-{}", fixture.home_score.unwrap_or(0), fixture.away_score.unwrap_or(0))
  } else {
    "-".to_string()
  };
  let comp_tone = if fixture.competition == "CL" { Tone::Accent } else { Tone::Good };

  PanelLine::new()
    .push(format!("{} ", fixture.competition), comp_tone)
    .push(format!("{} {} {} ", fixture.home, score, fixture.away), Tone::Normal)
    .push(status, status_tone)
}

pub fn render(response: &FootballResponse, now: DateTime<FixedOffset>) -> Result<PanelBody, Notice> {
  if !response.show {
    return Ok(PanelBody::Hidden);
  }
  let mut lines = vec![PanelLine::toned(title(&response.fixtures), Tone::Heading)];
  if let Some(deadline) = &response.deadline {
    lines.push(PanelLine::toned(deadline_label(deadline, now), Tone::Warn));
  }
  lines.extend(response.fixtures.iter().map(|f| fixture_line(f, now)));
  Ok(PanelBody::Lines(lines))
}
