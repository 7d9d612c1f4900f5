use crate::models::{CalendarEvent, CalendarResponse};
use crate::panel::{Notice, PanelBody, PanelLine, Tone};

pub const MAX_TOMORROW: usize = 3;
const SUMMARY_LIMIT: usize = 35;
const SUMMARY_CUT: usize = 32;

pub fn truncate_summary(summary: &str) -> String {
  if summary.chars().count() > SUMMARY_LIMIT {
    let cut: String = summary.chars().take(SUMMARY_CUT).collect();
    format!("{}...", cut)
  } else {
    summary.to_string()
  }
}

pub fn event_line(event: &CalendarEvent) -> PanelLine {
  let time = if event.all_day {
    "Hele dagen".to_string()
  } else {
    event.time.clone().unwrap_or_default()
  };
  let end = event.end_time.as_deref().map(|e| format!(" - {}", e)).unwrap_or_default();
  let time_tone = if event.all_day { Tone::Accent } else { Tone::Muted };
  PanelLine::new()
    .push(format!("{}{}  ", time, end), time_tone)
    .push(truncate_summary(&event.summary), Tone::Normal)
}

pub fn render(calendar: &CalendarResponse) -> Result<PanelBody, Notice> {
  if calendar.today.is_empty() && calendar.tomorrow.is_empty() {
    return Err(Notice::empty_upstream("Ingen hendelser").with_hint("Nyt fridagen!"));
  }

  let mut lines = Vec::new();
  if !calendar.today.is_empty() {
    lines.push(PanelLine::toned("I dag", Tone::Heading));
    lines.extend(calendar.today.iter().map(event_line));
  }
  if !calendar.tomorrow.is_empty() {
    lines.push(PanelLine::toned("I morgen", Tone::Heading));
    lines.extend(calendar.tomorrow.iter().take(MAX_TOMORROW).map(event_line));
    if calendar.tomorrow.len() > MAX_TOMORROW {
      lines.push(PanelLine::toned(format!("+{} flere", calendar.tomorrow.len() - MAX_TOMORROW), Tone::Muted));
    }
  }
  Ok(PanelBody::Lines(lines))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::panel::NoticeKind;
  use serde_json::json;

  fn texts(body: PanelBody) -> Vec<String> {
    match body {
      PanelBody::Lines(lines) => lines.iter().map(PanelLine::text).collect(),
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn long_summaries_are_cut() {
    let long = "Foreldremøte på skolen med påfølgende dugnad";
    let cut = truncate_summary(long);
    assert_eq!(cut.chars().count(), SUMMARY_CUT + 3);
    assert!(cut.ends_with("..."));
    assert_eq!(truncate_summary("Tannlege"), "Tannlege");
  }

  #[test]
  fn nothing_planned() {
    let notice = render(&CalendarResponse::default()).unwrap_err();
    assert_eq!(notice.kind, NoticeKind::EmptyUpstream);
    assert_eq!(notice.hint.as_deref(), Some("Nyt fridagen!"));
  }

  #[test]
  fn today_and_tomorrow_sections() {
    let cal: CalendarResponse = serde_json::from_value(json!({
      "today": [
        { "summary": "Bursdag", "all_day": true },
        { "summary": "Trening", "time": "18:00", "end_time": "19:30" }
      ],
      "tomorrow": [
        { "summary": "A", "time": "08:00" },
        { "summary": "B", "time": "09:00" },
        { "summary": "C", "time": "10:00" },
        { "summary": "D", "time": "11:00" },
        { "summary": "E", "time": "12:00" }
      ]
    }))
    .unwrap();
    assert_eq!(
      texts(render(&cal).unwrap()),
      vec![
        "I dag",
        "Hele dagen  Bursdag",
        "18:00 - 19:30  Trening",
        "I morgen",
        "08:00  A",
        "09:00  B",
        "10:00  C",
        "+2 flere",
      ]
    );
  }

  #[test]
  fn tomorrow_only() {
    let cal: CalendarResponse = serde_json::from_value(json!({ "tomorrow": [{ "summary": "Fly", "time": "06:10" }] })).unwrap();
    assert_eq!(texts(render(&cal).unwrap()), vec!["I morgen", "06:10  Fly"]);
  }
}
