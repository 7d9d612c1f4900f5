//! Wall clock, Norwegian date line, and the idle countdown that sends a
//! detail view back to the home board.

use std::time::{Duration, Instant};

use chrono::{Datelike, Timelike};

const WEEKDAYS: [&str; 7] = ["Mandag", "Tirsdag", "Onsdag", "Torsdag", "Fredag", "Lørdag", "Søndag"];
const MONTHS: [&str; 12] = [
  "januar", "februar", "mars", "april", "mai", "juni", "juli", "august", "september", "oktober", "november", "desember",
];

pub fn clock_line<T: Timelike>(now: &T) -> String {
  format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second())
}

pub fn date_line<D: Datelike>(today: &D) -> String {
  let weekday = WEEKDAYS[today.weekday().num_days_from_monday() as usize];
  let month = MONTHS[today.month0() as usize];
  format!("{} {}. {}  ·  Uke {}", weekday, today.day(), month, today.iso_week().week())
}

/// Counts down while a detail view is open; any input starts it over.
#[derive(Debug, Clone, Copy)]
pub struct IdleReturn {
  timeout: Duration,
  deadline: Instant,
}

impl IdleReturn {
  pub fn new(timeout: Duration, now: Instant) -> Self {
    Self { timeout, deadline: now + timeout }
  }

  pub fn reset(&mut self, now: Instant) {
    self.deadline = now + self.timeout;
  }

  pub fn remaining(&self, now: Instant) -> Duration {
    self.deadline.saturating_duration_since(now)
  }

  pub fn expired(&self, now: Instant) -> bool {
    now >= self.deadline
  }

  /// `m:ss`, rounded down to whole seconds.
  pub fn label(&self, now: Instant) -> String {
    let secs = self.remaining(now).as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
  }
}
