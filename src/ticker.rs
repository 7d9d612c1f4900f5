//! Headline rotation.
//!
//! Each rotation hides the current line for a short fade, then reveals the
//! next one. The reveal is a single pending deadline; replacing the items
//! cancels it.

use std::time::{Duration, Instant};

use crate::panel::PanelLine;

pub const ROTATE_EVERY: Duration = Duration::from_secs(8);
pub const FADE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Visible,
  Hidden { reveal_at: Instant, next: usize },
}

#[derive(Debug, Clone)]
pub struct Ticker {
  items: Vec<PanelLine>,
  index: usize,
  phase: Phase,
  next_rotation: Instant,
  rotate_every: Duration,
  fade: Duration,
}

impl Ticker {
  pub fn new(items: Vec<PanelLine>, now: Instant) -> Self {
    Self::with_timing(items, now, ROTATE_EVERY, FADE)
  }

  pub fn with_timing(items: Vec<PanelLine>, now: Instant, rotate_every: Duration, fade: Duration) -> Self {
    Self {
      items,
      index: 0,
      phase: Phase::Visible,
      next_rotation: now + rotate_every,
      rotate_every,
      fade,
    }
  }

  /// Swaps in fresh items, keeping the rotation position where it fits.
  pub fn replace(&mut self, items: Vec<PanelLine>, now: Instant) {
    self.index = self.index.min(items.len().saturating_sub(1));
    self.items = items;
    self.phase = Phase::Visible;
    self.next_rotation = now + self.rotate_every;
  }

  pub fn advance(&mut self, now: Instant) {
    if self.items.is_empty() {
      return;
    }
    match self.phase {
      Phase::Visible if now >= self.next_rotation => {
        self.phase = Phase::Hidden { reveal_at: now + self.fade, next: (self.index + 1) % self.items.len() };
        self.next_rotation += self.rotate_every;
        if self.next_rotation <= now {
          self.next_rotation = now + self.rotate_every;
        }
      }
      Phase::Hidden { reveal_at, next } if now >= reveal_at => {
        self.index = next.min(self.items.len() - 1);
        self.phase = Phase::Visible;
      }
      _ => {}
    }
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn index(&self) -> usize {
    self.index
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// The line to draw, or `None` while fading.
  pub fn current(&self) -> Option<&PanelLine> {
    match self.phase {
      Phase::Visible => self.items.get(self.index),
      Phase::Hidden { .. } => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lines(texts: &[&str]) -> Vec<PanelLine> {
    texts.iter().map(|t| PanelLine::plain(*t)).collect()
  }

  fn shown(ticker: &Ticker) -> Option<String> {
    ticker.current().map(PanelLine::text)
  }

  #[test]
  fn first_item_is_visible_immediately() {
    let start = Instant::now();
    let ticker = Ticker::new(lines(&["a", "b"]), start);
    assert_eq!(shown(&ticker), Some("a".into()));
  }

  #[test]
  fn rotation_hides_then_reveals_next() {
    let start = Instant::now();
    let mut ticker = Ticker::new(lines(&["a", "b", "c"]), start);

    ticker.advance(start + Duration::from_secs(7));
    assert_eq!(shown(&ticker), Some("a".into()));

    ticker.advance(start + ROTATE_EVERY);
    assert_eq!(shown(&ticker), None);

    ticker.advance(start + ROTATE_EVERY + Duration::from_millis(100));
    assert_eq!(shown(&ticker), None);

    ticker.advance(start + ROTATE_EVERY + FADE);
    assert_eq!(shown(&ticker), Some("b".into()));
  }

  #[test]
  fn rotation_wraps_around() {
    let start = Instant::now();
    let mut ticker = Ticker::new(lines(&["a", "b"]), start);
    for round in 1..=2u32 {
      let at = start + ROTATE_EVERY * round;
      ticker.advance(at);
      ticker.advance(at + FADE);
    }
    assert_eq!(ticker.index(), 0);
    assert_eq!(shown(&ticker), Some("a".into()));
  }

  #[test]
  fn replace_cancels_a_pending_reveal() {
    let start = Instant::now();
    let mut ticker = Ticker::new(lines(&["a", "b", "c"]), start);
    ticker.advance(start + ROTATE_EVERY);
    assert!(matches!(ticker.phase(), Phase::Hidden { .. }));

    let now = start + ROTATE_EVERY + Duration::from_millis(50);
    ticker.replace(lines(&["x"]), now);
    assert_eq!(ticker.phase(), Phase::Visible);
    ticker.advance(now + FADE);
    assert_eq!(shown(&ticker), Some("x".into()));
  }

  #[test]
  fn replace_keeps_the_position() {
    let start = Instant::now();
    let mut ticker = Ticker::new(lines(&["a", "b", "c"]), start);
    for round in 1..=2u32 {
      let at = start + ROTATE_EVERY * round;
      ticker.advance(at);
      ticker.advance(at + FADE);
    }
    assert_eq!(ticker.index(), 2);

    let now = start + ROTATE_EVERY * 3;
    ticker.replace(lines(&["d", "e", "f", "g"]), now);
    assert_eq!(shown(&ticker), Some("f".into()));

    ticker.replace(lines(&["h", "i"]), now);
    assert_eq!(shown(&ticker), Some("i".into()));
  }

  #[test]
  fn empty_ticker_stays_quiet() {
    let start = Instant::now();
    let mut ticker = Ticker::new(vec![], start);
    ticker.advance(start + ROTATE_EVERY * 3);
    assert_eq!(ticker.current(), None);
    assert!(ticker.is_empty());
  }
}
