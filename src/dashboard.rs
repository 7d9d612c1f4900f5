//! Home board (every widget at once)
//! Detail view (one widget full screen, returns home after idling)

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use tui::{
  backend::Backend,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Span, Spans},
  widgets::{Block, Borders, Paragraph, Tabs, Wrap},
  Frame,
};

use crate::clock::{clock_line, date_line, IdleReturn};
use crate::panel::{NoticeKind, Panel, PanelBody, PanelLine, Tone};
use crate::ticker::Ticker;
use crate::widgets::{self, WIDGETS};

pub struct PanelSlot {
  pub panel: Panel,
  pub ticker: Option<Ticker>,
  pub updated_at: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Home,
  Detail(usize),
}

pub struct App {
  view: View,
  slots: Vec<PanelSlot>,
  idle: Option<IdleReturn>,
  idle_timeout: Duration,
}

impl App {
  pub fn new(idle_timeout: Duration) -> Self {
    let slots = WIDGETS
      .iter()
      .map(|(id, title)| PanelSlot { panel: Panel::loading(*id, *title), ticker: None, updated_at: None })
      .collect();
    Self { view: View::Home, slots, idle: None, idle_timeout }
  }

  pub fn view(&self) -> View {
    self.view
  }

  pub fn slot(&self, widget: &str) -> Option<&PanelSlot> {
    self.slots.iter().find(|s| s.panel.widget == widget)
  }

  /// Replaces one widget's panel. Only the UI thread calls this.
  pub fn apply(&mut self, panel: Panel, now: Instant) {
    let Some(slot) = self.slots.iter_mut().find(|s| s.panel.widget == panel.widget) else {
      return;
    };
    match &panel.body {
      PanelBody::Rotating(lines) => match slot.ticker.as_mut() {
        Some(ticker) => ticker.replace(lines.clone(), now),
        None => slot.ticker = Some(Ticker::new(lines.clone(), now)),
      },
      _ => slot.ticker = None,
    }
    slot.panel = panel;
    slot.updated_at = Some(Local::now());
  }

  pub fn tick(&mut self, now: Instant) {
    for ticker in self.slots.iter_mut().filter_map(|s| s.ticker.as_mut()) {
      ticker.advance(now);
    }
    if self.idle.is_some_and(|idle| idle.expired(now)) {
      self.go_home();
    }
  }

  pub fn open(&mut self, index: usize, now: Instant) {
    if index < self.slots.len() {
      self.view = View::Detail(index);
      self.idle = Some(IdleReturn::new(self.idle_timeout, now));
    }
  }

  pub fn go_home(&mut self) {
    self.view = View::Home;
    self.idle = None;
  }

  pub fn next_view(&mut self, now: Instant) {
    match self.view {
      View::Home => self.open(0, now),
      View::Detail(i) if i + 1 < self.slots.len() => self.open(i + 1, now),
      View::Detail(_) => self.go_home(),
    }
  }

  pub fn previous_view(&mut self, now: Instant) {
    match self.view {
      View::Home => self.open(self.slots.len() - 1, now),
      View::Detail(0) => self.go_home(),
      View::Detail(i) => self.open(i - 1, now),
    }
  }

  pub fn countdown(&self, now: Instant) -> Option<String> {
    self.idle.map(|idle| idle.label(now))
  }

  /// Returns true when the user asked to quit.
  pub fn handle_key(&mut self, code: KeyCode, now: Instant) -> bool {
    if let Some(idle) = self.idle.as_mut() {
      idle.reset(now);
    }
    match code {
      KeyCode::Char('q') => return true,
      KeyCode::Right | KeyCode::Tab => self.next_view(now),
      KeyCode::Left | KeyCode::BackTab => self.previous_view(now),
      KeyCode::Esc | KeyCode::Char('h') => self.go_home(),
      KeyCode::Char(c) => {
        if let Some(digit) = c.to_digit(10).filter(|d| *d >= 1) {
          self.open(digit as usize - 1, now);
        }
      }
      _ => {}
    }
    false
  }
}

fn tone_style(tone: Tone) -> Style {
  match tone {
    Tone::Normal => Style::default(),
    Tone::Heading => Style::default().add_modifier(Modifier::BOLD),
    Tone::Muted => Style::default().fg(Color::DarkGray),
    Tone::Good => Style::default().fg(Color::Green),
    Tone::Warn => Style::default().fg(Color::Yellow),
    Tone::Bad => Style::default().fg(Color::Red),
    Tone::Accent => Style::default().fg(Color::Cyan),
  }
}

fn to_spans(line: &PanelLine) -> Spans<'static> {
  Spans::from(
    line
      .segments
      .iter()
      .map(|s| Span::styled(s.text.clone(), tone_style(s.tone)))
      .collect::<Vec<_>>(),
  )
}

fn body_spans(slot: &PanelSlot) -> Vec<Spans<'static>> {
  match &slot.panel.body {
    PanelBody::Loading => vec![Spans::from(Span::styled("Laster...", tone_style(Tone::Muted)))],
    PanelBody::Lines(lines) => lines.iter().map(to_spans).collect(),
    PanelBody::Rotating(_) => slot
      .ticker
      .as_ref()
      .and_then(Ticker::current)
      .map(|line| vec![to_spans(line)])
      .unwrap_or_default(),
    PanelBody::Notice(notice) => {
      let tone = match notice.kind {
        NoticeKind::TransportFailure => Tone::Bad,
        NoticeKind::EmptyUpstream | NoticeKind::EmptyAfterFilter => Tone::Muted,
      };
      let mut spans = vec![Spans::from(Span::styled(notice.message.clone(), tone_style(tone)))];
      if let Some(hint) = &notice.hint {
        spans.push(Spans::from(Span::styled(hint.clone(), tone_style(Tone::Muted))));
      }
      spans
    }
    PanelBody::Hidden => vec![],
  }
}

fn render_slot<B: Backend>(f: &mut Frame<B>, slot: &PanelSlot, area: Rect, detailed: bool) {
  let title = match (detailed, slot.updated_at) {
    (true, Some(at)) => format!("{} (oppdatert {})", slot.panel.title, at.format("%H:%M:%S")),
    _ => slot.panel.title.clone(),
  };
  let paragraph = Paragraph::new(body_spans(slot))
    .block(Block::default().borders(Borders::ALL).title(title))
    .wrap(Wrap { trim: true });
  f.render_widget(paragraph, area);
}

pub fn ui<B: Backend>(f: &mut Frame<B>, app: &App, now: Instant) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .margin(1)
    .constraints([
      Constraint::Length(3),
      Constraint::Length(3),
      Constraint::Min(0),
      Constraint::Length(3),
    ].as_ref())
    .split(f.size());

  render_header(f, app, chunks[0]);

  let mut tab_titles = vec!["Hjem"];
  tab_titles.extend(WIDGETS.iter().map(|(_, title)| *title));
  let tabs = Tabs::new(
    tab_titles
      .iter()
      .map(|t| Spans::from(Span::styled(*t, Style::default().fg(Color::Yellow))))
      .collect(),
  )
    .block(Block::default().borders(Borders::ALL))
    .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .select(match app.view {
      View::Home => 0,
      View::Detail(i) => i + 1,
    });
  f.render_widget(tabs, chunks[1]);

  match app.view {
    View::Home => render_home(f, app, chunks[2]),
    View::Detail(i) => render_slot(f, &app.slots[i], chunks[2], true),
  }

  let footer_text = match app.countdown(now) {
    Some(left) => format!("Tilbake til hjem om {} | ←/→: Bytt visning | Esc: Hjem | q: Avslutt", left),
    None => "←/→ eller 1-8: Åpne widget | q: Avslutt".to_string(),
  };
  let footer = Paragraph::new(footer_text)
    .style(Style::default().fg(Color::White))
    .block(Block::default().borders(Borders::ALL));
  f.render_widget(footer, chunks[3]);
}

fn render_header<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
  let chunks = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(80), Constraint::Percentage(20)].as_ref())
    .split(area);

  let now = Local::now();
  let clock = Paragraph::new(Spans::from(vec![
    Span::styled(clock_line(&now), Style::default().add_modifier(Modifier::BOLD)),
    Span::raw("  "),
    Span::raw(date_line(&now)),
  ]))
    .block(Block::default().borders(Borders::ALL));
  f.render_widget(clock, chunks[0]);

  if let Some(slot) = app.slot(widgets::TEMPERATURE) {
    let temp = Paragraph::new(body_spans(slot))
      .alignment(Alignment::Right)
      .block(Block::default().borders(Borders::ALL).title(slot.panel.title.clone()));
    f.render_widget(temp, chunks[1]);
  }
}

fn render_home<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
    .split(area);
  let columns = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
    .split(rows[0]);

  render_column(f, app, columns[0], &[(widgets::DEPARTURES, 45), (widgets::CALENDAR, 30), (widgets::SHOPPING, 25)]);
  render_column(f, app, columns[1], &[(widgets::WEATHER, 45), (widgets::FOOTBALL, 30), (widgets::STOCKS, 25)]);

  if let Some(slot) = app.slot(widgets::NEWS) {
    render_slot(f, slot, rows[1], false);
  }
}

/// Stacks panels vertically; hidden panels give their share to the rest.
fn render_column<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect, layout: &[(&str, u16)]) {
  let visible: Vec<(&PanelSlot, u16)> = layout
    .iter()
    .filter_map(|(id, share)| app.slot(id).map(|slot| (slot, *share)))
    .filter(|(slot, _)| slot.panel.body != PanelBody::Hidden)
    .collect();
  if visible.is_empty() {
    return;
  }
  let total: u16 = visible.iter().map(|(_, share)| share).sum();
  let constraints: Vec<Constraint> = visible
    .iter()
    .map(|(_, share)| Constraint::Ratio(u32::from(*share), u32::from(total)))
    .collect();
  let areas = Layout::default()
    .direction(Direction::Vertical)
    .constraints(constraints.as_slice())
    .split(area);
  for ((slot, _), area) in visible.iter().zip(areas.iter()) {
    render_slot(f, slot, *area, false);
  }
}
