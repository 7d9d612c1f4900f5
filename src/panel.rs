//! Presentation-neutral panel contents.
//!
//! Render functions turn a payload into a `PanelBody`; the dashboard maps
//! tones to terminal colours. Nothing here knows about the terminal.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub type PanelSink = UnboundedSender<Panel>;
pub type PanelStream = UnboundedReceiver<Panel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Normal,
  Heading,
  Muted,
  Good,
  Warn,
  Bad,
  Accent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
  pub text: String,
  pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelLine {
  pub segments: Vec<Segment>,
}

impl PanelLine {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn plain(text: impl Into<String>) -> Self {
    Self::new().push(text, Tone::Normal)
  }

  pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
    Self::new().push(text, tone)
  }

  pub fn push(mut self, text: impl Into<String>, tone: Tone) -> Self {
    self.segments.push(Segment { text: text.into(), tone });
    self
  }

  /// Concatenated text of every segment.
  pub fn text(&self) -> String {
    self.segments.iter().map(|s| s.text.as_str()).collect()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  /// Network, timeout, HTTP status, or an upstream error reported by the backend.
  TransportFailure,
  /// A valid response carrying zero records.
  EmptyUpstream,
  /// Records arrived but none survived filtering.
  EmptyAfterFilter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
  pub kind: NoticeKind,
  pub message: String,
  pub hint: Option<String>,
}

impl Notice {
  pub fn transport(message: impl Into<String>) -> Self {
    Self { kind: NoticeKind::TransportFailure, message: message.into(), hint: None }
  }

  pub fn empty_upstream(message: impl Into<String>) -> Self {
    Self { kind: NoticeKind::EmptyUpstream, message: message.into(), hint: None }
  }

  pub fn empty_after_filter(message: impl Into<String>) -> Self {
    Self { kind: NoticeKind::EmptyAfterFilter, message: message.into(), hint: None }
  }

  pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
    self.hint = Some(hint.into());
    self
  }

  pub fn is_transport(&self) -> bool {
    self.kind == NoticeKind::TransportFailure
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelBody {
  Loading,
  Lines(Vec<PanelLine>),
  /// Lines shown one at a time by a ticker.
  Rotating(Vec<PanelLine>),
  Notice(Notice),
  Hidden,
}

impl PanelBody {
  pub fn notice(&self) -> Option<&Notice> {
    match self {
      PanelBody::Notice(notice) => Some(notice),
      _ => None,
    }
  }

  /// One-line description for logs.
  pub fn summary(&self) -> String {
    match self {
      PanelBody::Loading => "loading".into(),
      PanelBody::Lines(lines) => format!("{} lines", lines.len()),
      PanelBody::Rotating(lines) => format!("{} rotating lines", lines.len()),
      PanelBody::Notice(notice) => format!("{:?}: {}", notice.kind, notice.message),
      PanelBody::Hidden => "hidden".into(),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
  pub widget: &'static str,
  pub title: String,
  pub body: PanelBody,
}

impl Panel {
  pub fn loading(widget: &'static str, title: impl Into<String>) -> Self {
    Self { widget, title: title.into(), body: PanelBody::Loading }
  }
}
