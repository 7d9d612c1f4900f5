use crate::models::Headline;
use crate::panel::{Notice, PanelBody, PanelLine, Tone};

pub fn render(headlines: &Vec<Headline>) -> Result<PanelBody, Notice> {
  let lines: Vec<PanelLine> = headlines
    .iter()
    .filter(|h| !h.title.trim().is_empty())
    .map(headline_line)
    .collect();

  if headlines.is_empty() {
    return Err(Notice::empty_upstream("Ingen nyheter").with_hint("Prøver igjen snart"));
  }
  if lines.is_empty() {
    return Err(Notice::empty_after_filter("Ingen overskrifter å vise"));
  }
  Ok(PanelBody::Rotating(lines))
}

fn headline_line(headline: &Headline) -> PanelLine {
  let source = headline.source.as_deref().unwrap_or("NYHETER").to_uppercase();
  PanelLine::new()
    .push(format!("[{}] ", source), source_tone(headline.source_color.as_deref()))
    .push(headline.title.trim(), Tone::Normal)
}

/// Maps the feed's hex badge colour to the nearest tone.
fn source_tone(color: Option<&str>) -> Tone {
  let Some(hex) = color.and_then(|c| c.strip_prefix('#')) else {
    return Tone::Accent;
  };
  let channel = |range: std::ops::Range<usize>| hex.get(range).and_then(|s| u8::from_str_radix(s, 16).ok());
  match (channel(0..2), channel(2..4), channel(4..6)) {
    (Some(r), Some(g), Some(b)) if r > g && r > b => Tone::Bad,
    (Some(r), Some(g), Some(b)) if g > r && g > b => Tone::Good,
    (Some(r), Some(g), Some(b)) if r == g && g == b => Tone::Muted,
    _ => Tone::Accent,
  }
}
