use crate::models::TemperatureReading;
use crate::panel::{Notice, PanelBody, PanelLine, Tone};

pub const HOT: f64 = 70.0;
pub const WARM: f64 = 60.0;

pub fn tone_for(celsius: f64) -> Tone {
  if celsius >= HOT {
    Tone::Bad
  } else if celsius >= WARM {
    Tone::Warn
  } else {
    Tone::Good
  }
}

pub fn render(reading: &TemperatureReading) -> Result<PanelBody, Notice> {
  let temperature = match reading.temperature {
    Some(t) if !reading.has_error() => t,
    _ => return Err(Notice::transport("--°C")),
  };
  let unit = reading.unit.as_deref().unwrap_or("C");
  Ok(PanelBody::Lines(vec![PanelLine::toned(format!("{}°{}", temperature, unit), tone_for(temperature))]))
}
