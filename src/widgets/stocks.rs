use crate::models::Stock;
use crate::panel::{Notice, PanelBody, PanelLine, Tone};

pub fn stock_line(stock: &Stock) -> PanelLine {
  let (arrow, prefix, tone) = if stock.change > 0.0 {
    ("▲", "+", Tone::Good)
  } else if stock.change < 0.0 {
    ("▼", "", Tone::Bad)
  } else {
    ("", "", Tone::Muted)
  };

  let mut line = PanelLine::new().push(stock.symbol.clone(), Tone::Heading);
  match stock.session.as_deref() {
    Some("PM") => line = line.push(" PM", Tone::Accent),
    Some("AH") => line = line.push(" AH", Tone::Accent),
    _ => {}
  }
  if !stock.is_index {
    let currency = if stock.currency.as_deref() == Some("CAD") { "C$" } else { "$" };
    line = line.push(format!(" {}{:.2}", currency, stock.price), Tone::Normal);
  }
  line.push(format!(" {}{}{:.2}%", arrow, prefix, stock.change), tone)
}

pub fn render(stocks: &Vec<Stock>) -> Result<PanelBody, Notice> {
  if stocks.is_empty() {
    return Err(Notice::empty_upstream("Ingen aksjedata"));
  }
  Ok(PanelBody::Lines(stocks.iter().map(stock_line).collect()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::panel::NoticeKind;
  use serde_json::json;

  fn stock(value: serde_json::Value) -> Stock {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn gains_losses_and_flat() {
    let up = stock(json!({"symbol": "NVDA", "price": 131.5, "change": 2.5}));
    assert_eq!(stock_line(&up).text(), "NVDA $131.50 ▲+2.50%");
    assert_eq!(stock_line(&up).segments.last().map(|s| s.tone), Some(Tone::Good));

    let down = stock(json!({"symbol": "SHOP", "price": 140.0, "change": -1.234, "currency": "CAD", "session": "PM"}));
    assert_eq!(stock_line(&down).text(), "SHOP PM C$140.00 ▼-1.23%");

    let flat = stock(json!({"symbol": "AAPL", "price": 10.0, "change": 0.0, "session": "AH"}));
    assert_eq!(stock_line(&flat).text(), "AAPL AH $10.00 0.00%");
  }

  #[test]
  fn indices_hide_price() {
    let index = stock(json!({"symbol": "^GSPC", "price": 5000.0, "change": 0.4, "is_index": true}));
    assert_eq!(stock_line(&index).text(), "^GSPC ▲+0.40%");
  }

  #[test]
  fn empty_list_is_empty_upstream() {
    assert_eq!(render(&vec![]).unwrap_err().kind, NoticeKind::EmptyUpstream);
  }
}
