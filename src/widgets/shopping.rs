use crate::models::ShoppingList;
use crate::panel::{Notice, PanelBody, PanelLine, Tone};

pub const MAX_SHOWN: usize = 5;

/// Unchecked items only, first five, with a count of the rest.
pub fn render(list: &ShoppingList) -> Result<PanelBody, Notice> {
  if list.items.is_empty() {
    return Err(Notice::empty_upstream("Listen er tom!"));
  }
  let unchecked: Vec<_> = list.items.iter().filter(|i| !i.checked).collect();
  if unchecked.is_empty() {
    return Err(Notice::empty_after_filter("Alt er handlet"));
  }

  let mut lines: Vec<PanelLine> = unchecked
    .iter()
    .take(MAX_SHOWN)
    .map(|item| PanelLine::new().push("• ", Tone::Accent).push(item.text.clone(), Tone::Normal))
    .collect();
  if unchecked.len() > MAX_SHOWN {
    lines.push(PanelLine::toned(format!("+{} til...", unchecked.len() - MAX_SHOWN), Tone::Muted));
  }
  Ok(PanelBody::Lines(lines))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::panel::NoticeKind;
  use serde_json::json;

  fn list(value: serde_json::Value) -> ShoppingList {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn empty_list() {
    let notice = render(&list(json!({}))).unwrap_err();
    assert_eq!(notice.kind, NoticeKind::EmptyUpstream);
    assert_eq!(notice.message, "Listen er tom!");
  }

  #[test]
  fn all_checked_is_empty_after_filter() {
    let notice = render(&list(json!({ "items": [{ "text": "melk", "checked": true }] }))).unwrap_err();
    assert_eq!(notice.kind, NoticeKind::EmptyAfterFilter);
  }

  #[test]
  fn shows_five_unchecked_and_a_remainder() {
    let items: Vec<_> = (1..=8)
      .map(|i| json!({ "text": format!("vare {}", i), "checked": i == 2 }))
      .collect();
    match render(&list(json!({ "items": items }))).unwrap() {
      PanelBody::Lines(lines) => {
        let texts: Vec<String> = lines.iter().map(PanelLine::text).collect();
        assert_eq!(texts, vec!["• vare 1", "• vare 3", "• vare 4", "• vare 5", "• vare 6", "+2 til..."]);
      }
      other => panic!("unexpected {:?}", other),
    }
  }
}
