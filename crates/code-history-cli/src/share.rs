//! Share intent for posting the fact on X.

use anyhow::{Context, Result};
use code_history_core::display::DisplayFact;
use reqwest::Url;

pub const INTENT_URL: &str = "https://x.com/intent/tweet";

const MAX_EVENT_CHARS: usize = 200;

/// Post text: the event (cut to fit) and a pointer back to the page.
pub fn share_text(event: &str) -> String {
  let event = if event.chars().count() > MAX_EVENT_CHARS {
    let cut: String = event.chars().take(MAX_EVENT_CHARS - 3).collect();
    format!("{cut}...")
  } else {
    event.to_owned()
  };
  format!("💻 {event}\n\nℹ️ Cada día una nueva efeméride en ")
}

/// Intent URL that opens a prefilled post for `fact` linking to `page_url`.
pub fn intent_url(fact: &DisplayFact, page_url: &str) -> Result<String> {
  let url = Url::parse_with_params(
    INTENT_URL,
    &[("text", share_text(&fact.event).as_str()), ("url", page_url)],
  )
  .context("building share intent URL")?;
  Ok(url.into())
}
