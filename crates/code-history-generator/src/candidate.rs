//! The drafted, not-yet-stored fact and how it is read out of a model reply.

use code_history_core::ephemeris::EffectiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DraftError;

/// A fact drafted by the model for one target day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
  pub event:            String,
  pub historical_year:  i32,
  pub historical_month: i32,
  pub historical_day:   i32,
}

impl Candidate {
  pub fn historical_date(&self) -> EffectiveDate {
    EffectiveDate {
      year:  self.historical_year,
      month: self.historical_month,
      day:   self.historical_day,
    }
  }
}

/// Either shape the model may answer with.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Reply {
  error:            Option<String>,
  event:            Option<String>,
  historical_year:  Option<i32>,
  historical_month: Option<i32>,
  historical_day:   Option<i32>,
}

/// Parse the model's message content into a [`Candidate`].
///
/// Accepts bare JSON or JSON inside a Markdown code fence. A reply of the
/// form `{"error": "..."}` means the model declined to draft anything.
pub fn parse_reply(content: &str) -> Result<Candidate, DraftError> {
  let json = strip_code_fence(content);
  if json.is_empty() {
    return Err(DraftError::EmptyReply);
  }

  let reply: Reply =
    serde_json::from_str(json).map_err(|e| DraftError::Malformed(e.to_string()))?;

  if let Some(reason) = reply.error {
    return Err(DraftError::NoVerifiableEvent(reason));
  }

  let event = reply
    .event
    .map(|e| e.trim().to_owned())
    .filter(|e| !e.is_empty())
    .ok_or(DraftError::Incomplete("event"))?;

  let candidate = Candidate {
    event,
    historical_year:  required(reply.historical_year, "historicalYear")?,
    historical_month: required(reply.historical_month, "historicalMonth")?,
    historical_day:   required(reply.historical_day, "historicalDay")?,
  };

  if !(1..=12).contains(&candidate.historical_month) {
    return Err(DraftError::Malformed(format!(
      "historicalMonth {} is not a month",
      candidate.historical_month
    )));
  }
  Ok(candidate)
}

fn required(value: Option<i32>, field: &'static str) -> Result<i32, DraftError> {
  value.filter(|v| *v != 0).ok_or(DraftError::Incomplete(field))
}

/// Content between the first fence line and the next closing fence, or the
/// trimmed input when it is not fenced.
fn strip_code_fence(content: &str) -> &str {
  let content = content.trim();
  if !content.starts_with("```") {
    return content;
  }

  // Skip the opening line, including any language tag.
  let Some(body_start) = content.find('\n').map(|i| i + 1) else {
    return content;
  };
  let body = &content[body_start..];

  let mut offset = 0;
  for line in body.split_inclusive('\n') {
    if line.trim() == "```" {
      return body[..offset].trim();
    }
    offset += line.len();
  }
  content
}

#[cfg(test)]
mod tests {
  use super::*;

  const LINUX: &str = r#"{
    "event": "El 25 de agosto de 1991, Linus Torvalds anuncia públicamente el kernel Linux.",
    "historicalYear": 1991,
    "historicalMonth": 8,
    "historicalDay": 25
  }"#;

  #[test]
  fn parses_bare_json() {
    let c = parse_reply(LINUX).unwrap();
    assert_eq!(c.historical_year, 1991);
    assert_eq!(c.historical_date(), EffectiveDate { year: 1991, month: 8, day: 25 });
    assert!(c.event.starts_with("El 25 de agosto"));
  }

  #[test]
  fn strips_json_code_fence() {
    let fenced = format!("```json\n{LINUX}\n```");
    assert_eq!(parse_reply(&fenced).unwrap(), parse_reply(LINUX).unwrap());

    let plain_fence = format!("```\n{LINUX}\n```\n");
    assert_eq!(parse_reply(&plain_fence).unwrap().historical_day, 25);
  }

  #[test]
  fn unfenced_text_is_left_alone() {
    assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
  }

  #[test]
  fn error_reply_means_no_event() {
    let err = parse_reply(r#"{"error": "no verifiable event for this day"}"#).unwrap_err();
    assert!(matches!(err, DraftError::NoVerifiableEvent(r) if r.contains("verifiable")));
  }

  #[test]
  fn missing_or_zero_fields_are_rejected() {
    let err = parse_reply(r#"{"event": "X", "historicalYear": 1991, "historicalMonth": 8}"#)
      .unwrap_err();
    assert!(matches!(err, DraftError::Incomplete("historicalDay")));

    let err = parse_reply(
      r#"{"event": "X", "historicalYear": 0, "historicalMonth": 8, "historicalDay": 25}"#,
    )
    .unwrap_err();
    assert!(matches!(err, DraftError::Incomplete("historicalYear")));

    let err = parse_reply(
      r#"{"event": "  ", "historicalYear": 1991, "historicalMonth": 8, "historicalDay": 25}"#,
    )
    .unwrap_err();
    assert!(matches!(err, DraftError::Incomplete("event")));
  }

  #[test]
  fn non_json_is_malformed() {
    assert!(matches!(
      parse_reply("Sure! Here is a fact about Linux."),
      Err(DraftError::Malformed(_))
    ));
    assert!(matches!(parse_reply("   "), Err(DraftError::EmptyReply)));
  }

  #[test]
  fn month_out_of_range_is_malformed() {
    let err = parse_reply(
      r#"{"event": "X", "historicalYear": 1991, "historicalMonth": 13, "historicalDay": 25}"#,
    )
    .unwrap_err();
    assert!(matches!(err, DraftError::Malformed(_)));
  }
}
