//! `YYYY-MM-DD` helpers shared by the lookup service, client and generator.

use chrono::{Local, NaiveDate};

use crate::{Error, Result};

const DISPLAY_FORMAT: &str = "%Y-%m-%d";

/// Format `date` as the canonical `YYYY-MM-DD` lookup key.
pub fn display_date(date: NaiveDate) -> String {
  date.format(DISPLAY_FORMAT).to_string()
}

/// Strictly parse a `YYYY-MM-DD` string.
pub fn parse_display_date(s: &str) -> Result<NaiveDate> {
  // chrono accepts unpadded fields; the lookup key is always zero-padded.
  if s.len() != 10 {
    return Err(Error::InvalidDate(s.to_owned()));
  }
  NaiveDate::parse_from_str(s, DISPLAY_FORMAT)
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

/// The calendar date in this process's local time zone.
pub fn local_today() -> NaiveDate { Local::now().date_naive() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn formats_zero_padded() {
    let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
    assert_eq!(display_date(d), "2025-01-05");
  }

  #[test]
  fn parses_canonical_form() {
    let d = parse_display_date("2025-06-25").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2025, 6, 25).unwrap());
  }

  #[test]
  fn rejects_malformed_input() {
    for bad in ["2025-6-25", "25/06/2025", "2025-02-30", "", "tomorrow"] {
      assert!(
        matches!(parse_display_date(bad), Err(Error::InvalidDate(_))),
        "{bad:?} should be rejected"
      );
    }
  }
}
