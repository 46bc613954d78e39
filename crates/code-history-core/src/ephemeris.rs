//! The fact record: one dated programming-history event.
//!
//! Rows are filed under a *display date* (the day the site shows them) and
//! may carry a separate *historical date* for when the event really happened.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date::display_date;

// ─── Stored row ──────────────────────────────────────────────────────────────

/// A stored ephemeris, exactly as the content store returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ephemeris {
  /// Assigned by the content store.
  pub id:               i64,
  pub day:              i32,
  pub month:            i32,
  pub year:             i32,
  pub event:            String,
  /// Canonical `YYYY-MM-DD` lookup key.
  pub display_date:     Option<String>,
  pub historical_day:   Option<i32>,
  pub historical_month: Option<i32>,
  pub historical_year:  Option<i32>,
  #[serde(default)]
  pub created_at:       Option<String>,
  #[serde(default)]
  pub updated_at:       Option<String>,
}

/// The calendar date an ephemeris is displayed with, after applying the
/// historical overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveDate {
  pub year:  i32,
  pub month: i32,
  pub day:   i32,
}

impl Ephemeris {
  /// Resolve year, month and day independently: a present, non-zero
  /// `historical_*` value wins over the filed value.
  pub fn effective_date(&self) -> EffectiveDate {
    EffectiveDate {
      year:  prefer(self.historical_year, self.year),
      month: prefer(self.historical_month, self.month),
      day:   prefer(self.historical_day, self.day),
    }
  }
}

fn prefer(historical: Option<i32>, filed: i32) -> i32 {
  historical.filter(|v| *v != 0).unwrap_or(filed)
}

// ─── NewEphemeris ────────────────────────────────────────────────────────────

/// Input to [`crate::store::EphemerisStore::insert`].
/// `id` and the timestamps are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEphemeris {
  pub day:              i32,
  pub month:            i32,
  pub year:             i32,
  pub event:            String,
  pub display_date:     String,
  pub historical_day:   Option<i32>,
  pub historical_month: Option<i32>,
  pub historical_year:  Option<i32>,
}

impl NewEphemeris {
  /// File `event` under `target`, recording when it historically happened.
  pub fn filed_on(
    target: NaiveDate,
    event: impl Into<String>,
    historical: EffectiveDate,
  ) -> Self {
    Self {
      day:              target.day() as i32,
      month:            target.month() as i32,
      year:             target.year(),
      event:            event.into(),
      display_date:     display_date(target),
      historical_day:   Some(historical.day),
      historical_month: Some(historical.month),
      historical_year:  Some(historical.year),
    }
  }
}
