//! Which row answers a lookup.
//!
//! A dated lookup is a plain exact-match passthrough. The undated lookup
//! applies the "today" policy: the server's local calendar date first, then
//! the configured placeholder date when today has no row yet.

use chrono::NaiveDate;
use code_history_core::{
  date::{display_date, local_today},
  ephemeris::Ephemeris,
  store::EphemerisStore,
};

/// Placeholder served when today's row is missing, unless configured off.
pub const DEFAULT_FALLBACK_DATE: &str = "2025-06-25";

/// Knobs for the undated lookup.
#[derive(Debug, Clone)]
pub struct LookupConfig {
  /// Date to serve when today has no row; `None` disables the fallback.
  pub fallback_date: Option<String>,
  /// Source of "today"; the server's local calendar date in production.
  pub today:         fn() -> NaiveDate,
}

impl Default for LookupConfig {
  fn default() -> Self {
    Self {
      fallback_date: Some(DEFAULT_FALLBACK_DATE.to_owned()),
      today:         local_today,
    }
  }
}

/// Exact-match lookup; no format validation beyond what the store enforces.
pub async fn for_date<S>(
  store: &S,
  date: &str,
) -> Result<Option<Ephemeris>, S::Error>
where
  S: EphemerisStore,
{
  let found = store.find_by_display_date(date).await?;
  if found.is_none() {
    tracing::info!(date, "no ephemeris for date");
  }
  Ok(found)
}

/// Today's row, or the placeholder row when today has none.
pub async fn for_today<S>(
  store: &S,
  config: &LookupConfig,
) -> Result<Option<Ephemeris>, S::Error>
where
  S: EphemerisStore,
{
  let today = display_date((config.today)());
  if let Some(found) = for_date(store, &today).await? {
    return Ok(Some(found));
  }

  match config.fallback_date.as_deref() {
    Some(fallback) if !fallback.is_empty() && fallback != today => {
      tracing::warn!(
        today = %today,
        fallback,
        "no ephemeris for today, serving placeholder date"
      );
      for_date(store, fallback).await
    }
    _ => Ok(None),
  }
}
