//! Turning a stored ephemeris into what the reader sees.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::ephemeris::Ephemeris;

/// Language used for month names and the date/year joiner.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
  #[default]
  Es,
  En,
}

const MONTHS_ES: [&str; 12] = [
  "enero",
  "febrero",
  "marzo",
  "abril",
  "mayo",
  "junio",
  "julio",
  "agosto",
  "septiembre",
  "octubre",
  "noviembre",
  "diciembre",
];

const MONTHS_EN: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December",
];

impl Locale {
  /// Month name for a 1-based month, or `None` outside `1..=12`.
  pub fn month_name(self, month: i32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    match self {
      Locale::Es => MONTHS_ES.get(idx).copied(),
      Locale::En => MONTHS_EN.get(idx).copied(),
    }
  }

  /// "Day of month" rendering, e.g. `25 de agosto` or `August 25`.
  pub fn day_of_month(self, month: i32, day: i32) -> String {
    let month = self
      .month_name(month)
      .map(str::to_owned)
      .unwrap_or_else(|| month.to_string());
    match self {
      Locale::Es => format!("{day} de {month}"),
      Locale::En => format!("{month} {day}"),
    }
  }
}

/// A formatted fact, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFact {
  /// Locale "day of month" string for the effective date.
  pub date:  String,
  /// The effective year, kept apart from `date`.
  pub year:  i32,
  pub event: String,
}

impl DisplayFact {
  /// The full text typed out by the presentation surface.
  pub fn transcript(&self, locale: Locale) -> String {
    match locale {
      Locale::Es => format!("{} de {}:\n\n{}", self.date, self.year, self.event),
      Locale::En => format!("{}, {}:\n\n{}", self.date, self.year, self.event),
    }
  }
}

/// Format `ephemeris` for display, applying the historical date overrides.
pub fn format_for_display(ephemeris: &Ephemeris, locale: Locale) -> DisplayFact {
  let effective = ephemeris.effective_date();
  DisplayFact {
    date:  locale.day_of_month(effective.month, effective.day),
    year:  effective.year,
    event: ephemeris.event.clone(),
  }
}
