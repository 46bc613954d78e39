//! One generator run: check, draft, file.

use chrono::NaiveDate;
use code_history_core::{
  date::display_date,
  ephemeris::{Ephemeris, NewEphemeris},
  store::EphemerisStore,
};

use crate::{error::GenerateError, llm::Drafter};

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// The day already had a fact; nothing was drafted or written.
  AlreadyPresent(Ephemeris),
  /// A new fact was drafted and stored.
  Inserted(Ephemeris),
}

/// Make sure `target` has a fact, drafting and storing one if it does not.
///
/// The existence check and the insert are separate calls; two concurrent
/// runs for the same day can both insert.
pub async fn generate<S, D>(
  store: &S,
  drafter: &D,
  target: NaiveDate,
) -> Result<Outcome, GenerateError>
where
  S: EphemerisStore,
  D: Drafter,
{
  let key = display_date(target);

  if let Some(existing) = store
    .find_by_display_date(&key)
    .await
    .map_err(GenerateError::store)?
  {
    tracing::info!(
      date = %key,
      id = existing.id,
      event = %existing.event,
      "fact already filed; nothing to do"
    );
    return Ok(Outcome::AlreadyPresent(existing));
  }

  tracing::info!(date = %key, "drafting fact");
  let candidate = drafter.draft(target).await?;
  tracing::info!(
    date = %key,
    historical_year = candidate.historical_year,
    "candidate drafted"
  );

  let historical = candidate.historical_date();
  let row = NewEphemeris::filed_on(target, candidate.event, historical);
  let stored = store.insert(row).await.map_err(GenerateError::store)?;

  tracing::info!(
    date = %key,
    id = stored.id,
    event = %stored.event,
    "fact stored"
  );
  Ok(Outcome::Inserted(stored))
}
