//! Handler for the `/ephemerides` endpoint.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/ephemerides?date=YYYY-MM-DD` | Exact match on `display_date` |
//! | `GET`  | `/ephemerides` | Today (server date), then the placeholder date |
//!
//! Success bodies are `{"data": <row>}`; failures are `{"error": "..."}`.

use axum::{
  Json,
  extract::{Query, State},
};
use code_history_core::{ephemeris::Ephemeris, store::EphemerisStore};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError, lookup};

/// Success envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
  pub data: Ephemeris,
}

/// `GET /ephemerides[?date=YYYY-MM-DD]`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope>, ApiError>
where
  S: EphemerisStore + 'static,
{
  // First `date` wins; an empty `date=` behaves like no date at all. The
  // value is passed to the store untouched.
  let date = params
    .into_iter()
    .find_map(|(key, value)| (key == "date").then_some(value))
    .filter(|d| !d.is_empty());

  let found = match &date {
    Some(date) => lookup::for_date(state.store.as_ref(), date).await,
    None => lookup::for_today(state.store.as_ref(), &state.lookup).await,
  }
  .map_err(|e| ApiError::Store(Box::new(e)))?;

  match (found, date) {
    (Some(data), _) => Ok(Json(Envelope { data })),
    (None, Some(_)) => Err(ApiError::NotFound(
      "no ephemeris found for the requested date".into(),
    )),
    (None, None) => Err(ApiError::NotFound("no ephemeris found for today".into())),
  }
}
