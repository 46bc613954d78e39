//! Tests for `RestStore` against a throwaway PostgREST look-alike.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
};

use axum::{
  Json, Router,
  extract::{Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
  routing::get,
};
use chrono::NaiveDate;
use code_history_core::{
  ephemeris::{EffectiveDate, Ephemeris, NewEphemeris},
  store::EphemerisStore,
};
use serde_json::json;
use tokio::net::TcpListener;

use crate::{Error, RestConfig, RestStore};

const KEY: &str = "service-key";

#[derive(Clone, Default)]
struct FakeTable {
  rows:   Arc<Mutex<Vec<Ephemeris>>>,
  /// Every request that lacked the expected credentials.
  denied: Arc<Mutex<usize>>,
}

fn authorised(headers: &HeaderMap) -> bool {
  let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
  let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
  apikey == Some(KEY) && bearer == Some("Bearer service-key")
}

async fn select(
  State(table): State<FakeTable>,
  headers: HeaderMap,
  Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
  if !authorised(&headers) {
    *table.denied.lock().unwrap() += 1;
    return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "no key" })));
  }
  let filter = params.get("display_date").cloned().unwrap_or_default();
  let Some(value) = filter.strip_prefix("eq.") else {
    return (StatusCode::OK, Json(json!(table.rows.lock().unwrap().clone())));
  };
  // Behave like a `date` column: unparsable values are a data exception.
  if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
    return (
      StatusCode::BAD_REQUEST,
      Json(json!({
        "code": "22007",
        "message": format!("invalid input syntax for type date: \"{value}\""),
      })),
    );
  }
  let rows: Vec<Ephemeris> = table
    .rows
    .lock()
    .unwrap()
    .iter()
    .filter(|r| r.display_date.as_deref() == Some(value))
    .cloned()
    .collect();
  (StatusCode::OK, Json(json!(rows)))
}

async fn create(
  State(table): State<FakeTable>,
  headers: HeaderMap,
  Json(input): Json<NewEphemeris>,
) -> impl IntoResponse {
  if !authorised(&headers) {
    *table.denied.lock().unwrap() += 1;
    return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "no key" })));
  }
  let wants_row = headers
    .get("prefer")
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v.contains("return=representation"));

  let mut rows = table.rows.lock().unwrap();
  let row = Ephemeris {
    id:               rows.len() as i64 + 1,
    day:              input.day,
    month:            input.month,
    year:             input.year,
    event:            input.event,
    display_date:     Some(input.display_date),
    historical_day:   input.historical_day,
    historical_month: input.historical_month,
    historical_year:  input.historical_year,
    created_at:       Some("2025-06-24T22:00:00+00:00".into()),
    updated_at:       Some("2025-06-24T22:00:00+00:00".into()),
  };
  rows.push(row.clone());
  if wants_row {
    (StatusCode::CREATED, Json(json!([row])))
  } else {
    (StatusCode::CREATED, Json(json!([])))
  }
}

async fn broken() -> impl IntoResponse {
  (StatusCode::SERVICE_UNAVAILABLE, "upstream down")
}

async fn spawn(table: FakeTable) -> String {
  let app = Router::new()
    .route("/rest/v1/ephemerides", get(select).post(create))
    .route("/rest/v1/broken", get(broken).post(broken))
    .with_state(table);
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  format!("http://{addr}")
}

fn row(id: i64, display_date: &str, event: &str) -> Ephemeris {
  Ephemeris {
    id,
    day: 25,
    month: 6,
    year: 2025,
    event: event.into(),
    display_date: Some(display_date.into()),
    historical_day: Some(25),
    historical_month: Some(8),
    historical_year: Some(1991),
    created_at: None,
    updated_at: None,
  }
}

async fn store_for(table: FakeTable) -> RestStore {
  let base = spawn(table).await;
  RestStore::new(RestConfig::new(base, KEY)).unwrap()
}

#[tokio::test]
async fn finds_row_by_display_date() {
  let table = FakeTable::default();
  table.rows.lock().unwrap().push(row(1, "2025-06-25", "X"));
  let store = store_for(table).await;

  let found = store.find_by_display_date("2025-06-25").await.unwrap();
  assert_eq!(found.map(|e| e.event), Some("X".to_string()));
}

#[tokio::test]
async fn empty_array_is_none() {
  let store = store_for(FakeTable::default()).await;
  assert!(store.find_by_display_date("2025-06-25").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_rows_return_first() {
  let table = FakeTable::default();
  table.rows.lock().unwrap().push(row(1, "2025-06-25", "first"));
  table.rows.lock().unwrap().push(row(2, "2025-06-25", "second"));
  let store = store_for(table).await;

  let found = store.find_by_display_date("2025-06-25").await.unwrap().unwrap();
  assert_eq!(found.event, "first");
}

#[tokio::test]
async fn malformed_date_is_none_not_error() {
  let store = store_for(FakeTable::default()).await;
  let found = store.find_by_display_date("2025-13-45").await.unwrap();
  assert!(found.is_none());
}

#[tokio::test]
async fn upstream_failure_is_status_error() {
  let base = spawn(FakeTable::default()).await;
  let mut config = RestConfig::new(base, KEY);
  config.table = "broken".into();
  let store = RestStore::new(config).unwrap();

  let err = store.find_by_display_date("2025-06-25").await.unwrap_err();
  assert!(matches!(err, Error::Status { status: 503, .. }), "{err:?}");
}

#[tokio::test]
async fn wrong_key_is_rejected() {
  let table = FakeTable::default();
  let base = spawn(table.clone()).await;
  let store = RestStore::new(RestConfig::new(base, "wrong")).unwrap();

  let err = store.find_by_display_date("2025-06-25").await.unwrap_err();
  assert!(matches!(err, Error::Status { status: 401, .. }), "{err:?}");
  assert_eq!(*table.denied.lock().unwrap(), 1);
}

#[tokio::test]
async fn unreachable_store_is_transport_error() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);
  let store = RestStore::new(RestConfig::new(format!("http://{addr}"), KEY)).unwrap();

  let err = store.find_by_display_date("2025-06-25").await.unwrap_err();
  assert!(matches!(err, Error::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn insert_returns_representation() {
  let table = FakeTable::default();
  let store = store_for(table.clone()).await;
  let input = NewEphemeris::filed_on(
    NaiveDate::from_ymd_opt(2025, 8, 25).unwrap(),
    "Linux is announced.",
    EffectiveDate { year: 1991, month: 8, day: 25 },
  );

  let stored = store.insert(input).await.unwrap();
  assert_eq!(stored.id, 1);
  assert_eq!(stored.display_date.as_deref(), Some("2025-08-25"));
  assert_eq!(table.rows.lock().unwrap().len(), 1);

  let found = store.find_by_display_date("2025-08-25").await.unwrap();
  assert_eq!(found, Some(stored));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
  let table = FakeTable::default();
  table.rows.lock().unwrap().push(row(1, "2025-06-25", "X"));
  let base = spawn(table).await;
  let store = RestStore::new(RestConfig::new(format!("{base}/"), KEY)).unwrap();

  assert!(store.find_by_display_date("2025-06-25").await.unwrap().is_some());
}
