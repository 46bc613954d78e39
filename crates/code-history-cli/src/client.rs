//! Async HTTP client for the lookup service.

use std::time::Duration;

use code_history_core::{
  date::{display_date, local_today},
  ephemeris::Ephemeris,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Why a fetch produced no fact. Only ever logged; readers see "no fact".
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("lookup service returned {0}")]
  Status(StatusCode),

  #[error("cannot decode lookup response: {0}")]
  Decode(String),
}

/// Response envelope; `data` is absent on error bodies.
#[derive(Debug, Deserialize)]
struct Envelope {
  data: Option<Ephemeris>,
}

/// Async HTTP client for `GET /ephemerides`.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FactClient {
  client:   Client,
  base_url: String,
}

impl FactClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      client,
      base_url: base_url.into(),
    })
  }

  fn url(&self) -> String {
    format!("{}/ephemerides", self.base_url.trim_end_matches('/'))
  }

  /// `GET /ephemerides?date=<date>`, keeping not-found and failures apart.
  pub async fn fetch(&self, date: &str) -> Result<Option<Ephemeris>, ClientError> {
    let resp = self
      .client
      .get(self.url())
      .query(&[("date", date)])
      .send()
      .await?;

    match resp.status() {
      StatusCode::NOT_FOUND => Ok(None),
      s if s.is_success() => {
        let envelope: Envelope = resp.json().await.map_err(|e| {
          if e.is_decode() {
            ClientError::Decode(e.to_string())
          } else {
            ClientError::Transport(e)
          }
        })?;
        Ok(envelope.data)
      }
      s => Err(ClientError::Status(s)),
    }
  }

  /// The fact filed under `date`, or `None` when there is none or the lookup
  /// failed. The two cases are told apart in the logs only.
  pub async fn ephemeris_for_date(&self, date: &str) -> Option<Ephemeris> {
    match self.fetch(date).await {
      Ok(Some(found)) => {
        tracing::debug!(date, id = found.id, "ephemeris found");
        Some(found)
      }
      Ok(None) => {
        tracing::info!(date, "no ephemeris for date");
        None
      }
      Err(e) => {
        tracing::warn!(date, error = %e, "ephemeris lookup failed");
        None
      }
    }
  }

  /// Today's fact, where "today" is the viewer's local calendar date.
  pub async fn today(&self) -> Option<Ephemeris> {
    self.ephemeris_for_date(&display_date(local_today())).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::sync::Arc;

  use axum::{Json, Router, http::StatusCode as AxumStatus, routing::get};
  use code_history_api::{LookupConfig, api_router};
  use code_history_core::{
    ephemeris::{EffectiveDate, NewEphemeris},
    store::EphemerisStore,
  };
  use code_history_store_sqlite::SqliteStore;
  use serde_json::json;
  use tokio::net::TcpListener;

  async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
  }

  async fn lookup_service(rows: Vec<NewEphemeris>) -> String {
    let store = SqliteStore::open_in_memory().await.unwrap();
    for row in rows {
      store.insert(row).await.unwrap();
    }
    let config = LookupConfig {
      fallback_date: None,
      ..LookupConfig::default()
    };
    spawn(api_router(Arc::new(store), config)).await
  }

  fn filed(date: chrono::NaiveDate) -> NewEphemeris {
    NewEphemeris::filed_on(
      date,
      "X",
      EffectiveDate { year: 1991, month: 8, day: 25 },
    )
  }

  fn june_25() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2025, 6, 25).unwrap()
  }

  #[tokio::test]
  async fn fetch_returns_row_from_data_envelope() {
    let base = lookup_service(vec![filed(june_25())]).await;
    let client = FactClient::new(base).unwrap();

    let found = client.fetch("2025-06-25").await.unwrap().unwrap();
    assert_eq!(found.event, "X");
    assert_eq!(found.historical_year, Some(1991));
  }

  #[tokio::test]
  async fn not_found_is_none_not_error() {
    let base = lookup_service(vec![]).await;
    let client = FactClient::new(base).unwrap();

    assert!(client.fetch("2025-06-25").await.unwrap().is_none());
    assert!(client.ephemeris_for_date("2025-06-25").await.is_none());
  }

  #[tokio::test]
  async fn server_error_is_distinguishable_but_collapses_to_none() {
    let app = Router::new().route(
      "/ephemerides",
      get(|| async {
        (
          AxumStatus::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal server error" })),
        )
      }),
    );
    let client = FactClient::new(spawn(app).await).unwrap();

    let err = client.fetch("2025-06-25").await.unwrap_err();
    assert!(
      matches!(err, ClientError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR),
      "{err:?}"
    );
    assert!(client.ephemeris_for_date("2025-06-25").await.is_none());
  }

  #[tokio::test]
  async fn missing_data_field_is_none() {
    let app = Router::new().route("/ephemerides", get(|| async { Json(json!({})) }));
    let client = FactClient::new(spawn(app).await).unwrap();

    assert!(client.fetch("2025-06-25").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn undecodable_body_is_decode_error() {
    let app = Router::new().route(
      "/ephemerides",
      get(|| async { (AxumStatus::OK, "<html>maintenance</html>") }),
    );
    let client = FactClient::new(spawn(app).await).unwrap();

    let err = client.fetch("2025-06-25").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "{err:?}");
    assert!(client.ephemeris_for_date("2025-06-25").await.is_none());
  }

  #[tokio::test]
  async fn unreachable_service_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = FactClient::new(format!("http://{addr}/")).unwrap();

    let err = client.fetch("2025-06-25").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
    assert!(client.ephemeris_for_date("2025-06-25").await.is_none());
  }

  #[tokio::test]
  async fn today_uses_local_calendar_date() {
    let base = lookup_service(vec![filed(local_today())]).await;
    let client = FactClient::new(base).unwrap();

    let found = client.today().await.unwrap();
    assert_eq!(found.display_date, Some(display_date(local_today())));
  }
}
