//! [`RestStore`]: the hosted implementation of [`EphemerisStore`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use code_history_core::{
  ephemeris::{Ephemeris, NewEphemeris},
  store::EphemerisStore,
};

use crate::{Error, Result};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Connection settings for the hosted table.
#[derive(Debug, Clone)]
pub struct RestConfig {
  /// Project URL, e.g. `https://xyz.supabase.co`.
  pub base_url:  String,
  /// Service or anon key; sent both as `apikey` and as a bearer token.
  pub api_key:   String,
  /// Path of the REST root below `base_url`.
  pub rest_path: String,
  pub table:     String,
  pub timeout:   Duration,
}

impl RestConfig {
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self {
      base_url:  base_url.into(),
      api_key:   api_key.into(),
      rest_path: "/rest/v1".into(),
      table:     "ephemerides".into(),
      timeout:   Duration::from_secs(30),
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Content store reached over HTTP.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct RestStore {
  client: Client,
  config: RestConfig,
}

/// PostgREST error body; only the SQLSTATE code matters here.
#[derive(Debug, Deserialize)]
struct PostgrestError {
  code: Option<String>,
}

impl RestStore {
  pub fn new(config: RestConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .user_agent(concat!("code-history/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self { client, config })
  }

  fn table_url(&self) -> String {
    format!(
      "{}{}/{}",
      self.config.base_url.trim_end_matches('/'),
      self.config.rest_path.trim_end_matches('/'),
      self.config.table
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    req
      .header("apikey", &self.config.api_key)
      .bearer_auth(&self.config.api_key)
  }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
  let body = resp.text().await?;
  serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
}

/// SQLSTATE class 22 ("data exception") means the filter value itself is
/// unusable for the column type, e.g. `2025-13-45` against a `date` column.
/// Such a value cannot match any row.
fn is_data_exception(body: &str) -> bool {
  serde_json::from_str::<PostgrestError>(body)
    .ok()
    .and_then(|e| e.code)
    .is_some_and(|code| code.starts_with("22"))
}

// ─── EphemerisStore impl ─────────────────────────────────────────────────────

impl EphemerisStore for RestStore {
  type Error = Error;

  async fn find_by_display_date(
    &self,
    display_date: &str,
  ) -> Result<Option<Ephemeris>> {
    let resp = self
      .auth(self.client.get(self.table_url()))
      .query(&[("display_date", format!("eq.{display_date}"))])
      .send()
      .await?;

    let status = resp.status();
    if status == StatusCode::BAD_REQUEST {
      let body = resp.text().await.unwrap_or_default();
      if is_data_exception(&body) {
        tracing::debug!(display_date, "filter value rejected by content store");
        return Ok(None);
      }
      return Err(Error::Status { status: status.as_u16(), body });
    }
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status: status.as_u16(), body });
    }

    let rows: Vec<Ephemeris> = decode(resp).await?;
    if rows.len() > 1 {
      tracing::warn!(display_date, count = rows.len(), "duplicate rows for display date");
    }
    Ok(rows.into_iter().next())
  }

  async fn insert(&self, input: NewEphemeris) -> Result<Ephemeris> {
    let resp = self
      .auth(self.client.post(self.table_url()))
      .header("Prefer", "return=representation")
      .json(&input)
      .send()
      .await?;

    let status = resp.status();
    if status != StatusCode::CREATED {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status: status.as_u16(), body });
    }

    let rows: Vec<Ephemeris> = decode(resp).await?;
    rows.into_iter().next().ok_or(Error::EmptyInsert)
  }
}
