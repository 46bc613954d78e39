//! HTTP server for the code-history lookup service.
//!
//! Loads [`ServerConfig`], and wraps [`code_history_api::api_router`] with
//! request tracing. Opening the store and binding the socket happen in the
//! `server` binary.

use std::{path::Path, sync::Arc};

use axum::Router;
use code_history_api::{LookupConfig, api_router, lookup::DEFAULT_FALLBACK_DATE};
use code_history_core::{
  config::{StoreSettings, hosted_env_defaults},
  date::local_today,
  store::EphemerisStore,
};
use config::{
  Config, ConfigError, Environment, File,
  builder::{ConfigBuilder, DefaultState},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  /// Served when today has no row; empty disables the fallback.
  #[serde(default = "default_fallback_date")]
  pub fallback_date: Option<String>,
  #[serde(flatten)]
  pub store:         StoreSettings,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 3000 }

fn default_fallback_date() -> Option<String> { Some(DEFAULT_FALLBACK_DATE.into()) }

impl ServerConfig {
  /// Layer, lowest priority first: the conventional hosted-store variables
  /// (`SUPABASE_URL`, `SUPABASE_SERVICE_KEY` or `SUPABASE_ANON_KEY`), the
  /// TOML file at `path` if it exists, then `CODE_HISTORY_*` variables.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let mut builder = Config::builder();
    for (key, value) in hosted_env_defaults() {
      builder = builder.set_default(key, value)?;
    }
    let builder = builder
      .add_source(File::from(path.to_path_buf()).required(false))
      .add_source(Environment::with_prefix("CODE_HISTORY"));
    Self::from_builder(builder)
  }

  pub fn from_builder(
    builder: ConfigBuilder<DefaultState>,
  ) -> Result<Self, ConfigError> {
    builder.build()?.try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn lookup_config(&self) -> LookupConfig {
    LookupConfig {
      fallback_date: self
        .fallback_date
        .clone()
        .filter(|d| !d.trim().is_empty()),
      today:         local_today,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: lookup routes plus HTTP request tracing.
pub fn app<S>(store: Arc<S>, lookup: LookupConfig) -> Router
where
  S: EphemerisStore + 'static,
{
  api_router(store, lookup).layer(TraceLayer::new_for_http())
}
