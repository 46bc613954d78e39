//! Content store selection shared by the server and the generator binaries.
//!
//! Only the shape and validation live here; each binary loads the values with
//! its own configuration layering and opens the backend itself.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result};

/// Which content store backend to open.
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
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
  /// The hosted table, over HTTP.
  #[default]
  Rest,
  /// A local SQLite file.
  Sqlite,
}

/// Store settings as read from config files and the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
  #[serde(default)]
  pub store:       StoreBackend,
  /// Hosted project URL (REST backend).
  pub store_url:   Option<String>,
  /// Hosted access key (REST backend).
  pub store_key:   Option<String>,
  /// Database file (SQLite backend).
  pub sqlite_path: Option<PathBuf>,
}

/// A validated store selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTarget<'a> {
  Rest { url: &'a str, key: &'a str },
  Sqlite { path: &'a Path },
}

impl StoreSettings {
  /// Check that the selected backend has everything it needs.
  ///
  /// Called before any store is opened, so a missing credential stops a
  /// binary at startup rather than on its first request.
  pub fn target(&self) -> Result<StoreTarget<'_>> {
    match self.store {
      StoreBackend::Rest => Ok(StoreTarget::Rest {
        url: non_empty(self.store_url.as_deref()).ok_or(Error::MissingConfig("store_url"))?,
        key: non_empty(self.store_key.as_deref()).ok_or(Error::MissingConfig("store_key"))?,
      }),
      StoreBackend::Sqlite => Ok(StoreTarget::Sqlite {
        path: self
          .sqlite_path
          .as_deref()
          .filter(|p| !p.as_os_str().is_empty())
          .ok_or(Error::MissingConfig("sqlite_path"))?,
      }),
    }
  }
}

/// `(setting, value)` pairs seeded from the variables hosted-Postgres tooling
/// conventionally exports: `SUPABASE_URL`, and `SUPABASE_SERVICE_KEY` with
/// `SUPABASE_ANON_KEY` as fallback.
pub fn hosted_env_defaults() -> Vec<(&'static str, String)> {
  let mut seeded = Vec::new();
  if let Ok(url) = std::env::var("SUPABASE_URL") {
    seeded.push(("store_url", url));
  }
  let key = std::env::var("SUPABASE_SERVICE_KEY")
    .or_else(|_| std::env::var("SUPABASE_ANON_KEY"));
  if let Ok(key) = key {
    seeded.push(("store_key", key));
  }
  seeded
}

fn non_empty(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}
