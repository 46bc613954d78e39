//! Generator configuration: content store settings plus model credentials.

use std::path::Path;

use code_history_core::{
  Error,
  config::{StoreSettings, hosted_env_defaults},
};
use config::{
  Config, ConfigError, Environment, File,
  builder::{ConfigBuilder, DefaultState},
};
use serde::Deserialize;

use crate::llm::{DEFAULT_MODEL, OPENAI_CHAT_URL};

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
  pub openai_api_key: Option<String>,
  #[serde(default = "default_model")]
  pub openai_model:   String,
  #[serde(default = "default_url")]
  pub openai_url:     String,
  #[serde(flatten)]
  pub store:          StoreSettings,
}

fn default_model() -> String { DEFAULT_MODEL.into() }

fn default_url() -> String { OPENAI_CHAT_URL.into() }

impl GeneratorConfig {
  /// Layer, lowest priority first: the conventional variables
  /// (`SUPABASE_*`, `OPENAI_API_KEY`, `OPENAI_MODEL`), the TOML file at
  /// `path` if it exists, then `CODE_HISTORY_*` variables.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let mut builder = Config::builder();
    for (key, value) in hosted_env_defaults() {
      builder = builder.set_default(key, value)?;
    }
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
      builder = builder.set_default("openai_api_key", key)?;
    }
    if let Ok(model) = std::env::var("OPENAI_MODEL") {
      builder = builder.set_default("openai_model", model)?;
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

  pub fn api_key(&self) -> code_history_core::Result<&str> {
    self
      .openai_api_key
      .as_deref()
      .map(str::trim)
      .filter(|k| !k.is_empty())
      .ok_or(Error::MissingConfig("openai_api_key"))
  }
}
