//! Error types for `code-history-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid date {0:?}: expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("missing configuration value `{0}`")]
  MissingConfig(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
