//! Error type for `code-history-store-rest`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("content store returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("cannot decode content store response: {0}")]
  Decode(String),

  #[error("content store accepted the insert but returned no row")]
  EmptyInsert,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
