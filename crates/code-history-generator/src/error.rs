//! Error types for `code-history-generator`.

use thiserror::Error;

/// Why no usable candidate came back from the model.
#[derive(Debug, Clone, Error)]
pub enum DraftError {
  #[error("network error: {0}")]
  Transport(String),

  #[error("timeout")]
  Timeout,

  #[error("http {status}: {body}")]
  Http { status: u16, body: String },

  #[error("rate limited")]
  RateLimited,

  #[error("invalid api key")]
  InvalidApiKey,

  #[error("model returned no content")]
  EmptyReply,

  #[error("malformed candidate: {0}")]
  Malformed(String),

  #[error("candidate is missing `{0}`")]
  Incomplete(&'static str),

  #[error("model found no verifiable event: {0}")]
  NoVerifiableEvent(String),
}

impl DraftError {
  /// Returns true if the error is transient and should be retried.
  pub fn should_retry(&self) -> bool {
    match self {
      Self::Transport(_) | Self::Timeout | Self::RateLimited => true,
      Self::Http { status, .. } => (500..=599).contains(status),
      _ => false,
    }
  }
}

impl From<reqwest::Error> for DraftError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      Self::Timeout
    } else {
      Self::Transport(e.to_string())
    }
  }
}

/// A generator run that ended without a stored fact.
#[derive(Debug, Error)]
pub enum GenerateError {
  #[error("content store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Draft(#[from] DraftError),
}

impl GenerateError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}
