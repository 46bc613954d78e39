//! JSON lookup service for code-history.
//!
//! Exposes an axum [`Router`] backed by any
//! [`code_history_core::store::EphemerisStore`]. The service is read-only:
//! rows are written by the offline generator, never through this API.
//! TLS and transport concerns are the caller's responsibility.

pub mod ephemerides;
pub mod error;
pub mod lookup;

use std::sync::Arc;

use axum::{Router, routing::get};
use code_history_core::store::EphemerisStore;

pub use error::ApiError;
pub use lookup::LookupConfig;

/// Shared state threaded through the handlers.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub lookup: Arc<LookupConfig>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      lookup: Arc::clone(&self.lookup),
    }
  }
}

/// Build the lookup router for `store`.
///
/// The returned `Router<()>` can be merged or nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>, lookup: LookupConfig) -> Router<()>
where
  S: EphemerisStore + 'static,
{
  Router::new()
    .route("/ephemerides", get(ephemerides::handler::<S>))
    .with_state(ApiState {
      store,
      lookup: Arc::new(lookup),
    })
}
