//! The `EphemerisStore` trait.
//!
//! Implemented by the content store backends (`code-history-store-rest`,
//! `code-history-store-sqlite`). The lookup service only reads through it;
//! the offline generator is the only writer.

use std::future::Future;

use crate::ephemeris::{Ephemeris, NewEphemeris};

/// Abstraction over the table of daily facts.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait EphemerisStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Exact-match lookup on `display_date`. No format validation is applied;
  /// a value that matches nothing yields `None`.
  ///
  /// Should the table ever hold several rows for one date, the first one is
  /// returned.
  fn find_by_display_date<'a>(
    &'a self,
    display_date: &'a str,
  ) -> impl Future<Output = Result<Option<Ephemeris>, Self::Error>> + Send + 'a;

  /// Insert one row and return it as stored.
  fn insert(
    &self,
    input: NewEphemeris,
  ) -> impl Future<Output = Result<Ephemeris, Self::Error>> + Send + '_;
}
