//! Hosted content store backend for code-history.
//!
//! Speaks the PostgREST dialect used by hosted Postgres services: row filters
//! in the query string (`display_date=eq.2025-06-25`), JSON arrays in
//! responses, and `Prefer: return=representation` on inserts.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{RestConfig, RestStore};

#[cfg(test)]
mod tests;
