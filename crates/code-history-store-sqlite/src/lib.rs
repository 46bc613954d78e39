//! SQLite backend for the code-history content store.
//!
//! Mirrors the hosted `ephemerides` table so the lookup service and the
//! generator can run without network access. Wraps [`tokio_rusqlite`] so all
//! database access runs on a dedicated thread without blocking the async
//! runtime.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
