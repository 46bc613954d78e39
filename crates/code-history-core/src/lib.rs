//! Core types and trait definitions for code-history.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Every other crate depends on it: the lookup service, the store backends,
//! the terminal client and the offline generator.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod config;
pub mod date;
pub mod display;
pub mod ephemeris;
pub mod error;
pub mod store;

pub use error::{Error, Result};
