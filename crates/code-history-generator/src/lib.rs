//! Offline generator: drafts a fact for a target day with a chat-completions
//! model and files it in the content store, unless one is already there.
//!
//! The `generate-daily` binary is a thin wrapper around [`generate`].

#![allow(async_fn_in_trait)]

pub mod candidate;
pub mod config;
pub mod error;
pub mod llm;
mod run;

pub use candidate::Candidate;
pub use config::GeneratorConfig;
pub use error::{DraftError, GenerateError};
pub use llm::{Drafter, OpenAiDrafter};
pub use run::{Outcome, generate};
