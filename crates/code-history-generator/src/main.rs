//! `generate-daily`: draft and file the fact for one day.
//!
//! ```
//! OPENAI_API_KEY=... SUPABASE_URL=... SUPABASE_SERVICE_KEY=... \
//!   cargo run -p code-history-generator --bin generate-daily -- 2025-06-25
//! ```
//!
//! Without a date argument the target is tomorrow in local time.

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{Days, NaiveDate};
use clap::Parser;
use code_history_core::{
  config::StoreTarget,
  date::{display_date, local_today, parse_display_date},
  store::EphemerisStore,
};
use code_history_generator::{GeneratorConfig, OpenAiDrafter, Outcome, generate};
use code_history_store_rest::{RestConfig, RestStore};
use code_history_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Draft and store the daily programming-history fact")]
struct Cli {
  /// Day to file a fact for (YYYY-MM-DD); defaults to tomorrow.
  date: Option<String>,

  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let target = match &cli.date {
    Some(raw) => parse_display_date(raw)
      .with_context(|| format!("invalid date argument {raw:?}"))?,
    None => local_today()
      .checked_add_days(Days::new(1))
      .context("tomorrow is out of range")?,
  };
  tracing::info!(date = %display_date(target), "target day");

  let cfg = GeneratorConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  // Validate everything before the first network call.
  let api_key = cfg.api_key().context("model credentials are not configured")?;
  let target_store = cfg.store.target().context("content store is not configured")?;

  let drafter = OpenAiDrafter::new(api_key)
    .context("failed to build model client")?
    .with_model(&cfg.openai_model)
    .with_url(&cfg.openai_url);

  match target_store {
    StoreTarget::Rest { url, key } => {
      let store = RestStore::new(RestConfig::new(url, key))
        .context("failed to build content store client")?;
      run(&store, &drafter, target).await
    }
    StoreTarget::Sqlite { path } => {
      let store = SqliteStore::open(path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      run(&store, &drafter, target).await
    }
  }
}

async fn run<S>(
  store: &S,
  drafter: &OpenAiDrafter,
  target: NaiveDate,
) -> anyhow::Result<()>
where
  S: EphemerisStore,
{
  match generate(store, drafter, target)
    .await
    .with_context(|| format!("could not file a fact for {}", display_date(target)))?
  {
    Outcome::AlreadyPresent(existing) => {
      tracing::info!(id = existing.id, "a fact is already filed; no new one needed");
    }
    Outcome::Inserted(stored) => {
      tracing::info!(id = stored.id, event = %stored.event, "fact generated and stored");
    }
  }
  Ok(())
}
