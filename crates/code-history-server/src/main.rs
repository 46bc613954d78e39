//! code-history lookup server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus the
//! environment, opens the configured content store, and serves
//! `GET /ephemerides` over HTTP.
//!
//! ```
//! SUPABASE_URL=https://xyz.supabase.co SUPABASE_SERVICE_KEY=... \
//!   cargo run -p code-history-server --bin server
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use code_history_core::{config::StoreTarget, store::EphemerisStore};
use code_history_server::{ServerConfig, app};
use code_history_store_rest::{RestConfig, RestStore};
use code_history_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "code-history lookup server")]
struct Cli {
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

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  // Refuse to start without credentials rather than failing per request.
  let target = server_cfg
    .store
    .target()
    .context("content store is not configured")?;

  match target {
    StoreTarget::Rest { url, key } => {
      tracing::info!(url, "using hosted content store");
      let store = RestStore::new(RestConfig::new(url, key))
        .context("failed to build content store client")?;
      serve(store, &server_cfg).await
    }
    StoreTarget::Sqlite { path } => {
      tracing::info!(path = %path.display(), "using SQLite content store");
      let store = SqliteStore::open(path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      serve(store, &server_cfg).await
    }
  }
}

async fn serve<S>(store: S, server_cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: EphemerisStore + 'static,
{
  let app = app(Arc::new(store), server_cfg.lookup_config());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
