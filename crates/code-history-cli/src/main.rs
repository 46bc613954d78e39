//! `code-history`: today's programming-history fact in the terminal.
//!
//! # Usage
//!
//! ```
//! code-history --url http://localhost:3000
//! code-history --date 2025-06-25 --plain
//! code-history --config ~/.config/code-history/config.toml --plain --share
//! ```

mod app;
mod client;
mod share;
mod ui;

use std::{
  io,
  path::PathBuf,
  sync::Mutex,
  time::{Duration, Instant},
};

use anyhow::{Context, Result};
use app::{App, Request};
use clap::Parser;
use client::FactClient;
use code_history_core::{
  date::{display_date, parse_display_date},
  display::{Locale, format_for_display},
};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Delay between two revealed characters.
const TYPING_INTERVAL: Duration = Duration::from_millis(30);

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "code-history", about = "Today's programming-history fact")]
struct Args {
  /// Path to a TOML config file (url, locale, share_url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the lookup service (default: http://localhost:3000).
  #[arg(long, env = "CODE_HISTORY_URL")]
  url: Option<String>,

  /// Show the fact filed under this date (YYYY-MM-DD) instead of today's.
  #[arg(long, value_name = "DATE")]
  date: Option<String>,

  /// Month-name language: `es` or `en`.
  #[arg(long)]
  locale: Option<Locale>,

  /// Print the fact to stdout instead of opening the terminal UI.
  #[arg(long)]
  plain: bool,

  /// With `--plain`, also print a share link.
  #[arg(long, requires = "plain")]
  share: bool,

  /// Page the share link points back to (default: the service URL).
  #[arg(long, env = "CODE_HISTORY_SHARE_URL")]
  share_url: Option<String>,

  /// Write logs to this file (the terminal UI otherwise logs nothing).
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:       String,
  #[serde(default)]
  locale:    Option<Locale>,
  #[serde(default)]
  share_url: String,
}

fn non_empty(s: &str) -> Option<String> { (!s.is_empty()).then(|| s.to_owned()) }

// ─── Logging ──────────────────────────────────────────────────────────────────

fn init_tracing(args: &Args) -> Result<()> {
  let filter = |default: LevelFilter| {
    EnvFilter::builder()
      .with_default_directive(default.into())
      .from_env_lossy()
  };

  if let Some(path) = &args.log_file {
    let file = std::fs::File::create(path)
      .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(filter(LevelFilter::INFO))
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  } else if args.plain {
    tracing_subscriber::fmt()
      .with_env_filter(filter(LevelFilter::WARN))
      .with_writer(io::stderr)
      .init();
  }
  // The full-screen UI owns the terminal: no subscriber, no output.
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_tracing(&args)?;

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .clone()
    .or_else(|| non_empty(&file_cfg.url))
    .unwrap_or_else(|| DEFAULT_URL.to_string());
  let locale = args.locale.or(file_cfg.locale).unwrap_or_default();
  let share_url = args
    .share_url
    .clone()
    .or_else(|| non_empty(&file_cfg.share_url))
    .unwrap_or_else(|| base_url.clone());

  let request = match &args.date {
    Some(raw) => {
      let date = parse_display_date(raw)
        .with_context(|| format!("invalid --date {raw:?}"))?;
      Request::Date(display_date(date))
    }
    None => Request::Today,
  };

  let client = FactClient::new(base_url).context("building HTTP client")?;

  if args.plain {
    let share_url = args.share.then_some(share_url.as_str());
    return run_plain(&client, &request, locale, share_url).await;
  }

  let mut app = App::new(client, request, locale, share_url);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  app.start_load();
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Plain output ─────────────────────────────────────────────────────────────

async fn run_plain(
  client: &FactClient,
  request: &Request,
  locale: Locale,
  share_url: Option<&str>,
) -> Result<()> {
  let found = match request {
    Request::Today => client.today().await,
    Request::Date(date) => client.ephemeris_for_date(date).await,
  };
  let messages = app::Messages::for_locale(locale);

  match found {
    Some(ephemeris) => {
      let fact = format_for_display(&ephemeris, locale);
      println!("{}", fact.transcript(locale));
      if let Some(page) = share_url {
        println!();
        println!("{}", share::intent_url(&fact, page)?);
      }
    }
    None => println!("{}", messages.empty),
  }
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  let mut last_tick = Instant::now();

  loop {
    app.poll_load().await;
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Wait at most until the next character is due.
    let timeout = TYPING_INTERVAL.saturating_sub(last_tick.elapsed());
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(timeout)? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if !app.handle_key(key)? {
        break;
      }
    }

    if last_tick.elapsed() >= TYPING_INTERVAL {
      app.tick();
      last_tick = Instant::now();
    }
  }

  Ok(())
}
