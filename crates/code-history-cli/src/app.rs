//! Application state machine and event dispatcher.

use std::sync::Arc;

use code_history_core::{
  display::{DisplayFact, Locale, format_for_display},
  ephemeris::Ephemeris,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::task::JoinHandle;

use crate::{client::FactClient, share};

// ─── Phase ────────────────────────────────────────────────────────────────────

/// What the fact pane is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
  /// A lookup is in flight.
  Loading,
  /// A fact is being (or has been) typed out.
  Ready,
  /// The lookup found nothing for the requested day.
  Empty,
  /// The lookup task itself died; carries the message to show.
  Failed(String),
}

/// Which day to ask the lookup service for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
  /// The viewer's local calendar date.
  Today,
  Date(String),
}

/// Fixed user-facing strings.
pub struct Messages {
  pub loading:     &'static str,
  pub empty:       &'static str,
  pub load_failed: &'static str,
}

impl Messages {
  pub fn for_locale(locale: Locale) -> Self {
    match locale {
      Locale::Es => Self {
        loading:     "Cargando efeméride del día...",
        empty:       "No hay efeméride disponible para hoy.",
        load_failed: "Error al cargar la efeméride del día",
      },
      Locale::En => Self {
        loading:     "Loading today's fact...",
        empty:       "No fact available for today.",
        load_failed: "Failed to load today's fact",
      },
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub phase: Phase,

  pub locale: Locale,

  pub request: Request,

  /// The formatted fact, once loaded.
  pub fact: Option<DisplayFact>,

  /// Full text to type out, as characters so the cursor never splits one.
  transcript: Vec<char>,

  /// How many characters of `transcript` are visible.
  pub typed: usize,

  /// Page the share intent links back to.
  pub share_url: String,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pending: Option<JoinHandle<Option<Ephemeris>>>,

  /// Shared HTTP client.
  pub client: Arc<FactClient>,
}

impl App {
  pub fn new(
    client: FactClient,
    request: Request,
    locale: Locale,
    share_url: String,
  ) -> Self {
    Self {
      phase: Phase::Loading,
      locale,
      request,
      fact: None,
      transcript: Vec::new(),
      typed: 0,
      share_url,
      status_msg: String::new(),
      pending: None,
      client: Arc::new(client),
    }
  }

  pub fn messages(&self) -> Messages { Messages::for_locale(self.locale) }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Start a lookup in the background and show the loading state.
  pub fn start_load(&mut self) {
    if let Some(task) = self.pending.take() {
      task.abort();
    }
    let client = Arc::clone(&self.client);
    let request = self.request.clone();
    self.pending = Some(tokio::spawn(async move {
      match request {
        Request::Today => client.today().await,
        Request::Date(date) => client.ephemeris_for_date(&date).await,
      }
    }));
    self.phase = Phase::Loading;
    self.fact = None;
    self.transcript.clear();
    self.typed = 0;
  }

  /// Collect the background lookup if it has finished.
  pub async fn poll_load(&mut self) {
    let finished = self.pending.as_ref().is_some_and(|t| t.is_finished());
    if !finished {
      return;
    }
    let Some(task) = self.pending.take() else {
      return;
    };
    match task.await {
      Ok(found) => self.show(found),
      Err(e) => {
        tracing::error!(error = %e, "lookup task failed");
        self.phase = Phase::Failed(self.messages().load_failed.to_owned());
      }
    }
  }

  /// Move to `Ready` with a fresh typing animation, or to `Empty`.
  pub fn show(&mut self, found: Option<Ephemeris>) {
    match found {
      Some(ephemeris) => {
        let fact = format_for_display(&ephemeris, self.locale);
        self.transcript = fact.transcript(self.locale).chars().collect();
        self.typed = 0;
        self.fact = Some(fact);
        self.phase = Phase::Ready;
      }
      None => {
        self.fact = None;
        self.transcript.clear();
        self.typed = 0;
        self.phase = Phase::Empty;
      }
    }
  }

  // ── Typing animation ──────────────────────────────────────────────────────

  /// Reveal one more character.
  pub fn tick(&mut self) {
    if self.phase == Phase::Ready && self.typed < self.transcript.len() {
      self.typed += 1;
    }
  }

  pub fn is_typing(&self) -> bool {
    self.phase == Phase::Ready && self.typed < self.transcript.len()
  }

  pub fn typed_text(&self) -> String {
    self.transcript[..self.typed].iter().collect()
  }

  fn finish_typing(&mut self) { self.typed = self.transcript.len(); }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return Ok(false),

      KeyCode::Enter | KeyCode::Char(' ') => self.finish_typing(),

      KeyCode::Char('r') => {
        self.status_msg.clear();
        self.start_load();
      }

      KeyCode::Char('s') => match &self.fact {
        Some(fact) => {
          self.status_msg = share::intent_url(fact, &self.share_url)?;
        }
        None => {
          self.status_msg = self.messages().empty.to_owned();
        }
      },

      _ => {}
    }
    Ok(true)
  }
}
