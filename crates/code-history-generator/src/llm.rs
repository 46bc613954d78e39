//! Chat-completions client that drafts a [`Candidate`] for a target day.

use std::{future::Future, time::Duration};

use backon::{ExponentialBuilder, Retryable};
use chrono::{Datelike, NaiveDate};
use code_history_core::display::Locale;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
  candidate::{Candidate, parse_reply},
  error::DraftError,
};

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-5";

const MAX_COMPLETION_TOKENS: u32 = 600;

const SYSTEM_PROMPT: &str = "Eres un experto en historia de la programación y \
tecnología. Generas efemérides educativas sobre eventos históricos relacionados \
con desarrollo de software, lenguajes de programación, frameworks, empresas \
tecnológicas y hitos importantes en la informática o el desarrollo de software. \
Respondes siempre en formato JSON válido.";

// ─── Drafter trait ────────────────────────────────────────────────────────────

/// Produces a candidate fact for the day it will be shown on.
pub trait Drafter: Send + Sync {
  fn draft(
    &self,
    target: NaiveDate,
  ) -> impl Future<Output = Result<Candidate, DraftError>> + Send + '_;
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
struct Message {
  role:    &'static str,
  content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model:                 &'a str,
  messages:              Vec<Message>,
  reasoning_effort:      &'static str,
  verbosity:             &'static str,
  max_completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
  content: Option<String>,
}

// ─── OpenAiDrafter ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OpenAiDrafter {
  http:    Client,
  api_key: String,
  model:   String,
  url:     String,
  backoff: ExponentialBuilder,
}

impl OpenAiDrafter {
  const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

  pub fn new(api_key: impl Into<String>) -> Result<Self, DraftError> {
    let http = Client::builder()
      .timeout(Self::REQUEST_TIMEOUT)
      .user_agent(concat!("code-history/", env!("CARGO_PKG_VERSION")))
      .build()?;

    Ok(Self {
      http,
      api_key: api_key.into(),
      model: DEFAULT_MODEL.to_owned(),
      url: OPENAI_CHAT_URL.to_owned(),
      backoff: ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(1))
        .with_max_delay(Duration::from_secs(30))
        .with_max_times(3)
        .with_jitter(),
    })
  }

  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.model = model.into();
    self
  }

  /// Point at a different chat-completions endpoint.
  pub fn with_url(mut self, url: impl Into<String>) -> Self {
    self.url = url.into();
    self
  }

  pub fn with_backoff(mut self, backoff: ExponentialBuilder) -> Self {
    self.backoff = backoff;
    self
  }

  async fn send_request(&self, request: &ChatRequest<'_>) -> Result<String, DraftError> {
    let res = self
      .http
      .post(&self.url)
      .bearer_auth(&self.api_key)
      .json(request)
      .send()
      .await?;

    match res.status() {
      s if s.is_success() => {
        let body: ChatResponse = res
          .json()
          .await
          .map_err(|e| DraftError::Malformed(e.to_string()))?;
        body
          .choices
          .into_iter()
          .next()
          .and_then(|c| c.message.content)
          .filter(|c| !c.trim().is_empty())
          .ok_or(DraftError::EmptyReply)
      }
      StatusCode::UNAUTHORIZED => Err(DraftError::InvalidApiKey),
      StatusCode::TOO_MANY_REQUESTS => Err(DraftError::RateLimited),
      s => {
        let status = s.as_u16();
        let body = res.text().await.unwrap_or_default();
        Err(DraftError::Http { status, body })
      }
    }
  }
}

impl Drafter for OpenAiDrafter {
  async fn draft(&self, target: NaiveDate) -> Result<Candidate, DraftError> {
    let request = ChatRequest {
      model:                 &self.model,
      messages:              vec![
        Message { role: "system", content: SYSTEM_PROMPT.to_owned() },
        Message { role: "user", content: user_prompt(target) },
      ],
      reasoning_effort:      "minimal",
      verbosity:             "low",
      max_completion_tokens: MAX_COMPLETION_TOKENS,
    };

    let content = (|| async { self.send_request(&request).await })
      .retry(&self.backoff)
      .when(|e: &DraftError| e.should_retry())
      .notify(|e, dur| {
        warn!(
          "model call failed, retrying after {:.2}s: {}",
          dur.as_secs_f64(),
          e
        )
      })
      .await?;

    tracing::debug!(len = content.len(), "model replied");
    parse_reply(&content)
  }
}

/// Ask for an event that happened on the target's day and month, any year.
fn user_prompt(target: NaiveDate) -> String {
  let day = target.day();
  let month = target.month();
  let month_name = Locale::Es.month_name(month as i32).unwrap_or_default();

  format!(
    r#"Genera una efeméride sobre programación y desarrollo de software para el {day} de {month_name}.

Busca un evento histórico relacionado con programación, software, lenguajes, frameworks o tecnología que haya ocurrido un {day} de {month_name} de cualquier año.

Si no encuentras ningún evento verificable, responde {{"error": "motivo"}}.

Responde SOLO en formato JSON:
{{
    "event": "Descripción del evento en español",
    "historicalYear": año_del_evento,
    "historicalMonth": {month},
    "historicalDay": {day}
}}

Ejemplo:
{{
    "event": "El 25 de agosto de 1991, Linus Torvalds anuncia públicamente el kernel Linux.",
    "historicalYear": 1991,
    "historicalMonth": 8,
    "historicalDay": 25
}}"#
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  };

  use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode as AxumStatus},
    response::{IntoResponse, Response},
    routing::post,
  };
  use serde_json::{Value, json};
  use tokio::net::TcpListener;

  const FENCED: &str = "```json\n{\"event\": \"Linux\", \"historicalYear\": 1991, \
                        \"historicalMonth\": 8, \"historicalDay\": 25}\n```";

  /// Fake endpoint: answers `status` for the first `failures` calls.
  #[derive(Clone)]
  struct Fake {
    calls:    Arc<AtomicUsize>,
    failures: usize,
    status:   AxumStatus,
  }

  async fn completions(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Json(body): Json<Value>,
  ) -> Response {
    let n = fake.calls.fetch_add(1, Ordering::SeqCst);
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    if bearer != Some("Bearer sk-test") {
      return AxumStatus::UNAUTHORIZED.into_response();
    }
    if n < fake.failures {
      return (fake.status, "upstream busy").into_response();
    }
    assert_eq!(body["model"], "gpt-5");
    assert_eq!(body["reasoning_effort"], "minimal");
    assert_eq!(body["max_completion_tokens"], 600);
    assert_eq!(body["messages"][0]["role"], "system");
    Json(json!({
      "choices": [{ "message": { "role": "assistant", "content": FENCED } }]
    }))
    .into_response()
  }

  async fn drafter(
    failures: usize,
    status: AxumStatus,
    key: &str,
  ) -> (OpenAiDrafter, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
      .route("/v1/chat/completions", post(completions))
      .with_state(Fake { calls: calls.clone(), failures, status });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });

    let drafter = OpenAiDrafter::new(key)
      .unwrap()
      .with_url(format!("http://{addr}/v1/chat/completions"))
      .with_backoff(
        ExponentialBuilder::default()
          .with_min_delay(Duration::from_millis(1))
          .with_max_delay(Duration::from_millis(5))
          .with_max_times(3),
      );
    (drafter, calls)
  }

  fn aug_25() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 8, 25).unwrap() }

  #[tokio::test]
  async fn drafts_candidate_from_fenced_reply() {
    let (d, calls) = drafter(0, AxumStatus::OK, "sk-test").await;
    let c = d.draft(aug_25()).await.unwrap();
    assert_eq!(c.event, "Linux");
    assert_eq!(c.historical_year, 1991);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn retries_server_errors() {
    let (d, calls) = drafter(2, AxumStatus::SERVICE_UNAVAILABLE, "sk-test").await;
    assert!(d.draft(aug_25()).await.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn gives_up_after_three_retries() {
    let (d, calls) = drafter(10, AxumStatus::BAD_GATEWAY, "sk-test").await;
    let err = d.draft(aug_25()).await.unwrap_err();
    assert!(matches!(err, DraftError::Http { status: 502, .. }), "{err:?}");
    assert_eq!(calls.load(Ordering::SeqCst), 4);
  }

  #[tokio::test]
  async fn bad_key_is_not_retried() {
    let (d, calls) = drafter(0, AxumStatus::OK, "sk-wrong").await;
    assert!(matches!(d.draft(aug_25()).await, Err(DraftError::InvalidApiKey)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn prompt_names_the_target_day() {
    let prompt = user_prompt(aug_25());
    assert!(prompt.contains("para el 25 de agosto."));
    assert!(prompt.contains("\"historicalMonth\": 8,"));
  }
}
