//! HTTP client that delivers feedback records to the chat backend.
//!
//! One POST per submission, no retries. Any failure raises a user-visible
//! alert through the injected [`Notifier`] before the error is returned.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::error::{FeedbackError, Result, UNKNOWN_ERROR_MESSAGE};
use crate::metrics;
use crate::notify::Notifier;
use crate::record::FeedbackRecord;

pub const FEEDBACK_PATH: &str = "feedback";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub const SERVER_URL_ENV: &str = "FEEDBACK_SERVER_URL";
pub const TIMEOUT_SECS_ENV: &str = "FEEDBACK_TIMEOUT_SECS";

/// Configuration for the feedback HTTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
  /// Base URL of the chat backend (e.g., "http://localhost:5000")
  pub base_url: String,
  /// Optional request timeout; requests wait indefinitely when unset
  pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: DEFAULT_BASE_URL.to_string(), timeout_secs: None }
  }
}

impl ClientConfig {
  /// Build a configuration from `FEEDBACK_SERVER_URL` and `FEEDBACK_TIMEOUT_SECS`.
  pub fn from_env() -> Result<Self> {
    let base_url = std::env::var(SERVER_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let timeout_secs = match std::env::var(TIMEOUT_SECS_ENV) {
      Ok(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
        FeedbackError::config(format!("{TIMEOUT_SECS_ENV}={raw:?} is not a number of seconds: {e}"))
      })?),
      Err(_) => None,
    };

    Ok(Self { base_url, timeout_secs })
  }

  /// The absolute URL of the feedback endpoint under `base_url`.
  pub fn endpoint(&self) -> Result<Url> {
    let mut base = Url::parse(&self.base_url)
      .map_err(|e| FeedbackError::config(format!("invalid base url {:?}: {e}", self.base_url)))?;

    // Without a trailing slash `join` would replace the last path segment.
    if !base.path().ends_with('/') {
      let path = format!("{}/", base.path());
      base.set_path(&path);
    }

    base
      .join(FEEDBACK_PATH)
      .map_err(|e| FeedbackError::config(format!("invalid feedback endpoint: {e}")))
  }
}

/// Anything able to deliver a finished feedback record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackSubmitter: Send + Sync {
  async fn submit(&self, record: &FeedbackRecord) -> Result<()>;
}

pub struct HttpFeedbackClient {
  client: Client,
  endpoint: Url,
  notifier: Arc<dyn Notifier>,
}

impl HttpFeedbackClient {
  pub fn new(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
    let endpoint = config.endpoint()?;

    let mut builder = Client::builder();
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build().map_err(|e| FeedbackError::client_build(e.to_string()))?;

    Ok(Self { client, endpoint, notifier })
  }

  pub fn endpoint(&self) -> &Url {
    &self.endpoint
  }

  /// A single POST attempt; the error string describes why it was rejected.
  async fn post(&self, record: &FeedbackRecord) -> std::result::Result<(), String> {
    let response = self
      .client
      .post(self.endpoint.clone())
      .header(CONTENT_TYPE, "application/json")
      .json(record)
      .send()
      .await
      .map_err(|e| format!("request failed: {e}"))?;

    let status = response.status();
    if status.as_u16() > 299 || !status.is_success() {
      return Err(format!("server responded with HTTP {status}"));
    }

    Ok(())
  }
}

#[async_trait]
impl FeedbackSubmitter for HttpFeedbackClient {
  async fn submit(&self, record: &FeedbackRecord) -> Result<()> {
    let started = Instant::now();
    let outcome = self.post(record).await;

    metrics::trace_duration(
      "feedback_submit",
      started.elapsed().as_millis(),
      json!({ "success": outcome.is_ok(), "answer_id": record.answer_id }),
    );

    match outcome {
      Ok(()) => {
        tracing::info!(endpoint = %self.endpoint, "feedback submitted");
        Ok(())
      }
      Err(reason) => {
        tracing::warn!(endpoint = %self.endpoint, "feedback submission failed: {reason}");
        metrics::trace_count("feedback_submit_failed", 1, json!({ "reason": reason }));
        self.notifier.alert(UNKNOWN_ERROR_MESSAGE);
        Err(FeedbackError::unknown_submission(reason))
      }
    }
  }
}
