//! Chat transcript types consumed by the feedback flow.
//!
//! The transcript is owned by the chat surface; this module only reads it to
//! locate the exchange being rated and to pull citations out of tool messages.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::FeedbackError;

/// Number of positions searched backward from the trigger index, trigger included.
pub const ROLE_LOOKBACK_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Assistant,
  Tool,
  /// Any role this flow does not rate (errors, system notices).
  #[serde(other)]
  Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub id: String,
  pub role: Role,
  pub content: String,
}

impl ChatMessage {
  pub fn new(id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
    Self { id: id.into(), role, content: content.into() }
  }
}

/// A source document reference attached to an assistant answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Citation {
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub filepath: Option<String>,
}

/// Envelope carried in the content of a `tool` message. Only `citations` is
/// read; every other field is ignored whatever its type.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolMessageContent {
  pub citations: Vec<Citation>,
}

/// Search backward from `trigger_index` over at most `window` positions for a
/// message with the given role. Positions outside the transcript are skipped.
pub fn find_role_message(
  transcript: &[ChatMessage],
  trigger_index: usize,
  role: Role,
  window: usize,
) -> Option<&ChatMessage> {
  if role == Role::Other {
    return None;
  }

  (0..window)
    .filter_map(|step| trigger_index.checked_sub(step))
    .filter_map(|index| transcript.get(index))
    .find(|message| message.role == role)
}

/// Parse the citation list out of a tool message body.
pub fn parse_citations(content: &str) -> Result<Vec<Citation>, FeedbackError> {
  serde_json::from_str::<ToolMessageContent>(content)
    .map(|envelope| envelope.citations)
    .map_err(|e| FeedbackError::citation_parse(e.to_string()))
}

/// Read a transcript saved as a JSON array of chat messages.
pub fn load_transcript(path: &Path) -> Result<Vec<ChatMessage>> {
  let raw = fs::read_to_string(path)
    .with_context(|| format!("Failed to read transcript {}", path.display()))?;

  serde_json::from_str(&raw)
    .with_context(|| format!("Failed to parse transcript {}", path.display()))
}
