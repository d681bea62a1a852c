use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use std::sync::Arc;

use crate::client::{ClientConfig, HttpFeedbackClient};
use crate::notify::TerminalNotifier;
use crate::panel::FeedbackPanel;
use crate::record::{FeedbackRecord, QualityFlag};
use crate::transcript::load_transcript;

/// Field edits collected from the command line, applied in control order.
#[derive(Debug, Clone, Default)]
pub struct RecordEdits {
  pub response_quality: Option<u8>,
  pub document_quality: Option<u8>,
  pub verbatim: Option<String>,
  pub documentation: Option<String>,
  pub flags: Vec<QualityFlag>,
}

impl RecordEdits {
  pub fn apply(&self, record: &mut FeedbackRecord) {
    if self.response_quality.is_some() {
      record.set_overall_response_quality(self.response_quality);
    }
    if self.document_quality.is_some() {
      record.set_overall_document_quality(self.document_quality);
    }
    if let Some(text) = &self.verbatim {
      record.set_verbatim(Some(text));
    }
    if let Some(text) = &self.documentation {
      record.set_documentation_accuracy_relevance(Some(text));
    }
    for flag in &self.flags {
      record.set_flag(*flag, true);
    }
  }
}

/// The record a panel opened at `index` would start with, as pretty JSON.
pub fn preview(transcript_path: &Path, index: usize) -> Result<String> {
  let transcript = load_transcript(transcript_path)?;
  let record = FeedbackRecord::seeded(&transcript, index);
  serde_json::to_string_pretty(&record).context("Failed to encode feedback record")
}

pub async fn submit(
  transcript_path: &Path,
  index: usize,
  edits: &RecordEdits,
  config: &ClientConfig,
) -> Result<()> {
  let transcript = load_transcript(transcript_path)?;
  let client = HttpFeedbackClient::new(config, Arc::new(TerminalNotifier))?;
  println!("{} {}", "Submitting feedback to".blue(), client.endpoint().as_str().cyan());

  let mut panel = FeedbackPanel::new(Arc::new(client));
  panel.open(&transcript, index);
  if let Some(record) = panel.record_mut() {
    edits.apply(record);
  }

  let handle = panel.submit()?;

  // The process exits with the runtime, so wait here rather than in the panel.
  handle.outcome().await?;
  println!("{} Feedback recorded", "✓".green());
  Ok(())
}
