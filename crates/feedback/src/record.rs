//! The feedback record submitted for one rated question/answer exchange.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::transcript::{self, ChatMessage, Role, ROLE_LOOKBACK_WINDOW};

pub const DEFAULT_RATING: u8 = 3;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A cited document as reported back to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocFeedback {
  pub title: String,
  pub filepath: String,
}

/// Boolean quality markers a reviewer can tick independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum QualityFlag {
  Inaccurate,
  MissingInfo,
  TooLong,
  TooShort,
  Confusing,
  Offensive,
  Biased,
  Outdated,
  Repetitive,
  Fantastic,
}

impl QualityFlag {
  pub const ALL: [QualityFlag; 10] = [
    QualityFlag::Inaccurate,
    QualityFlag::MissingInfo,
    QualityFlag::TooLong,
    QualityFlag::TooShort,
    QualityFlag::Confusing,
    QualityFlag::Offensive,
    QualityFlag::Biased,
    QualityFlag::Outdated,
    QualityFlag::Repetitive,
    QualityFlag::Fantastic,
  ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
  pub overall_response_quality: Option<u8>,
  pub overall_document_quality: Option<u8>,
  pub verbatim: Option<String>,
  pub documentation_accuracy_relevance: Option<String>,
  pub inaccurate_answer: Option<bool>,
  pub missing_info: Option<bool>,
  pub too_long: Option<bool>,
  pub too_short: Option<bool>,
  pub confusing: Option<bool>,
  pub offensive: Option<bool>,
  pub biased: Option<bool>,
  pub outdated: Option<bool>,
  pub repetitive: Option<bool>,
  pub fantastic: Option<bool>,
  pub case_number: Option<String>,
  pub question_id: Option<String>,
  pub question: Option<String>,
  pub answer_id: Option<String>,
  pub answer: Option<String>,
  pub top_docs: Vec<DocFeedback>,
}

impl Default for FeedbackRecord {
  fn default() -> Self {
    Self {
      overall_response_quality: Some(DEFAULT_RATING),
      overall_document_quality: Some(DEFAULT_RATING),
      verbatim: Some(String::new()),
      documentation_accuracy_relevance: Some(String::new()),
      inaccurate_answer: Some(false),
      missing_info: Some(false),
      too_long: Some(false),
      too_short: Some(false),
      confusing: Some(false),
      offensive: Some(false),
      biased: Some(false),
      outdated: Some(false),
      repetitive: Some(false),
      fantastic: Some(false),
      case_number: None,
      question_id: Some(String::new()),
      question: Some(String::new()),
      answer_id: Some(String::new()),
      answer: Some(String::new()),
      top_docs: Vec::new(),
    }
  }
}

/// Ratings come from a star control with no zero state: a cleared value records
/// the minimum and anything else is clamped into range.
fn normalize_rating(rating: Option<u8>) -> u8 {
  rating.unwrap_or(MIN_RATING).clamp(MIN_RATING, MAX_RATING)
}

impl FeedbackRecord {
  /// A fresh record seeded from the exchange preceding `trigger_index`.
  pub fn seeded(transcript: &[ChatMessage], trigger_index: usize) -> Self {
    let mut record = Self::default();
    record.seed(transcript, trigger_index);
    record
  }

  /// Overwrite the identifying fields from the transcript, leaving ratings,
  /// commentary and flags untouched.
  pub fn seed(&mut self, transcript: &[ChatMessage], trigger_index: usize) {
    let exchange = SeededExchange::from_transcript(transcript, trigger_index);

    self.question_id = Some(exchange.question_id);
    self.question = Some(exchange.question);
    self.answer_id = Some(exchange.answer_id);
    self.answer = Some(exchange.answer);
    self.top_docs = exchange.top_docs;
  }

  pub fn set_overall_response_quality(&mut self, rating: Option<u8>) {
    self.overall_response_quality = Some(normalize_rating(rating));
  }

  pub fn set_overall_document_quality(&mut self, rating: Option<u8>) {
    self.overall_document_quality = Some(normalize_rating(rating));
  }

  pub fn set_verbatim(&mut self, text: Option<&str>) {
    self.verbatim = Some(text.unwrap_or_default().to_string());
  }

  pub fn set_documentation_accuracy_relevance(&mut self, text: Option<&str>) {
    self.documentation_accuracy_relevance = Some(text.unwrap_or_default().to_string());
  }

  pub fn set_flag(&mut self, flag: QualityFlag, value: bool) {
    *self.flag_slot(flag) = Some(value);
  }

  /// Current value of a flag; an unset flag reads as `false`.
  pub fn flag(&self, flag: QualityFlag) -> bool {
    let value = match flag {
      QualityFlag::Inaccurate => self.inaccurate_answer,
      QualityFlag::MissingInfo => self.missing_info,
      QualityFlag::TooLong => self.too_long,
      QualityFlag::TooShort => self.too_short,
      QualityFlag::Confusing => self.confusing,
      QualityFlag::Offensive => self.offensive,
      QualityFlag::Biased => self.biased,
      QualityFlag::Outdated => self.outdated,
      QualityFlag::Repetitive => self.repetitive,
      QualityFlag::Fantastic => self.fantastic,
    };
    value.unwrap_or(false)
  }

  fn flag_slot(&mut self, flag: QualityFlag) -> &mut Option<bool> {
    match flag {
      QualityFlag::Inaccurate => &mut self.inaccurate_answer,
      QualityFlag::MissingInfo => &mut self.missing_info,
      QualityFlag::TooLong => &mut self.too_long,
      QualityFlag::TooShort => &mut self.too_short,
      QualityFlag::Confusing => &mut self.confusing,
      QualityFlag::Offensive => &mut self.offensive,
      QualityFlag::Biased => &mut self.biased,
      QualityFlag::Outdated => &mut self.outdated,
      QualityFlag::Repetitive => &mut self.repetitive,
      QualityFlag::Fantastic => &mut self.fantastic,
    }
  }
}

/// The identifying fields derived from the transcript around a trigger point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeededExchange {
  pub question_id: String,
  pub question: String,
  pub answer_id: String,
  pub answer: String,
  pub top_docs: Vec<DocFeedback>,
}

impl SeededExchange {
  pub fn from_transcript(transcript: &[ChatMessage], trigger_index: usize) -> Self {
    Self::with_window(transcript, trigger_index, ROLE_LOOKBACK_WINDOW)
  }

  pub fn with_window(transcript: &[ChatMessage], trigger_index: usize, window: usize) -> Self {
    // The first message has no preceding exchange to rate.
    if trigger_index < 1 {
      return Self::default();
    }

    let find = |role| transcript::find_role_message(transcript, trigger_index, role, window);

    let (question_id, question) = find(Role::User)
      .map(|m| (m.id.clone(), m.content.clone()))
      .unwrap_or_default();
    let (answer_id, answer) = find(Role::Assistant)
      .map(|m| (m.id.clone(), m.content.clone()))
      .unwrap_or_default();
    let top_docs = find(Role::Tool).map(|m| top_docs_from_tool(&m.content)).unwrap_or_default();

    Self { question_id, question, answer_id, answer, top_docs }
  }
}

fn top_docs_from_tool(content: &str) -> Vec<DocFeedback> {
  let citations = match transcript::parse_citations(content) {
    Ok(citations) => citations,
    Err(e) => {
      tracing::debug!("seeding without citations: {e}");
      Vec::new()
    }
  };

  citations
    .into_iter()
    .map(|c| DocFeedback {
      title: c.title.unwrap_or_default(),
      filepath: c.filepath.unwrap_or_default(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_record_matches_initial_panel_state() {
    let record = FeedbackRecord::default();
    assert_eq!(record.overall_response_quality, Some(3));
    assert_eq!(record.overall_document_quality, Some(3));
    assert_eq!(record.verbatim.as_deref(), Some(""));
    assert!(record.case_number.is_none());
    assert!(record.top_docs.is_empty());
    for flag in QualityFlag::ALL {
      assert!(!record.flag(flag), "{flag:?} should default to false");
    }
  }

  #[test]
  fn test_flags_toggle_independently() {
    for flag in QualityFlag::ALL {
      let mut record = FeedbackRecord::default();
      record.set_flag(flag, true);

      assert!(record.flag(flag));
      for other in QualityFlag::ALL.into_iter().filter(|f| *f != flag) {
        assert!(!record.flag(other), "setting {flag:?} changed {other:?}");
      }

      let mut expected = FeedbackRecord::default();
      *expected.flag_slot(flag) = Some(true);
      assert_eq!(record, expected);
    }
  }

  #[test]
  fn test_flag_can_be_cleared_again() {
    let mut record = FeedbackRecord::default();
    record.set_flag(QualityFlag::Fantastic, true);
    record.set_flag(QualityFlag::Fantastic, false);
    assert_eq!(record.fantastic, Some(false));
  }

  #[test]
  fn test_rating_normalization() {
    let mut record = FeedbackRecord::default();

    record.set_overall_response_quality(Some(5));
    assert_eq!(record.overall_response_quality, Some(5));

    record.set_overall_response_quality(None);
    assert_eq!(record.overall_response_quality, Some(1));

    record.set_overall_document_quality(Some(0));
    assert_eq!(record.overall_document_quality, Some(1));

    record.set_overall_document_quality(Some(9));
    assert_eq!(record.overall_document_quality, Some(5));
  }

  #[test]
  fn test_cleared_text_records_empty_string() {
    let mut record = FeedbackRecord::default();
    record.set_verbatim(Some("too vague"));
    assert_eq!(record.verbatim.as_deref(), Some("too vague"));

    record.set_verbatim(None);
    assert_eq!(record.verbatim.as_deref(), Some(""));

    record.set_documentation_accuracy_relevance(Some("wrong manual cited"));
    assert_eq!(record.documentation_accuracy_relevance.as_deref(), Some("wrong manual cited"));
  }

  #[test]
  fn test_seed_leaves_edited_fields_alone() {
    let transcript = vec![
      ChatMessage::new("u1", Role::User, "Q"),
      ChatMessage::new("a1", Role::Assistant, "A"),
    ];
    let mut record = FeedbackRecord::default();
    record.set_overall_response_quality(Some(5));
    record.set_flag(QualityFlag::TooLong, true);
    record.set_verbatim(Some("nice"));

    record.seed(&transcript, 1);

    assert_eq!(record.overall_response_quality, Some(5));
    assert_eq!(record.too_long, Some(true));
    assert_eq!(record.verbatim.as_deref(), Some("nice"));
    assert_eq!(record.question_id.as_deref(), Some("u1"));
    assert_eq!(record.answer_id.as_deref(), Some("a1"));
  }

  #[test]
  fn test_wider_window_reaches_further_back() {
    let transcript = vec![
      ChatMessage::new("u1", Role::User, "Q"),
      ChatMessage::new("t1", Role::Tool, "{}"),
      ChatMessage::new("t2", Role::Tool, "{}"),
      ChatMessage::new("a1", Role::Assistant, "A"),
    ];

    assert_eq!(SeededExchange::from_transcript(&transcript, 3).question_id, "");
    assert_eq!(SeededExchange::with_window(&transcript, 3, 4).question_id, "u1");
  }

  #[test]
  fn test_serializes_every_field_including_nulls() {
    let value = serde_json::to_value(FeedbackRecord::default()).unwrap();
    let object = value.as_object().unwrap();

    assert_eq!(object.len(), 20);
    assert!(object["case_number"].is_null());
    assert_eq!(object["overall_response_quality"], 3);
    assert_eq!(object["inaccurate_answer"], false);
    assert_eq!(object["top_docs"], serde_json::json!([]));

    let mut record = FeedbackRecord::default();
    record.verbatim = None;
    let value = serde_json::to_value(record).unwrap();
    assert!(value["verbatim"].is_null());
  }
}
