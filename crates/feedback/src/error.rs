use thiserror::Error;

/// Message shown to the user (and carried by the error) when a submission fails.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

#[derive(Error, Debug)]
pub enum FeedbackError {
  #[error("Failed to parse tool message citations: {message}")]
  CitationParse { message: String },

  #[error("Unknown error: {reason}")]
  UnknownSubmission { reason: String },

  #[error("Feedback panel is not open")]
  PanelClosed,

  #[error("Submission task did not complete: {message}")]
  SubmissionTask { message: String },

  #[error("Invalid configuration: {message}")]
  Config { message: String },

  #[error("Failed to create HTTP client: {message}")]
  ClientBuild { message: String },
}

impl FeedbackError {
  pub fn citation_parse(message: impl Into<String>) -> Self {
    Self::CitationParse { message: message.into() }
  }

  pub fn unknown_submission(reason: impl Into<String>) -> Self {
    Self::UnknownSubmission { reason: reason.into() }
  }

  pub fn submission_task(message: impl Into<String>) -> Self {
    Self::SubmissionTask { message: message.into() }
  }

  pub fn config(message: impl Into<String>) -> Self {
    Self::Config { message: message.into() }
  }

  pub fn client_build(message: impl Into<String>) -> Self {
    Self::ClientBuild { message: message.into() }
  }
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
