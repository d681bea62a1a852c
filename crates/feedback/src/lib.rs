//! Feedback - answer rating collection for the chat assistant
//!
//! Builds a feedback record for one question/answer exchange, seeded from the
//! surrounding chat transcript, and delivers it to the backend's `/feedback`
//! endpoint in the background while the panel closes.

pub mod client;
pub mod commands;
pub mod error;
pub mod metrics;
pub mod notify;
pub mod panel;
pub mod record;
pub mod transcript;

pub use client::{ClientConfig, FeedbackSubmitter, HttpFeedbackClient};
pub use error::{FeedbackError, Result};
pub use notify::{LogNotifier, Notifier, TerminalNotifier};
pub use panel::{FeedbackPanel, SubmissionHandle};
pub use record::{DocFeedback, FeedbackRecord, QualityFlag, SeededExchange};
pub use transcript::{ChatMessage, Citation, Role};
