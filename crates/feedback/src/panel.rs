//! Open/edit/submit lifecycle of the feedback panel.
//!
//! The panel owns the in-progress record while it is open. Submitting hands the
//! record to a background task and closes the panel straight away; the outcome
//! is observed through the returned [`SubmissionHandle`], never by the dismissal.

use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::client::FeedbackSubmitter;
use crate::error::{FeedbackError, Result};
use crate::record::FeedbackRecord;
use crate::transcript::ChatMessage;

type DismissHook = Box<dyn FnMut() + Send>;

pub struct FeedbackPanel {
  submitter: Arc<dyn FeedbackSubmitter>,
  record: Option<FeedbackRecord>,
  on_dismiss: Option<DismissHook>,
}

impl FeedbackPanel {
  pub fn new(submitter: Arc<dyn FeedbackSubmitter>) -> Self {
    Self { submitter, record: None, on_dismiss: None }
  }

  /// Register a callback run every time the panel closes.
  pub fn with_on_dismiss(mut self, hook: impl FnMut() + Send + 'static) -> Self {
    self.on_dismiss = Some(Box::new(hook));
    self
  }

  pub fn is_open(&self) -> bool {
    self.record.is_some()
  }

  /// Open the panel on the message at `trigger_index`, seeding a fresh record.
  /// Returns `false` when the panel was already open; the open record is kept.
  pub fn open(&mut self, transcript: &[ChatMessage], trigger_index: usize) -> bool {
    if self.is_open() {
      return false;
    }

    tracing::debug!(trigger_index, "opening feedback panel");
    self.record = Some(FeedbackRecord::seeded(transcript, trigger_index));
    true
  }

  pub fn record(&self) -> Option<&FeedbackRecord> {
    self.record.as_ref()
  }

  pub fn record_mut(&mut self) -> Option<&mut FeedbackRecord> {
    self.record.as_mut()
  }

  /// Close the panel, discarding whatever was entered.
  pub fn dismiss(&mut self) -> Option<FeedbackRecord> {
    let discarded = self.record.take();
    if let Some(hook) = self.on_dismiss.as_mut() {
      hook();
    }
    discarded
  }

  /// Send the record in the background and close the panel without waiting.
  ///
  /// The panel closes whatever happens. Outside a tokio runtime nothing can be
  /// spawned, so the record is discarded and `SubmissionTask` is returned.
  pub fn submit(&mut self) -> Result<SubmissionHandle> {
    if !self.is_open() {
      return Err(FeedbackError::PanelClosed);
    }

    let runtime = match Handle::try_current() {
      Ok(runtime) => runtime,
      Err(e) => {
        self.dismiss();
        return Err(FeedbackError::submission_task(format!("no async runtime available: {e}")));
      }
    };

    let record = self.record.take().ok_or(FeedbackError::PanelClosed)?;
    let handle = start_submission(&runtime, Arc::clone(&self.submitter), record);
    self.dismiss();
    Ok(handle)
  }
}

/// Spawn one delivery attempt for `record` on `runtime`.
pub fn start_submission(
  runtime: &Handle,
  submitter: Arc<dyn FeedbackSubmitter>,
  record: FeedbackRecord,
) -> SubmissionHandle {
  let task = runtime.spawn(async move { submitter.submit(&record).await });
  SubmissionHandle { task }
}

/// Completion side of a background submission. Dropping it leaves the request
/// running.
#[derive(Debug)]
pub struct SubmissionHandle {
  task: JoinHandle<Result<()>>,
}

impl SubmissionHandle {
  pub fn is_finished(&self) -> bool {
    self.task.is_finished()
  }

  /// Wait for the request to settle.
  pub async fn outcome(self) -> Result<()> {
    self.task.await.map_err(|e| FeedbackError::submission_task(e.to_string()))?
  }
}
