//! User-facing notifications raised by the submission client.

use colored::*;

/// A blocking, user-visible notice. Implementations must finish presenting the
/// message before returning.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
  fn alert(&self, message: &str);
}

/// Writes alerts to stderr with a highlighted prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl TerminalNotifier {
  fn format_line(line: &str) -> String {
    format!("[{}] {line}", "alert".bright_red().bold())
  }
}

impl Notifier for TerminalNotifier {
  fn alert(&self, message: &str) {
    for line in message.lines() {
      eprintln!("{}", Self::format_line(line));
    }
  }
}

/// Routes alerts into the tracing pipeline, for hosts without a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
  fn alert(&self, message: &str) {
    tracing::error!(target: "feedback::alert", "{message}");
  }
}
