use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use feedback::client::{ClientConfig, DEFAULT_BASE_URL, SERVER_URL_ENV, TIMEOUT_SECS_ENV};
use feedback::commands::{self, RecordEdits};
use feedback::QualityFlag;

#[derive(Parser)]
#[command(name = "feedback")]
#[command(about = "Feedback - rate a chat assistant answer and send it to the backend")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), ", courtesy of Blizz and Kernelle Software"))]
struct Cli {
  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

/// The exchange being rated
#[derive(Args)]
struct ExchangeArgs {
  /// Chat transcript saved as a JSON array of messages
  #[arg(short, long)]
  transcript: PathBuf,
  /// Index of the message feedback was requested on
  #[arg(short, long)]
  index: usize,
}

#[derive(Subcommand)]
enum Command {
  /// Show the feedback record seeded from the transcript
  Preview {
    #[command(flatten)]
    exchange: ExchangeArgs,
  },
  /// Rate an exchange and submit the feedback
  Submit {
    #[command(flatten)]
    exchange: ExchangeArgs,
    /// Overall response quality, 1-5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    response_quality: Option<u8>,
    /// Overall document quality, 1-5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    document_quality: Option<u8>,
    /// Commentary on the answer
    #[arg(long)]
    verbatim: Option<String>,
    /// Commentary on the cited documents
    #[arg(long)]
    documentation: Option<String>,
    /// Quality flag to tick (repeatable)
    #[arg(long = "flag", value_enum)]
    flags: Vec<QualityFlag>,
    /// Base URL of the chat backend
    #[arg(long, env = SERVER_URL_ENV, default_value = DEFAULT_BASE_URL)]
    server_url: String,
    /// Request timeout in seconds (none by default)
    #[arg(long, env = TIMEOUT_SECS_ENV)]
    timeout_secs: Option<u64>,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("feedback=debug,metric=info,warn")
  } else {
    EnvFilter::new("feedback=warn,metric=info,warn")
  };
  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

  match cli.command {
    Command::Preview { exchange } => {
      println!("{}", commands::preview(&exchange.transcript, exchange.index)?);
    }
    Command::Submit {
      exchange,
      response_quality,
      document_quality,
      verbatim,
      documentation,
      flags,
      server_url,
      timeout_secs,
    } => {
      let edits = RecordEdits { response_quality, document_quality, verbatim, documentation, flags };
      let config = ClientConfig { base_url: server_url, timeout_secs };
      commands::submit(&exchange.transcript, exchange.index, &edits, &config).await?;
    }
  }

  Ok(())
}
