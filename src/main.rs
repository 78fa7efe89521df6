//! Command-line entry point for inlining interactive examples.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use example_inliner::{DocumentRewriter, ExampleKind, MigrationConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "example-inliner")]
#[command(version, about = "Inline interactive example sources into documentation", long_about = None)]
struct Cli {
  /// Content root holding the documents
  #[arg(long, default_value = ".")]
  root: PathBuf,

  /// Interactive-examples checkout (defaults to ../interactive-examples, root relative)
  #[arg(long)]
  examples: Option<PathBuf>,

  /// Restrict the run to these example kinds (repeatable, defaults to all)
  #[arg(long, value_enum)]
  kind: Vec<ExampleKind>,

  /// Explicit configuration file
  #[arg(long)]
  config: Option<PathBuf>,

  /// Report what would change without writing
  #[arg(long)]
  dry_run: bool,

  /// Increase log verbosity
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  let default_filter = match cli.verbose {
    0 => "example_inliner=info",
    1 => "example_inliner=debug",
    _ => "example_inliner=trace",
  };
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let mut config = match &cli.config {
    Some(path) => MigrationConfig::from_path(path)?,
    None => MigrationConfig::discover(&cli.root),
  };
  if let Some(examples) = &cli.examples {
    config.examples_root = examples.to_string_lossy().into_owned();
  }

  let kinds = if cli.kind.is_empty() {
    ExampleKind::ALL.to_vec()
  } else {
    let mut kinds = cli.kind.clone();
    kinds.sort();
    kinds.dedup();
    kinds
  };

  let rewriter = DocumentRewriter::from_config(&config, &cli.root, &kinds)
    .context("failed to load example metadata")?
    .dry_run(cli.dry_run);
  let report = rewriter.run(&config.documents_pattern(&cli.root))?;

  info!(
    processed = report.processed,
    rewritten = report.rewritten,
    skipped = report.skipped,
    missing_examples = report.missing_examples,
    unmapped_assets = report.unmapped_assets,
    failed = report.failed.len(),
    dry_run = cli.dry_run,
    "migration finished"
  );

  Ok(if report.failed.is_empty() {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}
