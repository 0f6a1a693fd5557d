//! Snowline CLI - replays a race feed and prints the race log

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use snowline::{
    ConsoleSink, EventSink, FeedProvider, RaceConfig, RaceStateMachine, Replay, ReplaySummary,
    WriterSink,
};

#[derive(Parser, Debug)]
#[command(name = "snowline", version, about = "Biathlon race feed replay")]
struct Cli {
    /// Race configuration (JSON, or YAML for any other extension)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Event feed to replay
    #[arg(short, long, default_value = "events")]
    events: PathBuf,

    /// Write the race log to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());
    let config = RaceConfig::load(&cli.config)
        .with_context(|| format!("failed to load race configuration {}", cli.config.display()))?;

    let summary = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut sink = WriterSink::new(BufWriter::new(file));
            let summary = replay(config, &cli.events, &mut sink).await?;

            sink.flush().with_context(|| format!("failed to write {}", path.display()))?;
            if sink.failed_writes() > 0 {
                warn!("{} race log lines could not be written", sink.failed_writes());
            }
            summary
        }
        None => replay(config, &cli.events, ConsoleSink).await?,
    };

    info!(
        processed = summary.processed,
        rejected = summary.rejected,
        skipped = summary.skipped,
        "Replay complete"
    );
    Ok(())
}

async fn replay<S: EventSink>(
    config: RaceConfig,
    events: &Path,
    sink: S,
) -> anyhow::Result<ReplaySummary> {
    let mut feed = FeedProvider::open(events)
        .await
        .with_context(|| format!("failed to open event feed {}", events.display()))?;
    let mut race = RaceStateMachine::new(config, sink);

    let summary = Replay::run(&mut feed, &mut race).await?;
    for outcome in race.outcomes() {
        info!("Outcome: {}", outcome);
    }
    Ok(summary)
}

/// Setup logging based on verbosity level
///
/// Diagnostics go to stderr so stdout carries only the race log. `RUST_LOG`
/// overrides the level chosen here.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
