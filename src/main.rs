//! Replays a recorded host session through the view and prints the resulting state.

use anyhow::{Context, Result};
use boolberry_view::mock_bridge::{MockBridge, RecordedEvent};
use boolberry_view::{BridgeAdapter, ViewConfig};
use clap::{Parser, Subcommand};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boolberry_view", about = "Boolberry client view state tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Feed a JSON-lines event log through the view and print the final state.
    Replay {
        /// One `{"event": ..., "payload": ...}` object per line.
        #[arg(long)]
        events: PathBuf,

        /// Recorded outbound call replies (JSON array). Defaults to none.
        #[arg(long)]
        bridge: Option<PathBuf>,

        /// View config file (JSON).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Stop at the first event that fails instead of logging it and moving on.
        #[arg(long)]
        fail_fast: bool,
    },
}

fn load_events(path: &PathBuf) -> Result<Vec<RecordedEvent>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open event log {}", path.display()))?;

    let mut events = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", number + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: RecordedEvent = serde_json::from_str(&line)
            .with_context(|| format!("invalid event on line {}", number + 1))?;
        events.push(event);
    }
    Ok(events)
}

fn replay(
    events: PathBuf,
    bridge: Option<PathBuf>,
    config: Option<PathBuf>,
    fail_fast: bool,
) -> Result<()> {
    let config = match config {
        Some(path) => ViewConfig::from_file(&path)?,
        None => ViewConfig::default(),
    };
    let bridge = match bridge {
        Some(path) => MockBridge::from_file(&path).map_err(anyhow::Error::msg)?,
        None => MockBridge::from_recordings(Vec::new()),
    };
    let events = load_events(&events)?;

    let mut adapter = BridgeAdapter::new(bridge.clone(), config)?;
    adapter.start();

    let mut failures = 0usize;
    for (index, recorded) in events.iter().enumerate() {
        if let Err(e) = adapter.handle(&recorded.event, &recorded.payload_text()) {
            if fail_fast {
                return Err(e).with_context(|| {
                    format!("event #{} ({}) failed", index + 1, recorded.event)
                });
            }
            failures += 1;
        }
    }

    tracing::info!(
        "replayed {} events, {} failed, {} recorded replies unused",
        events.len(),
        failures,
        bridge.remaining()
    );
    println!("{}", serde_json::to_string_pretty(&adapter.snapshot())?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Replay {
            events,
            bridge,
            config,
            fail_fast,
        } => replay(events, bridge, config, fail_fast),
    }
}
