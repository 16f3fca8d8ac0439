//! eggtimer - auto-merge daemon
//!
//! Reads relayed webhook deliveries as JSON lines (`{"event": ..., "payload": ...}`)
//! from stdin or a file and merges pull requests as they become ready.

use anyhow::{Context, Result};
use clap::Parser;
use eggtimer::auth::get_github_auth;
use eggtimer::config::Config;
use eggtimer::events::{Delivery, Event};
use eggtimer::merge::{AutoMerger, evaluate, spawn_event_loop};
use eggtimer::platform::create_platform_service;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Inbound queue depth between the reader and the state machine
const EVENT_QUEUE_CAPACITY: usize = 256;

#[derive(Parser)]
#[command(name = "eggtimer")]
#[command(about = "Auto-merge GitHub pull requests once reviews, checks and mergeability agree")]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/eggtimer/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read deliveries from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Delete the source branch after merging
    #[arg(long)]
    delete_after_merge: bool,

    /// Seconds to wait before reading mergeability
    #[arg(long, value_name = "SECS")]
    probe_delay: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "eggtimer=debug,info" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if cli.delete_after_merge {
        config.delete_after_merge = true;
    }
    if let Some(secs) = cli.probe_delay {
        config.mergeable_probe_delay_secs = secs;
    }
    debug!(?config, "loaded config");

    let auth = get_github_auth(config.github.token.as_deref(), config.github.host.as_deref())
        .await?;
    info!(source = %auth.source, "authenticated with GitHub");

    let platform = create_platform_service(&config.github, &auth.token)?;
    let machine = AutoMerger::new(config.merge_options());
    let (tx, event_loop) = spawn_event_loop(machine, platform, EVENT_QUEUE_CAPACITY);

    match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            feed(BufReader::new(file), &tx).await?;
        }
        None => feed(BufReader::new(tokio::io::stdin()), &tx).await?,
    }

    // Let in-flight probes and merges finish
    drop(tx);
    let machine = event_loop.await.context("event loop panicked")?;

    for (pr, record) in machine.store().iter() {
        info!(pr = %pr, sha = %record.head_sha, readiness = %evaluate(record), "still waiting");
    }
    Ok(())
}

/// Forward every decodable delivery to the event loop
async fn feed<R: AsyncBufRead + Unpin>(reader: R, tx: &mpsc::Sender<Event>) -> Result<()> {
    let mut lines = reader.lines();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        match Delivery::from_json_line(&line).and_then(Delivery::into_event) {
            Ok(Some(event)) => tx.send(event).await.context("event loop stopped")?,
            Ok(None) => debug!(line = line_number, "ignoring delivery"),
            Err(e) => warn!(line = line_number, error = %e, "skipping undecodable delivery"),
        }
    }

    Ok(())
}
