use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use therm_point_client::{PointClient, Reading, ReadingParser};
use therm_shared::PointType;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "therm-point-client")]
#[command(about = "Pushes temperature readings of one grid point to the server", long_about = None)]
struct Cli {
    /// Server URL, e.g. http://localhost:8000
    #[arg(short, long)]
    server: String,

    /// Column of the point
    #[arg(short, long)]
    x: u16,

    /// Row of the point
    #[arg(short, long)]
    y: u16,

    /// Point type sent with every reading (Boundary, GroundTruth, OutOfRange)
    #[arg(short = 't', long = "type", default_value = "GroundTruth")]
    point_type: PointType,

    /// Read from this file or serial device instead of stdin
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = PointClient::new(&cli.server, cli.x, cli.y, cli.point_type)?;
    info!(
        "Sending readings for ({}, {}) as {} to {}",
        cli.x,
        cli.y,
        cli.point_type,
        client.endpoint()
    );

    match client.fetch_state().await {
        Ok(state) => {
            client.check_bounds(&state)?;
            info!("Server grid is {}x{}", state.width, state.height);
        }
        Err(e) => warn!("Could not check the grid size: {}", e),
    }

    let reader: Box<dyn BufRead + Send> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let (tx, mut rx) = mpsc::channel::<Reading>(64);
    let read_task = tokio::task::spawn_blocking(move || -> io::Result<()> {
        for reading in ReadingParser::new(reader) {
            if tx.blocking_send(reading?).is_err() {
                break;
            }
        }
        Ok(())
    });

    let mut sent = 0usize;
    while let Some(reading) = rx.recv().await {
        match reading {
            Reading::Temperature(temp) => match client.send(temp).await {
                Ok(()) => {
                    sent += 1;
                    debug!("Sent {:.2}", temp);
                }
                Err(e) => error!("Failed to send {:.2}: {}", temp, e),
            },
            Reading::Malformed(line) => warn!("Skipping malformed reading: {:?}", line),
        }
    }

    read_task.await?.context("failed to read input")?;
    info!("Input finished, {} readings sent", sent);
    Ok(())
}
