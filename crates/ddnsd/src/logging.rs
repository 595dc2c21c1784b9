//! Logger construction
//!
//! The daemon builds exactly one logger and hands it to the engine. It is
//! never installed as the global default.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Where log lines are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Standard output
    Stdout,
    /// Append to a file, creating it if needed
    File(PathBuf),
}

/// Build the logger for `destination`
pub fn build_dispatch(destination: &LogDestination, level: Level) -> Result<Dispatch> {
    let writer = match destination {
        LogDestination::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogDestination::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Couldn't open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(*destination == LogDestination::Stdout)
        .with_writer(writer)
        .finish();

    Ok(Dispatch::new(subscriber))
}
