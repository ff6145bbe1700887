//! Event logs: serialize/deserialize generated events for offline replay.

use crate::generator::GeneratedEvent;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A full recorded generation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventLog {
    pub scenario_name: String,
    pub seed: u64,
    /// Events in generation order, with their generator-level taus
    pub events: Vec<GeneratedEvent>,
}

/// Save an event log to a JSON file.
pub fn save_event_log(log: &EventLog, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating event log {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, log)?;
    Ok(())
}

/// Load an event log from a JSON file.
pub fn load_event_log(path: &Path) -> anyhow::Result<EventLog> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening event log {}", path.display()))?;
    let reader = BufReader::new(file);
    let log: EventLog = serde_json::from_reader(reader)
        .with_context(|| format!("parsing event log {}", path.display()))?;
    Ok(log)
}
