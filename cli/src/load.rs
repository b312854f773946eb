use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use degrees_core::{GraphEngine, Snapshot};
use tracing::info;

/// On-disk snapshot encoding, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Bincode,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("bin") => Format::Bincode,
            _ => Format::Json,
        }
    }
}

/// Read a snapshot from disk and build the engine.
pub fn load_engine(path: &Path) -> Result<GraphEngine> {
    let start = Instant::now();

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let snapshot: Snapshot = match Format::from_path(path) {
        Format::Json => serde_json::from_reader(reader)
            .with_context(|| format!("parsing {}", path.display()))?,
        Format::Bincode => bincode::deserialize_from(reader)
            .with_context(|| format!("parsing {}", path.display()))?,
    };
    let engine = snapshot
        .into_engine()
        .with_context(|| format!("validating {}", path.display()))?;

    let stats = engine.stats();
    info!(
        nodes = stats.nodes,
        edges = stats.edges,
        people = stats.people,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "loaded {}",
        path.display()
    );
    Ok(engine)
}

/// Write the engine's structures back out, encoded per the target extension.
pub fn save_snapshot(engine: &GraphEngine, path: &Path) -> Result<()> {
    let snapshot = Snapshot::from_engine(engine);
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    match Format::from_path(path) {
        Format::Json => serde_json::to_writer(&mut writer, &snapshot)
            .with_context(|| format!("encoding {}", path.display()))?,
        Format::Bincode => bincode::serialize_into(&mut writer, &snapshot)
            .with_context(|| format!("encoding {}", path.display()))?,
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
