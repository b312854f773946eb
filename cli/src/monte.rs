use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use degrees_core::GraphEngine;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::info;

use crate::config::Config;

/// Searches per rayon task; each task owns one RNG stream and one counts array.
const CHUNK: usize = 1_000;

/// How often each node sat on a path between random pairs of people.
#[derive(Debug, Clone, Default)]
pub struct LinkerCounts {
    pub counts: Vec<u64>,
    pub searches: usize,
    pub found: usize,
}

impl LinkerCounts {
    fn new(order: usize) -> Self {
        Self {
            counts: vec![0; order],
            searches: 0,
            found: 0,
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
        self.searches += other.searches;
        self.found += other.found;
        self
    }

    /// `(name, count)` for nodes of one kind, most frequent first.
    pub fn ranked(&self, engine: &GraphEngine, people: bool) -> Vec<(String, u64)> {
        let mut ranked: Vec<_> = engine
            .catalog()
            .iter()
            .zip(&self.counts)
            .filter(|(info, &count)| count > 0 && info.is_person == people)
            .map(|(info, &count)| (info.name.clone(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}

/// Run `iterations` random searches across the rayon pool.
pub fn run(engine: &GraphEngine, config: &Config, iterations: usize) -> LinkerCounts {
    let order = engine.graph().order();
    let chunks = iterations.div_ceil(CHUNK);

    let bar = ProgressBar::new(iterations as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} searches ({per_sec}, eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let totals = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = config.worker_rng(chunk as u64);
            let mut local = LinkerCounts::new(order);
            let n = CHUNK.min(iterations - chunk * CHUNK);
            for _ in 0..n {
                let (source, dest) = engine.random_pair(&mut rng);
                local.searches += 1;
                if let Ok(path) = engine.find_path(source, dest) {
                    local.found += 1;
                    for info in &path {
                        local.counts[info.node as usize] += 1;
                    }
                }
            }
            bar.inc(n as u64);
            local
        })
        .reduce(|| LinkerCounts::new(order), LinkerCounts::merge);

    bar.finish_and_clear();
    info!(
        searches = totals.searches,
        found = totals.found,
        "monte carlo run complete"
    );
    totals
}

/// Write `name,count` lines.
pub fn write_csv(path: &Path, rows: &[(String, u64)]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for (name, count) in rows {
        writeln!(out, "{},{}", csv_field(name), count)?;
    }
    out.flush()?;
    Ok(())
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
