//! degrees: command line front end for degrees-core.
//!
//! ```text
//! degrees path "Kevin Bacon" "Tom Hardy"
//! degrees random -n 5 --seed 7
//! degrees monte -n 100000 --out-dir results/
//! degrees serialize data/bacon.bin
//! degrees bench --people 500000 --works 120000
//! ```

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use degrees_core::{GraphEngine, NodeId, SearchError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod generate;
mod load;
mod monte;

use config::{Cli, Command, Config};
use generate::CastingModel;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Path { from, to } => find_path(&config, &from, &to),
        Command::Random { count } => random_paths(&config, count),
        Command::Monte {
            iterations,
            top,
            out_dir,
        } => monte_carlo(&config, iterations, top, out_dir.as_deref()),
        Command::Stats => stats(&config),
        Command::Serialize { output } => serialize(&config, &output),
        Command::Bench {
            people,
            works,
            cast,
            searches,
        } => bench(
            &config,
            CastingModel {
                people,
                works,
                cast,
            },
            searches,
        ),
    }
}

fn find_path(config: &Config, from: &str, to: &str) -> Result<()> {
    let engine = load::load_engine(&config.data)?;

    let start = resolve(&engine, from)?;
    let end = resolve(&engine, to)?;
    println!("Start Node: {:?}", engine.catalog()[start]);
    println!("End Node: {:?}", engine.catalog()[end]);

    let t = Instant::now();
    let result = engine.find_path(start, end);
    info!(elapsed_ms = t.elapsed().as_secs_f64() * 1000.0, "search finished");

    print_outcome(result);
    Ok(())
}

fn resolve(engine: &GraphEngine, query: &str) -> Result<NodeId> {
    let t = Instant::now();
    let r = engine
        .resolve_detailed(query)
        .with_context(|| format!("resolving '{query}'"))?;
    if !r.is_exact() {
        warn!(
            query,
            matched = %engine.catalog()[r.node].name,
            distance = r.distance,
            "name not found, using most similar"
        );
    }
    info!(query, node = r.node, elapsed_us = t.elapsed().as_micros() as u64, "resolved");
    Ok(r.node)
}

fn print_outcome(result: Result<degrees_core::Path, SearchError>) {
    match result {
        Ok(path) => println!("{}", path.prose()),
        Err(SearchError::NotFound { .. }) => println!("No path found"),
        Err(e) => {
            warn!(error = %e, "search failed");
            println!("No path found");
        }
    }
}

fn random_paths(config: &Config, count: usize) -> Result<()> {
    let engine = load::load_engine(&config.data)?;
    let mut rng = config.rng();

    for _ in 0..count {
        let (source, dest) = engine.random_pair(&mut rng);
        print_outcome(engine.find_path(source, dest));
        println!();
    }
    Ok(())
}

fn monte_carlo(
    config: &Config,
    iterations: usize,
    top: usize,
    out_dir: Option<&std::path::Path>,
) -> Result<()> {
    let engine = load::load_engine(&config.data)?;
    let totals = monte::run(&engine, config, iterations);

    let people = totals.ranked(&engine, true);
    let works = totals.ranked(&engine, false);

    println!(
        "{} searches, {} connected ({:.1}%)",
        totals.searches,
        totals.found,
        100.0 * totals.found as f64 / totals.searches.max(1) as f64
    );
    for (title, rows) in [("People", &people), ("Works", &works)] {
        println!();
        println!("{title}");
        println!("{:->40} {:->10}", "", "");
        for (name, count) in rows.iter().take(top) {
            println!("{name:<40} {count:>10}");
        }
    }

    if let Some(dir) = out_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        monte::write_csv(&dir.join("people.csv"), &people)?;
        monte::write_csv(&dir.join("movies.csv"), &works)?;
        info!(dir = %dir.display(), "wrote people.csv and movies.csv");
    }
    Ok(())
}

fn stats(config: &Config) -> Result<()> {
    let engine = load::load_engine(&config.data)?;
    let s = engine.stats();
    println!("Number of nodes: {}", s.nodes);
    println!("Number of edges: {}", s.edges);
    println!("{} works and {} people ({} indexed names)", s.works, s.people, s.names);
    println!("~{:.0}MB", s.memory_bytes as f64 / 1_048_576.0);
    Ok(())
}

fn serialize(config: &Config, output: &std::path::Path) -> Result<()> {
    let engine = load::load_engine(&config.data)?;
    let t = Instant::now();
    load::save_snapshot(&engine, output)?;
    info!(
        elapsed_ms = t.elapsed().as_secs_f64() * 1000.0,
        "wrote {}",
        output.display()
    );
    Ok(())
}

fn bench(config: &Config, model: CastingModel, searches: usize) -> Result<()> {
    let mut rng = config.rng();

    let t = Instant::now();
    let engine = generate::generate(model, &mut rng)?;
    let s = engine.stats();
    println!(
        "Generated in {:.2}s: {} nodes, {} edges, ~{:.0}MB",
        t.elapsed().as_secs_f64(),
        s.nodes,
        s.edges,
        s.memory_bytes as f64 / 1_048_576.0
    );

    let mut histogram = vec![0usize; 8];
    let mut not_found = 0usize;
    let mut total = Duration::ZERO;
    let mut slowest = Duration::ZERO;

    for _ in 0..searches {
        let (source, dest) = engine.random_pair(&mut rng);
        let t = Instant::now();
        let result = engine.find_path(source, dest);
        let elapsed = t.elapsed();
        total += elapsed;
        slowest = slowest.max(elapsed);

        match result {
            Ok(path) => {
                let d = path.degrees().min(histogram.len() - 1);
                histogram[d] += 1;
            }
            Err(_) => not_found += 1,
        }
    }

    println!();
    println!(
        "{} searches: mean {:.2}ms, max {:.2}ms",
        searches,
        total.as_secs_f64() * 1000.0 / searches.max(1) as f64,
        slowest.as_secs_f64() * 1000.0
    );
    println!();
    println!("{:>8} {:>10}", "degrees", "pairs");
    println!("{:->8} {:->10}", "", "");
    for (d, n) in histogram.iter().enumerate().filter(|(_, &n)| n > 0) {
        let label = if d == histogram.len() - 1 {
            format!("{d}+")
        } else {
            d.to_string()
        };
        println!("{label:>8} {n:>10}");
    }
    println!("{:>8} {:>10}", "none", not_found);
    Ok(())
}
