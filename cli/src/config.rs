use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const DEFAULT_LOG_FILTER: &str = "degrees=info,degrees_core=warn";

#[derive(Parser, Debug)]
#[command(name = "degrees")]
#[command(about = "Find the shortest chain of shared works between two people")]
pub struct Cli {
    /// Snapshot with graph, node data and people index. `.bin` files are bincode, others JSON
    #[arg(long, global = true, env = "DEGREES_DATA", default_value = "data/bacon.json")]
    pub data: PathBuf,

    /// tracing filter directive (RUST_LOG syntax)
    #[arg(long, global = true, env = "DEGREES_LOG")]
    pub log: Option<String>,

    /// Seed for random sampling; unset draws from OS entropy
    #[arg(long, global = true, env = "DEGREES_SEED")]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find a path between two people
    Path {
        from: String,
        to: String,
    },
    /// Find paths between random pairs of people
    Random {
        #[arg(long, short = 'n', default_value_t = 12)]
        count: usize,
    },
    /// Count which people and works most often link random pairs
    Monte {
        #[arg(long, short = 'n', default_value_t = 400_000)]
        iterations: usize,
        #[arg(long, default_value_t = 25)]
        top: usize,
        /// Write people.csv and movies.csv into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print dataset size
    Stats,
    /// Write the loaded snapshot back out; a `.bin` target loads faster
    Serialize {
        #[arg(default_value = "data/bacon.bin")]
        output: PathBuf,
    },
    /// Time searches over a generated bipartite graph (no data file needed)
    Bench {
        #[arg(long, default_value_t = 200_000, value_parser = clap::value_parser!(u32).range(1..))]
        people: u32,
        #[arg(long, default_value_t = 50_000, value_parser = clap::value_parser!(u32).range(1..))]
        works: u32,
        /// Average cast size per work
        #[arg(long, default_value_t = 12)]
        cast: u32,
        #[arg(long, default_value_t = 1_000)]
        searches: usize,
    },
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    pub data: PathBuf,
    pub log_filter: String,
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            data: cli.data.clone(),
            log_filter: cli
                .log
                .clone()
                .or_else(|| std::env::var("RUST_LOG").ok())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            seed: cli.seed,
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Independent stream for worker `index`.
    pub fn worker_rng(&self, index: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index)),
            None => StdRng::from_entropy(),
        }
    }
}
