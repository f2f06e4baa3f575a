//! Recursive bisection CLI: partitions an edge-list graph into a hierarchy.
//!
//! ```text
//! recpart <edgelist> <hierarchy> [partition=1]
//! ```
//!
//! `partition` selects the algorithm used at every level of the recursion
//! (0=random, 1=full Louvain, 2=one-level Louvain, 3=label propagation,
//! 4=attributed Louvain — not valid here since no attribute table is loaded).

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use clap::error::ErrorKind;

use hilouvain::community::algorithm::Algorithm;
use hilouvain::core::context::Context;
use hilouvain::core::error::{Error, Result};
use hilouvain::core::graph::Graph;
use hilouvain::hierarchy::build_hierarchy;

#[derive(Parser)]
#[command(name = "recpart", about = "Recursively bisect a graph into a hierarchy file")]
struct Args {
    /// Input edge list (`u v` per line).
    edgelist: PathBuf,
    /// Output hierarchy record stream.
    hierarchy: PathBuf,
    /// Partitioning algorithm code (0-3).
    #[arg(default_value_t = 1)]
    partition: u8,
}

fn seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run(args: Args) -> Result<()> {
    let algo = Algorithm::from_code(args.partition)?;
    let g = Graph::read_edge_list(&args.edgelist)?;
    println!("nodes: {}, edges: {}", g.n, g.e);

    let mut ctx = Context::new(seed());
    let out = File::create(&args.hierarchy)?;
    let mut out = BufWriter::new(out);

    let started = std::time::Instant::now();
    build_hierarchy(algo, g, &mut ctx, &mut out)?;
    println!("hierarchy written in {:?}", started.elapsed());
    Ok(())
}

fn report(e: Error) -> std::process::ExitCode {
    eprintln!("recpart: {e}");
    std::process::ExitCode::FAILURE
}

fn main() -> std::process::ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return std::process::ExitCode::SUCCESS;
        }
        Err(e) => return report(Error::usage(e.to_string())),
    };

    match run(args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => report(e),
    }
}
