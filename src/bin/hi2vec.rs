//! Hierarchy-to-vectors CLI.
//!
//! ```text
//! hi2vec <k> <a> <hierarchy> <vectors>
//! ```
//!
//! Walks a hierarchy record stream written by `recpart` and emits one
//! `k`-dimensional embedding per leaf node, damping each level's random
//! perturbation by `a^depth`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use clap::error::ErrorKind;
use rand::SeedableRng;
use rand::rngs::StdRng;

use hilouvain::core::error::{Error, Result};
use hilouvain::embed::recvec;
use hilouvain::hierarchy::HierarchyReader;

#[derive(Parser)]
#[command(name = "hi2vec", about = "Embed a hierarchy's leaves into k-dimensional vectors")]
struct Args {
    /// Embedding dimension.
    k: usize,
    /// Per-level damping factor in (0, 1].
    a: f64,
    /// Input hierarchy record stream.
    hierarchy: PathBuf,
    /// Output vectors file (`id v0 v1 … v(k-1)` per line).
    vectors: PathBuf,
}

fn seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run(args: Args) -> Result<()> {
    let content = std::fs::read_to_string(&args.hierarchy)?;
    let mut reader = HierarchyReader::new(&content);
    let mut rng = StdRng::seed_from_u64(seed());
    let mut vec = Vec::new();

    let out = File::create(&args.vectors)?;
    let mut out = BufWriter::new(out);

    let started = std::time::Instant::now();
    recvec(&mut reader, &mut out, args.k, args.a, &mut rng, &mut vec)?;
    out.flush()?;
    println!("vectors written in {:?}", started.elapsed());
    Ok(())
}

fn report(e: Error) -> std::process::ExitCode {
    eprintln!("hi2vec: {e}");
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
