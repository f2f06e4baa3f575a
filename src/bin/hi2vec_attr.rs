//! Attributed hierarchy-to-vectors CLI.
//!
//! ```text
//! hi2vec_attr <k> <a> <beta> <hierarchy> <attributes> <vectors>
//! ```
//!
//! Same walk as `hi2vec`, with each leaf's vector additionally receiving
//! `beta * a^depth * (P * x_u)`, a random projection of the node's
//! attribute vector into embedding space.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use clap::error::ErrorKind;
use rand::SeedableRng;
use rand::rngs::StdRng;

use hilouvain::core::attributes::AttributeTable;
use hilouvain::core::error::{Error, Result};
use hilouvain::embed::{Projection, recvec_attr};
use hilouvain::hierarchy::HierarchyReader;

#[derive(Parser)]
#[command(
    name = "hi2vec_attr",
    about = "Embed a hierarchy's leaves into k-dimensional vectors, blended with node attributes"
)]
struct Args {
    /// Embedding dimension.
    k: usize,
    /// Per-level damping factor in (0, 1].
    a: f64,
    /// Weight of the attribute projection term.
    beta: f64,
    /// Input hierarchy record stream.
    hierarchy: PathBuf,
    /// Per-node attribute table (`id v0 v1 … v(d-1)` per line).
    attributes: PathBuf,
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
    let attrs = AttributeTable::load(&args.attributes)?;
    let content = std::fs::read_to_string(&args.hierarchy)?;
    let mut reader = HierarchyReader::new(&content);
    let mut rng = StdRng::seed_from_u64(seed());
    let projection = Projection::sample(args.k, attrs.dim().max(1), &mut rng);
    let mut vec = Vec::new();

    let out = File::create(&args.vectors)?;
    let mut out = BufWriter::new(out);

    let started = std::time::Instant::now();
    recvec_attr(
        &mut reader,
        &mut out,
        args.k,
        args.a,
        args.beta,
        &attrs,
        &projection,
        &mut rng,
        &mut vec,
    )?;
    out.flush()?;
    println!("vectors written in {:?}", started.elapsed());
    Ok(())
}

fn report(e: Error) -> std::process::ExitCode {
    eprintln!("hi2vec_attr: {e}");
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
