//! Neardup CLI - near-duplicate document search over a seed corpus.
//!
//! Builds a MinHash index from a corpus file (or a previously saved
//! snapshot), runs one similarity query against it, and prints the
//! matches as a JSON array on standard output.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use neardup::{IndexConfig, IndexSnapshot, MinHashIndex};

/// Find near-duplicate documents with MinHash + LSH banding.
#[derive(Parser, Debug)]
#[command(name = "neardup")]
#[command(version)]
#[command(about = "Find near-duplicate documents with MinHash + LSH banding")]
struct Cli {
    /// Number of LSH bands
    #[arg(long, default_value_t = 100)]
    bands: usize,

    /// Number of hashes (signature rows) per band
    #[arg(long, default_value_t = 2)]
    hashes: usize,

    /// Shingle window size in characters
    #[arg(long, default_value_t = 2)]
    shingles: usize,

    /// Minimum similarity for a reported match, from 0 to 1
    #[arg(long, default_value_t = 0.5)]
    threshold: f64,

    /// Seed for the hash families (drawn from OS entropy when omitted)
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Corpus file with one `id<TAB>text` document per line
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Snapshot file to restore the index from (if present) and save it
    /// to after seeding
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Enable verbose logging for debugging
    #[arg(short, long)]
    verbose: bool,

    /// Query document text
    query: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging; matches go to stdout, logs to stderr
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let index = build_index(&cli)?;

    if let Some(path) = &cli.corpus {
        let corpus = fs::read_to_string(path)
            .with_context(|| format!("failed to read corpus file {}", path.display()))?;
        seed_corpus(&index, &corpus)?;
    }

    if let Some(path) = &cli.snapshot {
        index
            .snapshot()
            .save(path)
            .with_context(|| format!("failed to save snapshot {}", path.display()))?;
    }

    let matches = index.find_similar(cli.query.as_bytes(), cli.threshold)?;
    println!("{}", serde_json::to_string(&matches)?);

    Ok(())
}

/// Restore the index from a snapshot when one exists, otherwise build a
/// fresh index from the command-line parameters.
fn build_index(cli: &Cli) -> anyhow::Result<MinHashIndex> {
    if let Some(path) = &cli.snapshot {
        if path.exists() {
            let snapshot = IndexSnapshot::load(path)
                .with_context(|| format!("failed to load snapshot {}", path.display()))?;
            return Ok(MinHashIndex::from_snapshot(snapshot)?);
        }
    }

    let config = IndexConfig::new(cli.bands, cli.hashes, cli.shingles);
    let index = match cli.rng_seed {
        Some(seed) => MinHashIndex::with_seed(config, seed)?,
        None => MinHashIndex::new(config)?,
    };
    Ok(index)
}

/// Add every `id<TAB>text` record of a corpus file to the index.
fn seed_corpus(index: &MinHashIndex, corpus: &str) -> anyhow::Result<()> {
    for (number, line) in corpus.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let (id, text) = line
            .split_once('\t')
            .with_context(|| format!("corpus line {}: expected `id<TAB>text`", number + 1))?;
        index.add(id, text.as_bytes());
    }
    Ok(())
}
