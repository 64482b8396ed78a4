//! Run long pivot chains starting from previously generated dimers.
//!
//! For every `dimer_*.csv` in `--input-dir` a sibling `*_chain.csv` log is
//! written with one row per batch: moves so far, batch acceptance, Re², Rg²,
//! Rm² and wall time. Walks that already have a log are skipped.
//
//  Compile & run:  `cargo run --release --bin pivot_chain -- --batches 100`

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing_subscriber::EnvFilter;

use polymers::chain::{BatchLog, ChainConfig, PivotChain};
use polymers::io::load_walk;

#[derive(Parser, Debug)]
struct Cli {
    /// Directory holding `dimer_*.csv` walks
    #[arg(long, default_value = "data/dimers")]
    input_dir: PathBuf,

    /// Pivot attempts per logged batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Number of batches per walk
    #[arg(long)]
    batches: Option<usize>,

    #[arg(long, default_value = "1")]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let defaults = ChainConfig::default();
    let cfg = ChainConfig {
        batch_size: args.batch_size.unwrap_or(defaults.batch_size),
        batches:    args.batches.unwrap_or(defaults.batches),
    };
    println!("Chain configuration:\n{cfg:#?}");

    let mut inputs: Vec<PathBuf> = fs::read_dir(&args.input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            let name = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
            name.starts_with("dimer_") && name.ends_with(".csv") && !name.ends_with("_chain.csv")
        })
        .collect();
    inputs.sort();

    for (idx, path) in inputs.iter().enumerate() {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("walk");
        let log_path = path.with_file_name(format!("{stem}_chain.csv"));
        if log_path.exists() {
            continue;
        }

        let walk = load_walk(path)?;
        println!("{}: d = {}, N = {}", path.display(), walk.dim(), walk.len());

        let mut chain = PivotChain::new(walk)?;
        let mut log = BatchLog::create(&log_path)?;
        let mut rng = Pcg64::seed_from_u64(args.seed.wrapping_add(idx as u64));

        let bar = ProgressBar::new(cfg.batches as u64);
        bar.set_style(ProgressStyle::with_template(
            " {bar:40.cyan/blue} {pos}/{len} batches [{elapsed_precise}] {msg}",
        )?);
        for _ in 0..cfg.batches {
            let record = chain.run_batch(cfg.batch_size, &mut rng);
            bar.set_message(format!("acc {:.3}", record.acceptance));
            log.append(&record)?;
            bar.inc(1);
        }
        bar.finish();
        println!("  overall acceptance {:.4} → {}", chain.acceptance(), log_path.display());
    }
    Ok(())
}
