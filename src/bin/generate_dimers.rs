//! Generate dimerized self-avoiding walks over a log-spaced range of lengths.
//!
//! One CSV table per (dimension, length) lands in `--output-dir`; files that
//! already exist are skipped, so an interrupted run can simply be restarted.
//
//  Compile & run:  `cargo run --release --bin generate_dimers -- --dims 2,3`

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use polymers::base::BaseMethod;
use polymers::io::save_walk;
use polymers::utils::rng::job_rng;
use polymers::{DimerConfig, DimerStats, Dimerizer, SawError};

#[derive(Parser, Debug)]
struct Cli {
    /// log10 of the shortest walk
    #[arg(long, default_value = "2")]
    log_min: f64,

    /// log10 of the longest walk
    #[arg(long, default_value = "5")]
    log_max: f64,

    /// Number of log-spaced lengths
    #[arg(long, default_value = "20")]
    count: usize,

    /// Lattice dimensions
    #[arg(long, default_value = "2,3", value_delimiter = ',')]
    dims: Vec<usize>,

    /// Master seed; every (dim, length) job derives its own stream from it,
    /// so resumed runs reproduce the same walks
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Skip the pivots on each half (plain dimerization)
    #[arg(long)]
    naive: bool,

    /// Grow base cases randomly instead of starting from rods
    #[arg(long)]
    random_base: bool,

    /// Give up on a split after this many collisions
    #[arg(long)]
    max_retries: Option<usize>,

    /// Output directory
    #[arg(long, default_value = "data/dimers")]
    output_dir: PathBuf,
}

/// `count` integers spread evenly in log space over `[10^lo, 10^hi]`, deduplicated.
fn log_lengths(lo: f64, hi: f64, count: usize) -> Vec<usize> {
    let mut out: Vec<usize> = (0..count)
        .map(|i| {
            let t = if count > 1 { i as f64 / (count - 1) as f64 } else { 0.0 };
            10f64.powf(lo + t * (hi - lo)) as usize
        })
        .collect();
    out.dedup();
    out
}

fn walk_path(dir: &Path, dim: usize, n: usize) -> PathBuf {
    dir.join(format!("dimer_d{dim}_n{n:05}.csv"))
}

#[derive(Debug)]
struct Row {
    dim:   usize,
    n:     usize,
    stats: DimerStats,
    secs:  f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    fs::create_dir_all(&args.output_dir)?;

    let cfg = DimerConfig {
        pivot_halves: !args.naive,
        base_method: if args.random_base {
            BaseMethod::Naive { max_attempts: 10_000 }
        } else {
            BaseMethod::Rod
        },
        max_retries: args.max_retries,
        ..DimerConfig::default()
    };
    println!("Sampler configuration:\n{cfg:#?}");
    let sampler = Dimerizer::new(cfg);

    let jobs: Vec<(usize, usize)> = log_lengths(args.log_min, args.log_max, args.count)
        .into_iter()
        .flat_map(|n| args.dims.iter().map(move |&dim| (dim, n)))
        .filter(|&(dim, n)| !walk_path(&args.output_dir, dim, n).exists())
        .collect();
    println!("{} walks to generate", jobs.len());

    let bar = ProgressBar::new(jobs.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        " {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]",
    )?);

    let rows = Mutex::new(Vec::new());

    let outcome: Result<(), SawError> = jobs.par_iter().try_for_each(|&(dim, n)| {
        let mut rng = job_rng(args.seed, dim, n);
        let tic = Instant::now();
        let (walk, stats) = sampler.generate_with_stats(n, dim, &mut rng)?;
        let secs = tic.elapsed().as_secs_f64();
        save_walk(&walk, walk_path(&args.output_dir, dim, n))?;
        rows.lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Row { dim, n, stats, secs });
        bar.inc(1);
        Ok(())
    });
    bar.finish();
    outcome?;

    let mut rows = rows.into_inner().unwrap_or_else(|e| e.into_inner());
    rows.sort_by_key(|r| (r.dim, r.n));
    println!("{:>4} {:>8} {:>10} {:>10} {:>10}", "d", "N", "joins", "accept", "secs");
    for r in &rows {
        println!(
            "{:>4} {:>8} {:>10} {:>10.4} {:>10.3}",
            r.dim,
            r.n,
            r.stats.joins_attempted,
            r.stats.join_acceptance(),
            r.secs
        );
    }
    println!("Walks written to {}", args.output_dir.display());
    Ok(())
}
