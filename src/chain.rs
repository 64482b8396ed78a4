// chain.rs - Long pivot chains on a fixed-length walk, logged batch by batch

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use csv::{Writer, WriterBuilder};
use rand::Rng;

use crate::error::{Result, SawError};
use crate::lattice::Walk;
use crate::observables::Observables;
use crate::pivot::{random_pivot, PivotOutcome};
use crate::symmetry::{transforms_for, SymmetryGroup};

/// Run-time configuration for a pivot chain.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub batch_size: usize,
    pub batches:    usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            batch_size: 10_000,
            batches:    1_000,
        }
    }
}

/// One row of the chain log.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRecord {
    /// Pivot attempts made so far, counting this batch.
    pub batch:        u64,
    pub acceptance:   f64,
    pub re2:          f64,
    pub rg2:          f64,
    pub rm2:          f64,
    pub elapsed_secs: f64,
}

/// Markov chain of pivot moves. Every state is a self-avoiding walk.
pub struct PivotChain {
    walk:      Walk,
    group:     &'static SymmetryGroup,
    attempted: u64,
    accepted:  u64,
}

impl PivotChain {
    pub fn new(walk: Walk) -> Result<Self> {
        let group = transforms_for(walk.dim())?;
        Ok(Self { walk, group, attempted: 0, accepted: 0 })
    }

    /// One pivot attempt.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> PivotOutcome {
        let outcome = random_pivot(&mut self.walk, self.group, rng);
        self.attempted += 1;
        if outcome.accepted {
            self.accepted += 1;
        }
        outcome
    }

    /// `batch_size` pivot attempts followed by a measurement.
    pub fn run_batch<R: Rng + ?Sized>(&mut self, batch_size: usize, rng: &mut R) -> BatchRecord {
        let tic = Instant::now();
        let mut accepted = 0usize;
        for _ in 0..batch_size {
            if self.step(rng).accepted {
                accepted += 1;
            }
        }
        let elapsed_secs = tic.elapsed().as_secs_f64();
        let obs = Observables::measure(&self.walk);
        BatchRecord {
            batch: self.attempted,
            acceptance: if batch_size == 0 { 0.0 } else { accepted as f64 / batch_size as f64 },
            re2: obs.re2,
            rg2: obs.rg2,
            rm2: obs.rm2,
            elapsed_secs,
        }
    }

    pub fn walk(&self) -> &Walk {
        &self.walk
    }

    pub fn into_walk(self) -> Walk {
        self.walk
    }

    /// Acceptance over the whole life of the chain.
    pub fn acceptance(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempted as f64
        }
    }
}

/// CSV log of batch records, flushed after every row so partial runs survive.
pub struct BatchLog<W: Write> {
    wtr: Writer<W>,
}

impl BatchLog<File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> BatchLog<W> {
    pub fn from_writer(out: W) -> Result<Self> {
        let mut wtr = WriterBuilder::new().from_writer(out);
        wtr.write_record(["batch", "acceptance", "Re2", "Rg2", "Rm2", "time_elapsed"])?;
        Ok(Self { wtr })
    }

    pub fn append(&mut self, r: &BatchRecord) -> Result<()> {
        self.wtr.write_record(&[
            r.batch.to_string(),
            r.acceptance.to_string(),
            r.re2.to_string(),
            r.rg2.to_string(),
            r.rm2.to_string(),
            r.elapsed_secs.to_string(),
        ])?;
        self.wtr.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.wtr
            .into_inner()
            .map_err(|e| SawError::Io(e.into_error()))
    }
}
