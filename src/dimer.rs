// dimer.rs - Recursive pivot dimerization
//
// A walk of length n is the join of a walk of length n/2 and one of length
// n - n/2, each sampled recursively and randomized by a single pivot. If the
// two halves touch, both are thrown away and the whole split is resampled.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::base::{generate_base, BaseMethod};
use crate::error::{Result, SawError};
use crate::lattice::Walk;
use crate::merge::{cross_valid, merge};
use crate::pivot::random_pivot;
use crate::symmetry::{transforms_for, SymmetryGroup};
use crate::utils::rng::seeded;

/// Sampler settings (single source of truth for the drivers).
#[derive(Debug, Clone)]
pub struct DimerConfig {
    /// Lengths `n <= base_threshold` go straight to the base-case generator.
    /// Values below 1 are treated as 1.
    pub base_threshold: usize,
    pub base_method:    BaseMethod,
    /// Pivot each half before joining. `false` gives plain (naive) dimerization.
    pub pivot_halves:   bool,
    /// Give up on a split after this many consecutive collisions.
    /// `None` retries forever.
    pub max_retries:    Option<usize>,
    /// In `generate_parallel`, sub-walks at least this long are built on
    /// separate rayon tasks.
    pub parallel_cutoff: usize,
}

impl Default for DimerConfig {
    fn default() -> Self {
        Self {
            base_threshold:  3,
            base_method:     BaseMethod::Rod,
            pivot_halves:    true,
            max_retries:     None,
            parallel_cutoff: 4_096,
        }
    }
}

/// Work counters accumulated over one `generate` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DimerStats {
    pub base_calls:       u64,
    pub joins_attempted:  u64,
    pub joins_rejected:   u64,
    pub pivots_attempted: u64,
    pub pivots_accepted:  u64,
}

impl DimerStats {
    fn absorb(&mut self, other: &DimerStats) {
        self.base_calls       += other.base_calls;
        self.joins_attempted  += other.joins_attempted;
        self.joins_rejected   += other.joins_rejected;
        self.pivots_attempted += other.pivots_attempted;
        self.pivots_accepted  += other.pivots_accepted;
    }

    /// Fraction of joins that produced a self-avoiding walk.
    pub fn join_acceptance(&self) -> f64 {
        if self.joins_attempted == 0 {
            return 1.0;
        }
        1.0 - self.joins_rejected as f64 / self.joins_attempted as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dimerizer {
    cfg: DimerConfig,
}

impl Dimerizer {
    pub fn new(cfg: DimerConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &DimerConfig {
        &self.cfg
    }

    /// Sample a self-avoiding walk of `n` steps on `Z^dim`, starting at the origin.
    pub fn generate<R: Rng + ?Sized>(&self, n: usize, dim: usize, rng: &mut R) -> Result<Walk> {
        self.generate_with_stats(n, dim, rng).map(|(walk, _)| walk)
    }

    /// Like [`Dimerizer::generate`], also returning work counters.
    pub fn generate_with_stats<R: Rng + ?Sized>(
        &self,
        n: usize,
        dim: usize,
        rng: &mut R,
    ) -> Result<(Walk, DimerStats)> {
        let group = transforms_for(dim)?;
        let mut stats = DimerStats::default();
        let walk = self.dimerize(n, group, rng, &mut stats)?;
        tracing::debug!(
            n,
            dim,
            joins = stats.joins_attempted,
            rejected = stats.joins_rejected,
            "dimerization finished"
        );
        Ok((walk, stats))
    }

    /// Parallel variant driven by a seed. The two halves of every split at
    /// least `parallel_cutoff` long are built with `rayon::join`, each on its
    /// own `ChaCha20Rng` seeded from the parent stream before the fork, so the
    /// output depends on `seed` alone.
    pub fn generate_parallel(&self, n: usize, dim: usize, seed: u64) -> Result<(Walk, DimerStats)> {
        let group = transforms_for(dim)?;
        self.dimerize_par(n, group, &mut seeded(seed))
    }

    fn threshold(&self) -> usize {
        self.cfg.base_threshold.max(1)
    }

    fn dimerize<R: Rng + ?Sized>(
        &self,
        n: usize,
        group: &SymmetryGroup,
        rng: &mut R,
        stats: &mut DimerStats,
    ) -> Result<Walk> {
        if n <= self.threshold() {
            stats.base_calls += 1;
            return generate_base(n, group.dim(), self.cfg.base_method, rng);
        }
        let mut failures = 0;
        loop {
            let mut left = self.dimerize(n / 2, group, rng, stats)?;
            let mut right = self.dimerize(n - n / 2, group, rng, stats)?;
            if let Some(walk) = self.join(&mut left, &mut right, group, rng, stats) {
                return Ok(walk);
            }
            failures += 1;
            self.check_budget(n, failures)?;
        }
    }

    fn dimerize_par(
        &self,
        n: usize,
        group: &SymmetryGroup,
        rng: &mut ChaCha20Rng,
    ) -> Result<(Walk, DimerStats)> {
        let mut stats = DimerStats::default();
        if n < self.cfg.parallel_cutoff || n <= self.threshold() {
            let walk = self.dimerize(n, group, rng, &mut stats)?;
            return Ok((walk, stats));
        }
        let mut failures = 0;
        loop {
            let mut rng_l = ChaCha20Rng::seed_from_u64(rng.next_u64());
            let mut rng_r = ChaCha20Rng::seed_from_u64(rng.next_u64());
            let (l, r) = rayon::join(
                || self.dimerize_par(n / 2, group, &mut rng_l),
                || self.dimerize_par(n - n / 2, group, &mut rng_r),
            );
            let (mut left, stats_l) = l?;
            let (mut right, stats_r) = r?;
            stats.absorb(&stats_l);
            stats.absorb(&stats_r);
            if let Some(walk) = self.join(&mut left, &mut right, group, rng, &mut stats) {
                return Ok((walk, stats));
            }
            failures += 1;
            self.check_budget(n, failures)?;
        }
    }

    /// Pivot both halves, move them to the origin and join them if they do not touch.
    fn join<R: Rng + ?Sized>(
        &self,
        left: &mut Walk,
        right: &mut Walk,
        group: &SymmetryGroup,
        rng: &mut R,
        stats: &mut DimerStats,
    ) -> Option<Walk> {
        stats.joins_attempted += 1;
        if self.cfg.pivot_halves {
            for half in [&mut *left, &mut *right] {
                let outcome = random_pivot(half, group, rng);
                stats.pivots_attempted += 1;
                if outcome.accepted {
                    stats.pivots_accepted += 1;
                }
                half.shift_to_origin();
            }
        }
        if cross_valid(left, right) {
            Some(merge(left, right))
        } else {
            stats.joins_rejected += 1;
            None
        }
    }

    fn check_budget(&self, n: usize, failures: usize) -> Result<()> {
        if failures >= 16 && failures.is_power_of_two() {
            tracing::debug!(n, failures, "halves keep colliding");
        }
        match self.cfg.max_retries {
            Some(max) if failures >= max => {
                tracing::warn!(n, failures, "retry budget exhausted");
                Err(SawError::RetriesExhausted { n, retries: failures })
            }
            _ => Ok(()),
        }
    }
}

/// Dimerize with the default configuration.
pub fn generate<R: Rng + ?Sized>(n: usize, dim: usize, rng: &mut R) -> Result<Walk> {
    Dimerizer::default().generate(n, dim, rng)
}
