// base.rs - Short walks for the bottom of the dimerization recursion

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, OnceLock};

use rand::Rng;

use crate::error::{Result, SawError};
use crate::lattice::{unit_steps, Walk};
use crate::symmetry::check_dim;

/// How the base case builds its walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseMethod {
    /// Straight rod along `+axis 0`. The pivots applied by the sampler
    /// randomize its orientation.
    #[default]
    Rod,
    /// Myopic random growth, restarting from scratch whenever the walk traps
    /// itself. Gives up after `max_attempts` restarts.
    Naive { max_attempts: usize },
}

static RODS: OnceLock<Mutex<HashMap<(usize, usize), Walk>>> = OnceLock::new();

/// Cached rod of length `n` in `dim` dimensions.
pub fn rod(n: usize, dim: usize) -> Walk {
    let cache = RODS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut rods = cache.lock().unwrap_or_else(|e| e.into_inner());
    rods.entry((n, dim)).or_insert_with(|| Walk::rod(n, dim)).clone()
}

/// A self-avoiding walk of exactly `n` steps starting at the origin.
pub fn generate_base<R: Rng + ?Sized>(
    n: usize,
    dim: usize,
    method: BaseMethod,
    rng: &mut R,
) -> Result<Walk> {
    check_dim(dim)?;
    match method {
        BaseMethod::Rod => Ok(rod(n, dim)),
        BaseMethod::Naive { max_attempts } => naive_walk(n, dim, max_attempts, rng),
    }
}

/// Grow a walk one random free neighbour at a time.
pub fn naive_walk<R: Rng + ?Sized>(
    n: usize,
    dim: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Walk> {
    let steps = unit_steps(dim);
    let mut next = vec![0i32; dim];

    for _ in 0..max_attempts {
        let mut walk = Walk::origin(dim);
        let mut visited: HashSet<Vec<i32>> = HashSet::with_capacity(n + 1);
        visited.insert(walk.first().to_vec());

        while walk.len() < n {
            let here = walk.last().to_vec();
            let free: Vec<&Vec<i32>> = steps
                .iter()
                .filter(|s| {
                    let cand: Vec<i32> = here.iter().zip(s.iter()).map(|(x, d)| x + d).collect();
                    !visited.contains(&cand)
                })
                .collect();
            if free.is_empty() {
                break;
            }
            let step = free[rng.gen_range(0..free.len())];
            for ((out, x), d) in next.iter_mut().zip(&here).zip(step) {
                *out = x + d;
            }
            visited.insert(next.clone());
            walk.push_site(&next);
        }

        if walk.len() == n {
            return Ok(walk);
        }
    }

    tracing::warn!(n, dim, max_attempts, "naive base-case generator exhausted");
    Err(SawError::ExhaustedBase { n, dim, attempts: max_attempts })
}
