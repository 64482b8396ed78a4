// observables.rs - Size measures of a finished walk

use crate::lattice::Walk;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observables {
    pub n_steps: usize,
    pub re2: f64, // squared end-to-end distance
    pub rg2: f64, // squared radius of gyration
    pub rm2: f64, // squared mean monomer distance from the ends
}

impl Observables {
    /// Measure all observables of `walk`.
    pub fn measure(walk: &Walk) -> Self {
        Observables {
            n_steps: walk.len(),
            re2: re2(walk),
            rg2: rg2(walk),
            rm2: rm2(walk),
        }
    }
}

#[inline]
fn dist2(a: &[i32], b: &[i32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = (x - y) as f64;
            d * d
        })
        .sum()
}

/// Vector from the first to the last site.
pub fn end_vector(walk: &Walk) -> Vec<i32> {
    walk.last().iter().zip(walk.first()).map(|(a, b)| a - b).collect()
}

/// `Σ_i x_i`, the sum of all site vectors.
pub fn site_sum(walk: &Walk) -> Vec<i64> {
    let mut sum = vec![0i64; walk.dim()];
    for site in walk.sites() {
        for (acc, &x) in sum.iter_mut().zip(site) {
            *acc += x as i64;
        }
    }
    sum
}

/// `Σ_i |x_i|^2`, the sum of squared coordinates over all sites.
pub fn coord_sq_sum(walk: &Walk) -> i64 {
    walk.coords().iter().map(|&x| x as i64 * x as i64).sum()
}

/// `|x_N - x_0|^2`
pub fn re2(walk: &Walk) -> f64 {
    dist2(walk.last(), walk.first())
}

/// `1/M Σ_i |x_i - x_cm|^2` over the `M = N+1` sites, which equals
/// `1/(2M^2) Σ_ij |x_i - x_j|^2`.
pub fn rg2(walk: &Walk) -> f64 {
    let m = walk.num_sites() as f64;
    let dim = walk.dim();
    let mut sum = vec![0.0f64; dim];
    let mut sum_sq = 0.0;
    for site in walk.sites() {
        for (acc, &x) in sum.iter_mut().zip(site) {
            *acc += x as f64;
        }
        sum_sq += site.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>();
    }
    let cm_sq: f64 = sum.iter().map(|s| (s / m) * (s / m)).sum();
    (sum_sq / m - cm_sq).max(0.0)
}

/// `1/(2M) Σ_i (|x_i - x_0|^2 + |x_i - x_N|^2)`
pub fn rm2(walk: &Walk) -> f64 {
    let (first, last) = (walk.first(), walk.last());
    let total: f64 = walk.sites().map(|s| dist2(s, first) + dist2(s, last)).sum();
    total / (2.0 * walk.num_sites() as f64)
}
